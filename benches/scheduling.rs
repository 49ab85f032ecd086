//! Benchmarks for graph construction and scheduling
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pipeline_builder::pipeline::{
    gallery, schedule, Connection, GraphModel, IdRemapStrategy, Node, NodeKind, SocketName,
    TemplateInstantiator,
};

/// A chain of `n` scalers behind a loader and split.
fn scaler_chain(n: usize) -> GraphModel<'static> {
    let mut graph = GraphModel::new();
    graph.add_node(Node::new("loader", NodeKind::DataLoader)).unwrap();
    graph.add_node(Node::new("split", NodeKind::DataSplit)).unwrap();
    graph
        .add_connection(Connection::same_socket("loader", SocketName::Data, "split"))
        .unwrap();

    let mut prev = "split".to_string();
    for i in 0..n {
        let id = format!("scaler-{}", i);
        graph.add_node(Node::new(id.as_str(), NodeKind::Scaler)).unwrap();
        graph
            .add_connection(Connection::same_socket(prev.as_str(), SocketName::XTrain, id.as_str()))
            .unwrap();
        prev = id;
    }
    graph
}

/// `copies` instances of every gallery template side by side.
fn gallery_forest(copies: usize) -> GraphModel<'static> {
    let mut graph = GraphModel::new();
    for _ in 0..copies {
        for template in gallery::builtin_templates() {
            TemplateInstantiator::instantiate(&template, &mut graph, &IdRemapStrategy::Offset)
                .unwrap();
        }
    }
    graph
}

fn bench_schedule_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_chain");

    for size in [10, 100, 500] {
        let graph = scaler_chain(size);
        group.throughput(Throughput::Elements(graph.node_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| schedule(black_box(graph)).unwrap());
        });
    }

    group.finish();
}

fn bench_schedule_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_forest");

    for copies in [1, 10, 50] {
        let graph = gallery_forest(copies);
        group.throughput(Throughput::Elements(graph.node_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(copies), &graph, |b, graph| {
            b.iter(|| schedule(black_box(graph)).unwrap());
        });
    }

    group.finish();
}

fn bench_build_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chain");

    for size in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| scaler_chain(black_box(size)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_schedule_chain,
    bench_schedule_forest,
    bench_build_chain
);
criterion_main!(benches);
