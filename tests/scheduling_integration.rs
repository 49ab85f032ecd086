//! End-to-end scheduling of gallery pipelines and hand-built graphs

mod common;

use common::builders::{training_prefix, GraphBuilder};
use common::{assert_respects_connections, ids};
use pipeline_builder::pipeline::{
    gallery, schedule, GraphError, GraphModel, MissingInput, NodeId, NodeKind, SocketName,
};

#[test]
fn test_basic_classification_schedule() {
    let graph = GraphBuilder::new()
        .node("loader", NodeKind::DataLoader)
        .node("split", NodeKind::DataSplit)
        .node("scaler", NodeKind::Scaler)
        .node("classifier", NodeKind::Classifier)
        .node("evaluate", NodeKind::Evaluate)
        .wire("loader", SocketName::Data, "split")
        .wire("split", SocketName::XTrain, "scaler")
        .wire("scaler", SocketName::XTrain, "classifier")
        .wire("split", SocketName::YTrain, "classifier")
        .wire("classifier", SocketName::Model, "evaluate")
        .wire("split", SocketName::XTest, "evaluate")
        .wire("split", SocketName::YTest, "evaluate")
        .build();

    let schedule = schedule(&graph).unwrap();
    assert_eq!(
        ids(&schedule.order),
        vec!["loader", "split", "scaler", "classifier", "evaluate"]
    );
}

#[test]
fn test_every_gallery_template_schedules() {
    for template in gallery::builtin_templates() {
        let mut graph = GraphModel::new();
        let report = graph.apply_template(&template).unwrap();
        let schedule = schedule(&graph).unwrap();

        let mut scheduled = schedule.order.clone();
        scheduled.sort();
        let mut inserted = report.inserted_node_ids.clone();
        inserted.sort();
        assert_eq!(scheduled, inserted, "{}", template.name);
        assert_respects_connections(&graph, &schedule);
    }
}

#[test]
fn test_gallery_template_orders() {
    let expected = [
        ("Basic Classification", vec!["node-1", "node-2", "node-3", "node-4", "node-5"]),
        (
            "Feature Selection",
            vec!["node-1", "node-2", "node-3", "node-4", "node-5", "node-6"],
        ),
        ("Hyperparameter Tuning", vec!["node-1", "node-2", "node-3", "node-4"]),
        ("Prediction Workflow", vec!["node-1", "node-2", "node-3", "node-4", "node-5"]),
    ];
    for (template, (name, order)) in gallery::builtin_templates().iter().zip(expected) {
        assert_eq!(template.name, name);
        let graph = GraphModel::from_template(
            pipeline_builder::pipeline::Catalog::builtin(),
            template,
        )
        .unwrap();
        assert_eq!(ids(&schedule(&graph).unwrap().order), order);
    }
}

#[test]
fn test_schedule_is_deterministic() {
    let mut graph = GraphModel::new();
    graph.apply_template(&gallery::feature_selection()).unwrap();

    let first = schedule(&graph).unwrap();
    for _ in 0..10 {
        assert_eq!(schedule(&graph).unwrap().order, first.order);
    }
}

#[test]
fn test_removing_split_leaves_tuner_unsatisfied() {
    let mut graph = GraphModel::new();
    graph.apply_template(&gallery::hyperparameter_tuning()).unwrap();
    graph.remove_node(&NodeId::from("node-2")).unwrap();

    let err = schedule(&graph).unwrap_err();
    let GraphError::IncompleteInput { missing } = err else {
        panic!("expected IncompleteInput, got {err:?}");
    };
    let tuner = NodeId::from("node-3");
    assert!(missing.contains(&MissingInput { node_id: tuner.clone(), socket: SocketName::XTrain }));
    assert!(missing.contains(&MissingInput { node_id: tuner, socket: SocketName::YTrain }));
    assert!(missing.contains(&MissingInput {
        node_id: NodeId::from("node-4"),
        socket: SocketName::YTest
    }));
    assert_eq!(missing.len(), 3);
}

#[test]
fn test_natural_order_for_parallel_branches() {
    let mut builder = training_prefix();
    for id in ["eval-10", "eval-9", "eval-1"] {
        builder = builder
            .node(id, NodeKind::Evaluate)
            .wire("classifier", SocketName::Model, id)
            .wire("split", SocketName::YTest, id);
    }
    let graph = builder.build();

    let order = schedule(&graph).unwrap().order;
    assert_eq!(
        ids(&order[3..]),
        vec!["eval-1", "eval-9", "eval-10"]
    );
}

#[test]
fn test_schedule_stats() {
    let graph = training_prefix()
        .node("orphan", NodeKind::DataLoader)
        .build();
    let schedule = schedule(&graph).unwrap();

    assert_eq!(schedule.stats.total_nodes, 4);
    assert_eq!(schedule.stats.connections, 3);
    assert_eq!(schedule.stats.source_nodes, 2);
    assert_eq!(schedule.stats.sink_nodes, 2);
    assert_eq!(schedule.stats.isolated_nodes, 1);
    assert!(schedule.is_current(graph.generation()));
}

#[test]
fn test_schedule_json_shape() {
    let graph = training_prefix().build();
    let json = serde_json::to_value(schedule(&graph).unwrap()).unwrap();
    assert_eq!(json["order"], serde_json::json!(["loader", "split", "classifier"]));
    assert_eq!(json["stats"]["total_nodes"], 3);
}
