//! Topological scheduling.
//!
//! The scheduler first checks that every required input of every node is
//! bound, then orders the nodes with Kahn's algorithm. Among nodes that are
//! ready at the same time the smallest `NodeId` (natural order) goes first,
//! so the result is deterministic for a given graph.

use super::connection::Edge;
use super::error::{GraphError, GraphResult, MissingInput};
use super::graph::GraphModel;
use super::id::NodeId;
use super::node::Node;
use super::schedule::{Schedule, ScheduleStats};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Computes execution orders for pipeline graphs
pub struct TopologicalScheduler;

impl TopologicalScheduler {
    /// Schedule a graph.
    ///
    /// # Errors
    /// * `IncompleteInput` listing every unbound required input
    /// * `CycleDetected` listing every node left unscheduled
    pub fn schedule(graph: &GraphModel<'_>) -> GraphResult<Schedule> {
        let start_time = std::time::Instant::now();

        let missing = Self::missing_inputs(graph)?;
        if !missing.is_empty() {
            return Err(GraphError::IncompleteInput { missing });
        }

        let order = Self::kahn(graph.list_nodes(), graph.list_connections())?;
        let mut stats = Self::stats(graph);
        stats.elapsed_us = start_time.elapsed().as_micros() as u64;

        if graph.node_count() > 1 && stats.isolated_nodes > 0 {
            for node in graph.list_nodes() {
                if graph.incoming(&node.id).next().is_none()
                    && graph.outgoing(&node.id).next().is_none()
                {
                    tracing::warn!("Node '{}' is not connected to the pipeline", node.id);
                }
            }
        }

        tracing::debug!(
            "Scheduled {} nodes in {}us (generation {})",
            order.len(),
            stats.elapsed_us,
            graph.generation()
        );

        Ok(Schedule {
            order,
            generation: graph.generation(),
            stats,
        })
    }

    /// Every `(node, socket)` pair whose required input has no connection,
    /// in node insertion order.
    pub fn missing_inputs(graph: &GraphModel<'_>) -> GraphResult<Vec<MissingInput>> {
        let mut missing = Vec::new();
        for node in graph.list_nodes() {
            let definition = graph.catalog().lookup_node_kind(node.kind)?;
            for socket in definition.required_inputs() {
                if graph.binding(&node.id, socket).is_none() {
                    missing.push(MissingInput {
                        node_id: node.id.clone(),
                        socket,
                    });
                }
            }
        }
        Ok(missing)
    }

    fn kahn(nodes: &[Node], edges: &[Edge]) -> GraphResult<Vec<NodeId>> {
        let mut in_degree: HashMap<&NodeId, usize> =
            nodes.iter().map(|node| (&node.id, 0)).collect();
        let mut fwd_adj: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for edge in edges {
            if let Some(degree) = in_degree.get_mut(&edge.connection.target) {
                *degree += 1;
                fwd_adj
                    .entry(&edge.connection.source)
                    .or_default()
                    .push(&edge.connection.target);
            }
        }

        let mut ready: BinaryHeap<Reverse<&NodeId>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(nodes.len());
        while let Some(Reverse(current)) = ready.pop() {
            order.push(current.clone());

            for &next in fwd_adj.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }

        if order.len() < nodes.len() {
            let mut residual: Vec<NodeId> = in_degree
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(id, _)| id.clone())
                .collect();
            residual.sort();
            return Err(GraphError::CycleDetected { nodes: residual });
        }

        Ok(order)
    }

    fn stats(graph: &GraphModel<'_>) -> ScheduleStats {
        let mut stats = ScheduleStats {
            total_nodes: graph.node_count(),
            connections: graph.connection_count(),
            ..ScheduleStats::default()
        };

        for node in graph.list_nodes() {
            let has_incoming = graph.incoming(&node.id).next().is_some();
            let has_outgoing = graph.outgoing(&node.id).next().is_some();
            if !has_incoming {
                stats.source_nodes += 1;
            }
            if !has_outgoing {
                stats.sink_nodes += 1;
            }
            if !has_incoming && !has_outgoing {
                stats.isolated_nodes += 1;
            }
        }
        stats
    }
}

/// Schedule a graph; see [`TopologicalScheduler::schedule`].
pub fn schedule(graph: &GraphModel<'_>) -> GraphResult<Schedule> {
    TopologicalScheduler::schedule(graph)
}
