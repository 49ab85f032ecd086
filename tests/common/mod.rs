//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use pipeline_builder::pipeline::{GraphModel, NodeId, Schedule};

/// Position of `id` in a schedule, panicking if it was not scheduled
pub fn position(schedule: &Schedule, id: &NodeId) -> usize {
    schedule
        .position(id)
        .unwrap_or_else(|| panic!("{} missing from schedule {:?}", id, schedule.order))
}

/// Assert that every connection runs forward in the schedule
pub fn assert_respects_connections(graph: &GraphModel<'_>, schedule: &Schedule) {
    assert_eq!(schedule.len(), graph.node_count(), "schedule must cover every node");
    for edge in graph.list_connections() {
        let from = position(schedule, &edge.connection.source);
        let to = position(schedule, &edge.connection.target);
        assert!(
            from < to,
            "{} scheduled after its consumer ({} >= {})",
            edge.connection,
            from,
            to
        );
    }
}

/// Node ids as plain strings, for compact assertions
pub fn ids(ids: &[NodeId]) -> Vec<&str> {
    ids.iter().map(NodeId::as_str).collect()
}
