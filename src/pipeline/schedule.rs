use crate::pipeline::id::NodeId;
use serde::Serialize;

/// Execution order for a pipeline graph.
/// Every node appears after all nodes feeding it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schedule {
    /// Node ids in execution order
    pub order: Vec<NodeId>,

    /// Graph generation this schedule was computed for
    pub generation: u64,

    /// Scheduling statistics
    pub stats: ScheduleStats,
}

/// Statistics about a computed schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    /// Number of nodes in the graph
    pub total_nodes: usize,

    /// Number of connections in the graph
    pub connections: usize,

    /// Number of nodes without incoming connections
    pub source_nodes: usize,

    /// Number of nodes without outgoing connections
    pub sink_nodes: usize,

    /// Number of nodes without any connection
    pub isolated_nodes: usize,

    /// Scheduling time in microseconds
    pub elapsed_us: u64,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Index of `id` in the execution order.
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.order.iter().position(|n| n == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter()
    }

    /// Whether this schedule still describes a graph at `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
