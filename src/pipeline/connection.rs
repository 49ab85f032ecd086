//! Connections between node sockets.

use crate::pipeline::id::{ConnectionId, NodeId};
use crate::pipeline::socket::SocketName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed binding from one node's output socket to another node's input
/// socket of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: NodeId,
    pub source_output: SocketName,
    pub target: NodeId,
    pub target_input: SocketName,
}

impl Connection {
    pub fn new(
        source: impl Into<NodeId>,
        source_output: SocketName,
        target: impl Into<NodeId>,
        target_input: SocketName,
    ) -> Self {
        Self {
            source: source.into(),
            source_output,
            target: target.into(),
            target_input,
        }
    }

    /// Connect same-named sockets, the usual wiring.
    pub fn same_socket(source: impl Into<NodeId>, socket: SocketName, target: impl Into<NodeId>) -> Self {
        Self::new(source, socket, target, socket)
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_output, self.target, self.target_input
        )
    }
}

/// A connection stored in a graph, with its allocated id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: ConnectionId,
    #[serde(flatten)]
    pub connection: Connection,
}
