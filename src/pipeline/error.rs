//! Pipeline graph error types.
//!
//! Every variant is a local, recoverable failure. A failed mutation never
//! leaves partial state behind, so callers can surface the message and retry.

use crate::pipeline::controls::ControlKind;
use crate::pipeline::id::{ConnectionId, NodeId};
use crate::pipeline::socket::{SocketDirection, SocketName};
use std::fmt;
use thiserror::Error;

/// A required input socket with no incoming connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInput {
    pub node_id: NodeId,
    pub socket: SocketName,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_id, self.socket)
    }
}

/// Errors raised by the graph model, validator, instantiator and scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Unknown node kind '{kind}'")]
    UnknownKind { kind: String },

    #[error("Unknown socket '{name}'")]
    UnknownSocket { name: String },

    #[error("Node id '{node_id}' is already in use")]
    DuplicateId { node_id: NodeId },

    #[error("Node '{node_id}' not found")]
    NodeNotFound { node_id: NodeId },

    #[error("Connection {connection_id} not found")]
    ConnectionNotFound { connection_id: ConnectionId },

    #[error("Node '{node_id}' has no {direction} socket '{socket}'")]
    SocketNotFound {
        node_id: NodeId,
        socket: SocketName,
        direction: SocketDirection,
    },

    #[error("Cannot connect output '{source_output}' to input '{target_input}': socket names differ")]
    IncompatibleSocket {
        source_output: SocketName,
        target_input: SocketName,
    },

    #[error("Input '{socket}' of node '{node_id}' is already bound by {existing}")]
    InputAlreadyBound {
        node_id: NodeId,
        socket: SocketName,
        existing: ConnectionId,
    },

    #[error("Cycle detected through nodes: {}", join_ids(.nodes))]
    CycleDetected { nodes: Vec<NodeId> },

    #[error("Unsatisfied required inputs: {}", join_missing(.missing))]
    IncompleteInput { missing: Vec<MissingInput> },

    #[error("Control '{key}' of node '{node_id}' expects a {expected} value")]
    InvalidControl {
        node_id: NodeId,
        key: String,
        expected: ControlKind,
    },
}

impl GraphError {
    /// Nodes this error refers to, for highlighting in an editor.
    pub fn offending_nodes(&self) -> Vec<NodeId> {
        match self {
            GraphError::DuplicateId { node_id }
            | GraphError::NodeNotFound { node_id }
            | GraphError::SocketNotFound { node_id, .. }
            | GraphError::InputAlreadyBound { node_id, .. }
            | GraphError::InvalidControl { node_id, .. } => vec![node_id.clone()],
            GraphError::CycleDetected { nodes } => nodes.clone(),
            GraphError::IncompleteInput { missing } => {
                let mut nodes: Vec<NodeId> = missing.iter().map(|m| m.node_id.clone()).collect();
                nodes.dedup();
                nodes
            }
            GraphError::UnknownKind { .. }
            | GraphError::UnknownSocket { .. }
            | GraphError::ConnectionNotFound { .. }
            | GraphError::IncompatibleSocket { .. } => Vec::new(),
        }
    }
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_missing(missing: &[MissingInput]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
