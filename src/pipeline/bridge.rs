//! Channel boundary between editor views and the session owning the graph.
//!
//! Views never touch the graph directly. They send [`GraphCommand`]s through
//! an [`EditorBridge`] (or a cloned command sender) and receive
//! [`GraphEvent`]s back. The session applies commands strictly in arrival
//! order, which serializes edits coming from several views.

use crate::pipeline::connection::{Connection, Edge};
use crate::pipeline::controls::Controls;
use crate::pipeline::error::GraphError;
use crate::pipeline::id::{ConnectionId, NodeId};
use crate::pipeline::node::{Node, Position};
use crate::pipeline::schedule::Schedule;
use crate::pipeline::template::{InstantiationReport, Template};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Events sent from the session to the views.
#[derive(Debug, Clone)]
pub enum GraphEvent {
    NodeAdded(NodeId),

    /// A node was removed together with its connections.
    NodeRemoved {
        node_id: NodeId,
        removed_connections: Vec<ConnectionId>,
    },

    ConnectionAdded(ConnectionId),

    ConnectionRemoved(ConnectionId),

    /// Controls were replaced; `flagged` lists keys outside the schema.
    ControlsUpdated {
        node_id: NodeId,
        flagged: Vec<String>,
    },

    NodeMoved(NodeId),

    TemplateApplied(InstantiationReport),

    Cleared,

    /// Sent after every successful structural change.
    TopologyChanged { generation: u64 },

    /// Response to `RequestSchedule`.
    Scheduled(Schedule),

    /// Response to `RequestTopology`.
    Topology(TopologySnapshot),

    /// A command was rejected; the graph is unchanged.
    CommandFailed(GraphError),

    /// The session is shutting down.
    Shutdown,
}

/// Complete copy of the graph for rendering.
#[derive(Debug, Clone, Default)]
pub struct TopologySnapshot {
    pub nodes: Vec<Node>,
    pub connections: Vec<Edge>,
    pub generation: u64,
}

/// Commands sent from the views to the session.
#[derive(Debug, Clone)]
pub enum GraphCommand {
    AddNode(Node),
    RemoveNode(NodeId),
    AddConnection(Connection),
    RemoveConnection(ConnectionId),
    SetControls { node_id: NodeId, controls: Controls },
    SetPosition { node_id: NodeId, position: Position },
    /// Insert a template using the session's remap strategy.
    ApplyTemplate(Template),
    Clear,
    /// Request the current execution order.
    RequestSchedule,
    /// Request a topology snapshot.
    RequestTopology,
    /// Stop the session loop.
    Shutdown,
}

/// Channel capacity for commands (views → session).
pub(crate) const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for events (session → views).
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// View-side handle for communicating with the session.
pub struct EditorBridge {
    pub cmd_tx: Sender<GraphCommand>,
    pub event_rx: Receiver<GraphEvent>,
}

impl EditorBridge {
    /// Create a new bridge pair: `(bridge_for_view, cmd_rx, event_tx)`.
    ///
    /// The session owns `cmd_rx` and `event_tx`.
    pub fn new() -> (Self, Receiver<GraphCommand>, Sender<GraphEvent>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = bounded(EVENT_CHANNEL_CAPACITY);
        (Self { cmd_tx, event_rx }, cmd_rx, event_tx)
    }

    /// Another command sender for a second view.
    pub fn command_sender(&self) -> Sender<GraphCommand> {
        self.cmd_tx.clone()
    }

    // --- Events ---

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<GraphEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Try to receive a single event without blocking.
    pub fn try_recv(&self) -> Option<GraphEvent> {
        self.event_rx.try_recv().ok()
    }

    // --- Commands ---

    /// Queue a command without blocking.
    ///
    /// Fails with `TrySendError::Full` when the session has fallen
    /// `CMD_CHANNEL_CAPACITY` commands behind; a view polling the session on
    /// its own thread should call `process_commands` and retry.
    pub fn send_command(&self, cmd: GraphCommand) -> Result<(), TrySendError<GraphCommand>> {
        self.cmd_tx
            .try_send(cmd)
            .inspect_err(|e| tracing::warn!("Command not queued: {}", send_failure(e)))
    }

    pub fn add_node(&self, node: Node) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::AddNode(node))
    }

    pub fn remove_node(&self, node_id: NodeId) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::RemoveNode(node_id))
    }

    pub fn add_connection(&self, connection: Connection) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::AddConnection(connection))
    }

    pub fn remove_connection(&self, id: ConnectionId) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::RemoveConnection(id))
    }

    pub fn apply_template(&self, template: Template) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::ApplyTemplate(template))
    }

    pub fn request_schedule(&self) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::RequestSchedule)
    }

    pub fn request_topology(&self) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::RequestTopology)
    }

    pub fn shutdown(&self) -> Result<(), TrySendError<GraphCommand>> {
        self.send_command(GraphCommand::Shutdown)
    }
}

fn send_failure<T>(e: &TrySendError<T>) -> &'static str {
    match e {
        TrySendError::Full(_) => "queue full",
        TrySendError::Disconnected(_) => "session gone",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::node_kind::NodeKind;

    #[test]
    fn test_send_never_blocks_when_full() {
        let (bridge, cmd_rx, _event_tx) = EditorBridge::new();
        for i in 0..CMD_CHANNEL_CAPACITY {
            bridge
                .add_node(Node::new(format!("node-{}", i), NodeKind::DataLoader))
                .unwrap();
        }

        let err = bridge
            .add_node(Node::new("overflow", NodeKind::DataLoader))
            .unwrap_err();
        assert!(err.is_full());
        assert!(matches!(err.into_inner(), GraphCommand::AddNode(n) if n.id.as_str() == "overflow"));

        cmd_rx.recv().unwrap();
        assert!(bridge.request_topology().is_ok());
    }

    #[test]
    fn test_send_after_session_dropped() {
        let (bridge, cmd_rx, _event_tx) = EditorBridge::new();
        drop(cmd_rx);
        assert!(bridge.shutdown().unwrap_err().is_disconnected());
    }
}
