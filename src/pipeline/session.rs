//! Editor session: the single owner of a graph behind an [`EditorBridge`].
//!
//! [`EditorBridge`]: crate::pipeline::bridge::EditorBridge

use crate::pipeline::bridge::{GraphCommand, GraphEvent, TopologySnapshot};
use crate::pipeline::error::GraphResult;
use crate::pipeline::graph::GraphModel;
use crate::pipeline::schedule::Schedule;
use crate::pipeline::scheduler::TopologicalScheduler;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::collections::VecDeque;

/// Applies commands to a graph and publishes the resulting events.
pub struct EditorSession<'c> {
    graph: GraphModel<'c>,
    cmd_rx: Receiver<GraphCommand>,
    event_tx: Sender<GraphEvent>,
    /// Last computed schedule, valid while its generation matches the graph
    cached_schedule: Option<Schedule>,
    /// Failures that did not fit in the event queue, oldest first
    undelivered: VecDeque<GraphEvent>,
    running: bool,
}

impl<'c> EditorSession<'c> {
    pub fn new(
        graph: GraphModel<'c>,
        cmd_rx: Receiver<GraphCommand>,
        event_tx: Sender<GraphEvent>,
    ) -> Self {
        Self {
            graph,
            cmd_rx,
            event_tx,
            cached_schedule: None,
            undelivered: VecDeque::new(),
            running: true,
        }
    }

    pub fn graph(&self) -> &GraphModel<'c> {
        &self.graph
    }

    pub fn into_graph(self) -> GraphModel<'c> {
        self.graph
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of failure events waiting for room in the event queue.
    pub fn undelivered(&self) -> usize {
        self.undelivered.len()
    }

    /// Current schedule, recomputed only if the graph changed since the last
    /// call.
    pub fn schedule(&mut self) -> GraphResult<&Schedule> {
        let generation = self.graph.generation();
        let schedule = match self.cached_schedule.take() {
            Some(schedule) if schedule.is_current(generation) => schedule,
            _ => {
                let schedule = TopologicalScheduler::schedule(&self.graph)?;
                tracing::info!(
                    "Schedule recomputed: {} nodes (gen {})",
                    schedule.len(),
                    schedule.generation
                );
                schedule
            }
        };
        Ok(self.cached_schedule.insert(schedule))
    }

    // ==================== Command Loop ====================

    /// Block on commands until `Shutdown` arrives or every sender is gone.
    pub fn run(&mut self) {
        tracing::info!("Editor session started");

        while self.running {
            self.flush_undelivered();
            match self.cmd_rx.recv() {
                Ok(cmd) => self.apply(cmd),
                Err(_) => {
                    tracing::debug!("All command senders dropped");
                    self.running = false;
                }
            }
        }

        self.emit(GraphEvent::Shutdown);
        tracing::info!("Editor session exiting");
    }

    /// Apply every pending command without blocking. Returns how many were
    /// applied.
    pub fn process_commands(&mut self) -> usize {
        self.flush_undelivered();
        let mut applied = 0;
        while self.running {
            let Ok(cmd) = self.cmd_rx.try_recv() else {
                break;
            };
            self.apply(cmd);
            applied += 1;
        }
        applied
    }

    /// Apply a single command and publish its events.
    pub fn apply(&mut self, cmd: GraphCommand) {
        let generation = self.graph.generation();

        match cmd {
            GraphCommand::AddNode(node) => {
                let result = self.graph.add_node(node).map(GraphEvent::NodeAdded);
                self.emit_result(result);
            }
            GraphCommand::RemoveNode(node_id) => {
                let result = self
                    .graph
                    .remove_node(&node_id)
                    .map(|removed_connections| GraphEvent::NodeRemoved {
                        node_id,
                        removed_connections,
                    });
                self.emit_result(result);
            }
            GraphCommand::AddConnection(connection) => {
                let result = self
                    .graph
                    .add_connection(connection)
                    .map(GraphEvent::ConnectionAdded);
                self.emit_result(result);
            }
            GraphCommand::RemoveConnection(id) => {
                let result = self
                    .graph
                    .remove_connection(id)
                    .map(|_| GraphEvent::ConnectionRemoved(id));
                self.emit_result(result);
            }
            GraphCommand::SetControls { node_id, controls } => {
                let result = self
                    .graph
                    .set_controls(&node_id, controls)
                    .map(|flagged| GraphEvent::ControlsUpdated { node_id, flagged });
                self.emit_result(result);
            }
            GraphCommand::SetPosition { node_id, position } => {
                let result = self
                    .graph
                    .set_position(&node_id, position)
                    .map(|()| GraphEvent::NodeMoved(node_id));
                self.emit_result(result);
            }
            GraphCommand::ApplyTemplate(template) => {
                let result = self
                    .graph
                    .apply_template(&template)
                    .map(GraphEvent::TemplateApplied);
                self.emit_result(result);
            }
            GraphCommand::Clear => {
                self.graph.clear();
                self.emit(GraphEvent::Cleared);
            }
            GraphCommand::RequestSchedule => {
                let result = self.schedule().map(|s| GraphEvent::Scheduled(s.clone()));
                self.emit_result(result);
            }
            GraphCommand::RequestTopology => {
                self.emit(GraphEvent::Topology(TopologySnapshot {
                    nodes: self.graph.list_nodes().to_vec(),
                    connections: self.graph.list_connections().to_vec(),
                    generation: self.graph.generation(),
                }));
            }
            GraphCommand::Shutdown => {
                self.running = false;
            }
        }

        if self.graph.generation() != generation {
            self.emit(GraphEvent::TopologyChanged {
                generation: self.graph.generation(),
            });
        }
    }

    fn emit_result(&mut self, result: GraphResult<GraphEvent>) {
        match result {
            Ok(event) => self.emit(event),
            Err(e) => {
                tracing::warn!("Command rejected: {}", e);
                self.emit(GraphEvent::CommandFailed(e));
            }
        }
    }

    fn emit(&mut self, event: GraphEvent) {
        // Failures queue behind earlier ones so views see them in order.
        if matches!(event, GraphEvent::CommandFailed(_)) && !self.undelivered.is_empty() {
            self.undelivered.push_back(event);
            return;
        }

        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event @ GraphEvent::CommandFailed(_))) => {
                tracing::warn!("Event queue full, holding failure until views drain");
                self.undelivered.push_back(event);
            }
            Err(e) => tracing::debug!("Dropped event: {:?}", e.into_inner()),
        }
    }

    /// Move held failures into the event queue while there is room.
    fn flush_undelivered(&mut self) {
        while let Some(event) = self.undelivered.pop_front() {
            match self.event_tx.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    self.undelivered.push_front(event);
                    return;
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.undelivered.clear();
                    return;
                }
            }
        }
    }
}
