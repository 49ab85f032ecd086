//! Connection validation.
//!
//! Every candidate connection is checked in a fixed order, so a connection
//! that is wrong in several ways always reports the same error:
//!
//! 1. both endpoint nodes exist
//! 2. the source kind declares the output and the target kind declares the input
//! 3. the socket names are equal
//! 4. the target input is not already bound
//! 5. the connection does not close a cycle
//!
//! Validation is read-only; the graph inserts the connection only after
//! every check passed.

use crate::pipeline::connection::Connection;
use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::graph::GraphModel;
use crate::pipeline::socket::SocketDirection;

/// Checks a candidate connection against a graph.
pub struct ConnectionValidator<'g, 'c> {
    graph: &'g GraphModel<'c>,
}

impl<'g, 'c> ConnectionValidator<'g, 'c> {
    pub fn new(graph: &'g GraphModel<'c>) -> Self {
        Self { graph }
    }

    pub fn validate(&self, connection: &Connection) -> GraphResult<()> {
        let result = self
            .check_endpoints(connection)
            .and_then(|()| self.check_sockets(connection))
            .and_then(|()| self.check_compatible(connection))
            .and_then(|()| self.check_unbound(connection))
            .and_then(|()| self.check_acyclic(connection));

        match &result {
            Ok(()) => tracing::debug!("Accepted connection {}", connection),
            Err(e) => tracing::debug!("Rejected connection {}: {}", connection, e),
        }
        result
    }

    fn check_endpoints(&self, connection: &Connection) -> GraphResult<()> {
        for id in [&connection.source, &connection.target] {
            if !self.graph.contains_node(id) {
                return Err(GraphError::NodeNotFound { node_id: id.clone() });
            }
        }
        Ok(())
    }

    fn check_sockets(&self, connection: &Connection) -> GraphResult<()> {
        let source = self.graph.definition(&connection.source)?;
        if !source.has_output(connection.source_output) {
            return Err(GraphError::SocketNotFound {
                node_id: connection.source.clone(),
                socket: connection.source_output,
                direction: SocketDirection::Output,
            });
        }

        let target = self.graph.definition(&connection.target)?;
        if !target.has_input(connection.target_input) {
            return Err(GraphError::SocketNotFound {
                node_id: connection.target.clone(),
                socket: connection.target_input,
                direction: SocketDirection::Input,
            });
        }
        Ok(())
    }

    fn check_compatible(&self, connection: &Connection) -> GraphResult<()> {
        if connection
            .source_output
            .is_compatible_with(connection.target_input)
        {
            Ok(())
        } else {
            Err(GraphError::IncompatibleSocket {
                source_output: connection.source_output,
                target_input: connection.target_input,
            })
        }
    }

    fn check_unbound(&self, connection: &Connection) -> GraphResult<()> {
        match self
            .graph
            .binding(&connection.target, connection.target_input)
        {
            Some(existing) => Err(GraphError::InputAlreadyBound {
                node_id: connection.target.clone(),
                socket: connection.target_input,
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }

    /// Adding `source -> target` closes a cycle exactly when `target` already
    /// reaches `source`.
    fn check_acyclic(&self, connection: &Connection) -> GraphResult<()> {
        if connection.source == connection.target {
            return Err(GraphError::CycleDetected {
                nodes: vec![connection.source.clone()],
            });
        }

        match self
            .graph
            .path_between(&connection.target, &connection.source)
        {
            Some(nodes) => Err(GraphError::CycleDetected { nodes }),
            None => Ok(()),
        }
    }
}
