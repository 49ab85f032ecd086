//! The in-memory pipeline graph.
//!
//! `GraphModel` exclusively owns its nodes and connections. Every mutation
//! goes through the methods below: connection insertion is gated by the
//! [`ConnectionValidator`], and each method either fully applies or leaves the
//! graph untouched. A generation counter is bumped on every successful
//! mutation so cached schedules can be invalidated cheaply.

use crate::pipeline::catalog::{Catalog, NodeDefinition};
use crate::pipeline::connection::{Connection, Edge};
use crate::pipeline::controls::{check_controls, Controls};
use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::id::{ConnectionId, NodeId};
use crate::pipeline::node::{Node, Position};
use crate::pipeline::socket::SocketName;
use crate::pipeline::template::IdRemapStrategy;
use crate::pipeline::validator::ConnectionValidator;
use std::collections::{HashMap, HashSet};

/// Nodes and connections of one pipeline, bound to a catalog.
#[derive(Debug, Clone)]
pub struct GraphModel<'c> {
    catalog: &'c Catalog,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_connection_id: ConnectionId,
    generation: u64,
    remap_strategy: IdRemapStrategy,
    warn_unknown_controls: bool,
}

/// Saved graph state used to roll back a multi-step insertion.
#[derive(Debug, Clone)]
pub(crate) struct GraphCheckpoint {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_connection_id: ConnectionId,
    generation: u64,
}

impl GraphModel<'static> {
    /// Create an empty graph bound to the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }
}

impl Default for GraphModel<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> GraphModel<'c> {
    pub fn with_catalog(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            nodes: Vec::new(),
            edges: Vec::new(),
            next_connection_id: ConnectionId::default(),
            generation: 0,
            remap_strategy: IdRemapStrategy::default(),
            warn_unknown_controls: true,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Incremented by every successful mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Strategy used by [`apply_template`](Self::apply_template).
    pub fn remap_strategy(&self) -> &IdRemapStrategy {
        &self.remap_strategy
    }

    pub fn set_remap_strategy(&mut self, strategy: IdRemapStrategy) {
        self.remap_strategy = strategy;
    }

    pub fn set_warn_unknown_controls(&mut self, warn: bool) {
        self.warn_unknown_controls = warn;
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    // ==================== Nodes ====================

    /// Insert a node. Its kind must be catalogued and its controls must match
    /// the kind's schema; controls outside the schema are kept but flagged.
    pub fn add_node(&mut self, node: Node) -> GraphResult<NodeId> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateId { node_id: node.id });
        }

        let definition = self.catalog.lookup_node_kind(node.kind)?;
        let unknown = check_controls(&node.id, &node.controls, definition.config_schema())?;
        self.warn_unknown(&node, &unknown);

        let id = node.id.clone();
        tracing::info!("Added node '{}' ({})", id, node.kind);
        self.nodes.push(node);
        self.touch();
        Ok(id)
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the ids of the removed connections.
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<Vec<ConnectionId>> {
        let idx = self.node_index(id)?;

        let removed: Vec<ConnectionId> = self
            .edges
            .iter()
            .filter(|e| e.connection.touches(id))
            .map(|e| e.id)
            .collect();
        self.edges.retain(|e| !e.connection.touches(id));
        self.nodes.remove(idx);
        self.touch();

        tracing::info!(
            "Removed node '{}' and {} incident connection(s)",
            id,
            removed.len()
        );
        Ok(removed)
    }

    /// Replace a node's controls, checked against its kind's schema.
    ///
    /// Returns the flagged keys outside the schema.
    pub fn set_controls(&mut self, id: &NodeId, controls: Controls) -> GraphResult<Vec<String>> {
        let idx = self.node_index(id)?;
        let definition = self.catalog.lookup_node_kind(self.nodes[idx].kind)?;
        let unknown = check_controls(id, &controls, definition.config_schema())?;

        self.nodes[idx].controls = controls;
        self.touch();
        self.warn_unknown(&self.nodes[idx], &unknown);
        tracing::debug!("Updated controls of node '{}'", id);
        Ok(unknown)
    }

    fn warn_unknown(&self, node: &Node, keys: &[String]) {
        if !self.warn_unknown_controls {
            return;
        }
        for key in keys {
            tracing::warn!(
                "Node '{}' ({}) has control '{}' outside its schema",
                node.id,
                node.kind,
                key
            );
        }
    }

    /// Whether unknown control keys are logged as warnings.
    pub fn warns_unknown_controls(&self) -> bool {
        self.warn_unknown_controls
    }

    pub fn set_position(&mut self, id: &NodeId, position: Position) -> GraphResult<()> {
        let idx = self.node_index(id)?;
        self.nodes[idx].position = position;
        self.touch();
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    fn node_index(&self, id: &NodeId) -> GraphResult<usize> {
        self.nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: id.clone() })
    }

    /// Catalog definition of the node's kind.
    pub fn definition(&self, id: &NodeId) -> GraphResult<&'c NodeDefinition> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound { node_id: id.clone() })?;
        self.catalog.lookup_node_kind(node.kind)
    }

    /// Nodes in insertion order.
    pub fn list_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every `(node, key)` pair whose control key is outside the kind's schema.
    pub fn flagged_controls(&self) -> Vec<(NodeId, String)> {
        let mut flagged = Vec::new();
        for node in &self.nodes {
            let Ok(definition) = self.catalog.lookup_node_kind(node.kind) else {
                continue;
            };
            for key in node.controls.keys() {
                if !definition.config_schema().iter().any(|spec| spec.key == key) {
                    flagged.push((node.id.clone(), key.clone()));
                }
            }
        }
        flagged
    }

    // ==================== Connections ====================

    /// Validate and insert a connection.
    pub fn add_connection(&mut self, connection: Connection) -> GraphResult<ConnectionId> {
        ConnectionValidator::new(self).validate(&connection)?;

        let id = self.next_connection_id;
        self.next_connection_id = id.next();
        tracing::info!("Added connection {:?}: {}", id, connection);
        self.edges.push(Edge { id, connection });
        self.touch();
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> GraphResult<Connection> {
        let idx = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or(GraphError::ConnectionNotFound { connection_id: id })?;

        let edge = self.edges.remove(idx);
        self.touch();
        tracing::info!("Removed connection {:?}: {}", id, edge.connection);
        Ok(edge.connection)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Connections in insertion order.
    pub fn list_connections(&self) -> &[Edge] {
        &self.edges
    }

    pub fn connection_count(&self) -> usize {
        self.edges.len()
    }

    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.connection.target == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.connection.source == id)
    }

    /// The connection bound to `target`'s input `socket`, if any.
    pub fn binding(&self, target: &NodeId, socket: SocketName) -> Option<&Edge> {
        self.edges.iter().find(|e| {
            &e.connection.target == target && e.connection.target_input == socket
        })
    }

    /// A directed path `from → … → to` through existing connections,
    /// including both endpoints.
    pub fn path_between(&self, from: &NodeId, to: &NodeId) -> Option<Vec<NodeId>> {
        let mut parent: HashMap<&NodeId, &NodeId> = HashMap::new();
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                let mut path = vec![current.clone()];
                let mut cursor = current;
                while let Some(&prev) = parent.get(cursor) {
                    path.push(prev.clone());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            if !visited.insert(current) {
                continue;
            }

            for edge in &self.edges {
                let next = &edge.connection.target;
                if &edge.connection.source == current && !visited.contains(next) {
                    parent.entry(next).or_insert(current);
                    stack.push(next);
                }
            }
        }
        None
    }

    /// Remove every node and connection. Connection ids keep counting.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.touch();
        tracing::info!("Cleared graph");
    }

    // ==================== Rollback ====================

    pub(crate) fn checkpoint(&self) -> GraphCheckpoint {
        GraphCheckpoint {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            next_connection_id: self.next_connection_id,
            generation: self.generation,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: GraphCheckpoint) {
        self.nodes = checkpoint.nodes;
        self.edges = checkpoint.edges;
        self.next_connection_id = checkpoint.next_connection_id;
        self.generation = checkpoint.generation;
    }
}
