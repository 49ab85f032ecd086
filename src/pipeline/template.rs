//! Pipeline templates and their insertion into a graph.
//!
//! A [`Template`] is the interchange record for a whole pipeline: plain string
//! ids, kinds and socket names, exactly as stored in JSON files. The
//! [`TemplateInstantiator`] resolves those strings against the graph's
//! catalog, picks collision-free node ids and inserts everything through the
//! ordinary graph operations. An insertion either completes or leaves the
//! graph exactly as it was.

use crate::error::{BuilderError, Result, ResultExt};
use crate::pipeline::catalog::Catalog;
use crate::pipeline::connection::Connection;
use crate::pipeline::controls::{ControlValue, Controls};
use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::graph::GraphModel;
use crate::pipeline::id::{ConnectionId, NodeId};
use crate::pipeline::node::{Node, Position};
use crate::pipeline::node_kind::NodeKind;
use crate::pipeline::socket::{lookup_socket, SocketName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ==================== Interchange Records ====================

/// A node as stored in a template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub controls: Controls,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind: kind.as_str().to_string(),
            label: kind.display_name().to_string(),
            position: Position::default(),
            controls: Controls::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_control(mut self, key: impl Into<String>, value: impl Into<ControlValue>) -> Self {
        self.controls.insert(key.into(), value.into());
        self
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            kind: node.kind.as_str().to_string(),
            label: node.label.clone(),
            position: node.position,
            controls: node.controls.clone(),
        }
    }
}

/// A connection as stored in a template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub source: String,
    pub source_output: String,
    pub target: String,
    pub target_input: String,
}

impl ConnectionRecord {
    pub fn same_socket(source: impl Into<String>, socket: SocketName, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_output: socket.as_str().to_string(),
            target: target.into(),
            target_input: socket.as_str().to_string(),
        }
    }
}

impl ConnectionRecord {
    /// A record with arbitrary socket names, resolved only on instantiation.
    pub fn new_raw(
        source: impl Into<String>,
        source_output: impl Into<String>,
        target: impl Into<String>,
        target_input: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_output: source_output.into(),
            target: target.into(),
            target_input: target_input.into(),
        }
    }
}

impl From<&Connection> for ConnectionRecord {
    fn from(conn: &Connection) -> Self {
        Self {
            source: conn.source.to_string(),
            source_output: conn.source_output.as_str().to_string(),
            target: conn.target.to_string(),
            target_input: conn.target_input.as_str().to_string(),
        }
    }
}

/// A complete pipeline in interchange form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl Template {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionRecord) -> Self {
        self.connections.push(connection);
        self
    }

    /// Lowercase, dash-separated form of the name, used for lookups.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a template from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(BuilderError::from)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse template {}", path.display()))
    }

    /// Save a template as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)
            .map_err(BuilderError::from)
            .with_context(|| format!("Failed to write template {}", path.display()))
    }
}

// ==================== Id Remapping ====================

/// How template node ids are renamed when they collide with graph ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdRemapStrategy {
    /// Shift numeric suffixes past the largest suffix in the graph.
    #[default]
    Offset,
    /// Prepend a fixed prefix.
    Prefix(String),
    /// Append a random 8-hex-digit tag.
    Random,
}

impl fmt::Display for IdRemapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRemapStrategy::Offset => write!(f, "offset"),
            IdRemapStrategy::Prefix(p) => write!(f, "prefix:{}", p),
            IdRemapStrategy::Random => write!(f, "random"),
        }
    }
}

impl FromStr for IdRemapStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "offset" => Ok(IdRemapStrategy::Offset),
            "random" => Ok(IdRemapStrategy::Random),
            _ => match s.strip_prefix("prefix:") {
                Some(p) if !p.is_empty() => Ok(IdRemapStrategy::Prefix(p.to_string())),
                _ => Err(format!(
                    "unknown remap strategy '{}' (expected offset, random or prefix:<p>)",
                    s
                )),
            },
        }
    }
}

impl IdRemapStrategy {
    fn candidate(&self, id: &str, offset: u64) -> String {
        match self {
            IdRemapStrategy::Offset => match split_numeric_suffix(id) {
                Some((stem, n)) => match n.checked_add(offset) {
                    Some(shifted) => format!("{}{}", stem, shifted),
                    None => format!("{}-{}", id, offset.saturating_add(1)),
                },
                None => format!("{}-{}", id, offset.saturating_add(1)),
            },
            IdRemapStrategy::Prefix(prefix) => format!("{}{}", prefix, id),
            IdRemapStrategy::Random => {
                let tag = uuid::Uuid::new_v4().simple().to_string();
                format!("{}-{}", id, &tag[..8])
            }
        }
    }
}

/// Split `node-12` into `("node-", 12)`.
fn split_numeric_suffix(id: &str) -> Option<(&str, u64)> {
    let stem = id.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.len() == id.len() {
        return None;
    }
    id[stem.len()..].parse().ok().map(|n| (stem, n))
}

fn unique(candidate: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&candidate) {
        return candidate;
    }
    let mut k = 2u64;
    loop {
        let id = format!("{}-{}", candidate, k);
        if !taken.contains(&id) {
            return id;
        }
        k += 1;
    }
}

// ==================== Instantiation ====================

/// What a successful insertion added to the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationReport {
    /// Graph ids of the inserted nodes, in template order
    pub inserted_node_ids: Vec<NodeId>,
    /// Ids of the inserted connections, in template order
    pub inserted_connection_ids: Vec<ConnectionId>,
    /// Template id to graph id
    pub id_map: BTreeMap<NodeId, NodeId>,
}

impl InstantiationReport {
    /// Whether any template id was renamed.
    pub fn remapped(&self) -> bool {
        self.id_map.iter().any(|(from, to)| from != to)
    }
}

struct ResolvedTemplate {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

/// Inserts templates into graphs
pub struct TemplateInstantiator;

impl TemplateInstantiator {
    pub fn instantiate(
        template: &Template,
        graph: &mut GraphModel<'_>,
        strategy: &IdRemapStrategy,
    ) -> GraphResult<InstantiationReport> {
        let resolved = Self::resolve(template, graph.catalog())?;
        let id_map = Self::plan_ids(&resolved.nodes, graph, strategy);

        let checkpoint = graph.checkpoint();
        match Self::insert(resolved, &id_map, graph) {
            Ok((inserted_node_ids, inserted_connection_ids)) => {
                tracing::info!(
                    "Instantiated template '{}': {} nodes, {} connections",
                    template.name,
                    inserted_node_ids.len(),
                    inserted_connection_ids.len()
                );
                Ok(InstantiationReport {
                    inserted_node_ids,
                    inserted_connection_ids,
                    id_map,
                })
            }
            Err(e) => {
                graph.restore(checkpoint);
                tracing::warn!("Rolled back template '{}': {}", template.name, e);
                Err(e)
            }
        }
    }

    /// Every problem that would stop `template` from being instantiated into
    /// an empty graph, in record order.
    ///
    /// Unlike [`instantiate`](Self::instantiate) this does not stop at the
    /// first bad record: nodes that fail are left out and connections are
    /// still checked against the nodes that made it in. Connections touching
    /// a rejected node are not reported again.
    pub fn diagnose(template: &Template, catalog: &Catalog) -> Vec<GraphError> {
        let mut problems = Vec::new();
        let mut scratch = GraphModel::with_catalog(catalog);
        scratch.set_warn_unknown_controls(false);
        let mut rejected: HashSet<NodeId> = HashSet::new();

        for record in &template.nodes {
            let id = NodeId::new(record.id.as_str());
            let result = record.kind.parse::<NodeKind>().and_then(|kind| {
                scratch.add_node(Node {
                    id: id.clone(),
                    kind,
                    label: record.label.clone(),
                    position: record.position,
                    controls: record.controls.clone(),
                })
            });
            if let Err(e) = result {
                if !scratch.contains_node(&id) {
                    rejected.insert(id);
                }
                problems.push(e);
            }
        }

        for record in &template.connections {
            let sockets = lookup_socket(&record.source_output)
                .and_then(|out| lookup_socket(&record.target_input).map(|input| (out, input)));
            let (source_output, target_input) = match sockets {
                Ok(sockets) => sockets,
                Err(e) => {
                    problems.push(e);
                    continue;
                }
            };
            let connection = Connection::new(
                record.source.as_str(),
                source_output,
                record.target.as_str(),
                target_input,
            );
            if rejected.contains(&connection.source) || rejected.contains(&connection.target) {
                continue;
            }
            if let Err(e) = scratch.add_connection(connection) {
                problems.push(e);
            }
        }

        problems
    }

    /// Resolve kinds and sockets and check the template is self-contained.
    fn resolve(template: &Template, catalog: &Catalog) -> GraphResult<ResolvedTemplate> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(template.nodes.len());
        for record in &template.nodes {
            let kind: NodeKind = record.kind.parse()?;
            catalog.lookup_node_kind(kind)?;

            let id = NodeId::new(record.id.as_str());
            if !seen.insert(id.clone()) {
                return Err(GraphError::DuplicateId { node_id: id });
            }
            nodes.push(Node {
                id,
                kind,
                label: record.label.clone(),
                position: record.position,
                controls: record.controls.clone(),
            });
        }

        let mut connections = Vec::with_capacity(template.connections.len());
        for record in &template.connections {
            let source_output = lookup_socket(&record.source_output)?;
            let target_input = lookup_socket(&record.target_input)?;
            let connection = Connection::new(
                record.source.as_str(),
                source_output,
                record.target.as_str(),
                target_input,
            );
            for endpoint in [&connection.source, &connection.target] {
                if !seen.contains(endpoint) {
                    return Err(GraphError::NodeNotFound {
                        node_id: endpoint.clone(),
                    });
                }
            }
            connections.push(connection);
        }

        Ok(ResolvedTemplate { nodes, connections })
    }

    /// Map every template id to the id it gets in the graph. Ids are kept
    /// unless at least one collides, in which case all are renamed.
    fn plan_ids(
        nodes: &[Node],
        graph: &GraphModel<'_>,
        strategy: &IdRemapStrategy,
    ) -> BTreeMap<NodeId, NodeId> {
        let collides = nodes.iter().any(|n| graph.contains_node(&n.id));
        if !collides {
            return nodes.iter().map(|n| (n.id.clone(), n.id.clone())).collect();
        }

        let mut taken: HashSet<String> = graph
            .list_nodes()
            .iter()
            .map(|n| n.id.to_string())
            .collect();
        let offset = graph
            .list_nodes()
            .iter()
            .filter_map(|n| split_numeric_suffix(n.id.as_str()).map(|(_, k)| k))
            .max()
            .unwrap_or(0);

        let mut id_map = BTreeMap::new();
        for node in nodes {
            let id = unique(strategy.candidate(node.id.as_str(), offset), &taken);
            taken.insert(id.clone());
            id_map.insert(node.id.clone(), NodeId::from(id));
        }

        tracing::info!(
            "Remapped {} template node ids ({} strategy)",
            id_map.len(),
            strategy
        );
        id_map
    }

    fn insert(
        resolved: ResolvedTemplate,
        id_map: &BTreeMap<NodeId, NodeId>,
        graph: &mut GraphModel<'_>,
    ) -> GraphResult<(Vec<NodeId>, Vec<ConnectionId>)> {
        let rename = |id: &NodeId| id_map.get(id).cloned().unwrap_or_else(|| id.clone());

        let mut node_ids = Vec::with_capacity(resolved.nodes.len());
        for mut node in resolved.nodes {
            node.id = rename(&node.id);
            node_ids.push(graph.add_node(node)?);
        }

        let mut connection_ids = Vec::with_capacity(resolved.connections.len());
        for mut connection in resolved.connections {
            connection.source = rename(&connection.source);
            connection.target = rename(&connection.target);
            connection_ids.push(graph.add_connection(connection)?);
        }

        Ok((node_ids, connection_ids))
    }
}

impl<'c> GraphModel<'c> {
    /// Insert a template using this graph's remap strategy.
    pub fn apply_template(&mut self, template: &Template) -> GraphResult<InstantiationReport> {
        let strategy = self.remap_strategy().clone();
        TemplateInstantiator::instantiate(template, self, &strategy)
    }

    /// Build a fresh graph holding only `template`.
    pub fn from_template(catalog: &'c Catalog, template: &Template) -> GraphResult<Self> {
        let mut graph = GraphModel::with_catalog(catalog);
        TemplateInstantiator::instantiate(template, &mut graph, &IdRemapStrategy::Offset)?;
        Ok(graph)
    }

    /// Export the graph in interchange form.
    pub fn to_template(&self, name: impl Into<String>, description: impl Into<String>) -> Template {
        Template {
            name: name.into(),
            description: description.into(),
            nodes: self.list_nodes().iter().map(NodeRecord::from).collect(),
            connections: self
                .list_connections()
                .iter()
                .map(|e| ConnectionRecord::from(&e.connection))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Template {
        Template::new("Chain", "loader into split")
            .with_node(NodeRecord::new("node-1", NodeKind::DataLoader))
            .with_node(NodeRecord::new("node-2", NodeKind::DataSplit))
            .with_connection(ConnectionRecord::same_socket("node-1", SocketName::Data, "node-2"))
    }

    #[test]
    fn test_instantiate_into_empty_graph_keeps_ids() {
        let mut graph = GraphModel::new();
        let report = graph.apply_template(&chain()).unwrap();
        assert!(!report.remapped());
        assert_eq!(
            report.inserted_node_ids,
            vec![NodeId::from("node-1"), NodeId::from("node-2")]
        );
        assert_eq!(report.inserted_connection_ids.len(), 1);
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_offset_remap_on_collision() {
        let mut graph = GraphModel::new();
        graph.apply_template(&chain()).unwrap();
        let report = graph.apply_template(&chain()).unwrap();

        assert!(report.remapped());
        assert_eq!(
            report.inserted_node_ids,
            vec![NodeId::from("node-3"), NodeId::from("node-4")]
        );
        let edge = graph.connection(report.inserted_connection_ids[0]).unwrap();
        assert_eq!(edge.connection.source, NodeId::from("node-3"));
        assert_eq!(edge.connection.target, NodeId::from("node-4"));
    }

    #[test]
    fn test_offset_without_numeric_suffix() {
        let mut graph = GraphModel::new();
        graph.add_node(Node::new("loader", NodeKind::DataLoader)).unwrap();
        let template = Template::default().with_node(NodeRecord::new("loader", NodeKind::DataLoader));

        let report = graph.apply_template(&template).unwrap();
        assert_eq!(report.inserted_node_ids, vec![NodeId::from("loader-1")]);
    }

    #[test]
    fn test_prefix_remap() {
        let mut graph = GraphModel::new();
        graph.apply_template(&chain()).unwrap();
        let report =
            TemplateInstantiator::instantiate(&chain(), &mut graph, &IdRemapStrategy::Prefix("copy-".into()))
                .unwrap();
        assert_eq!(
            report.inserted_node_ids,
            vec![NodeId::from("copy-node-1"), NodeId::from("copy-node-2")]
        );
    }

    #[test]
    fn test_prefix_remap_bumps_counter() {
        let mut graph = GraphModel::new();
        graph.add_node(Node::new("node-1", NodeKind::DataLoader)).unwrap();
        graph.add_node(Node::new("x-node-1", NodeKind::DataLoader)).unwrap();
        let template = Template::default().with_node(NodeRecord::new("node-1", NodeKind::DataLoader));

        let report =
            TemplateInstantiator::instantiate(&template, &mut graph, &IdRemapStrategy::Prefix("x-".into()))
                .unwrap();
        assert_eq!(report.inserted_node_ids, vec![NodeId::from("x-node-1-2")]);
    }

    #[test]
    fn test_random_remap() {
        let mut graph = GraphModel::new();
        graph.apply_template(&chain()).unwrap();
        let report =
            TemplateInstantiator::instantiate(&chain(), &mut graph, &IdRemapStrategy::Random).unwrap();
        for id in &report.inserted_node_ids {
            let (stem, tag) = id.as_str().rsplit_once('-').unwrap();
            assert!(stem.starts_with("node-"));
            assert_eq!(tag.len(), 8);
            assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_unknown_kind_rejected_before_insertion() {
        let mut template = chain();
        template.nodes[1].kind = "transformer".into();
        let mut graph = GraphModel::new();
        let err = graph.apply_template(&template).unwrap_err();
        assert_eq!(err, GraphError::UnknownKind { kind: "transformer".into() });
        assert!(graph.is_empty());
        assert_eq!(graph.generation(), 0);
    }

    #[test]
    fn test_unknown_socket_rejected() {
        let mut template = chain();
        template.connections[0].target_input = "features".into();
        let err = GraphModel::new().apply_template(&template).unwrap_err();
        assert_eq!(err, GraphError::UnknownSocket { name: "features".into() });
    }

    #[test]
    fn test_duplicate_template_id_rejected() {
        let template = chain().with_node(NodeRecord::new("node-1", NodeKind::Scaler));
        let err = GraphModel::new().apply_template(&template).unwrap_err();
        assert_eq!(err, GraphError::DuplicateId { node_id: NodeId::from("node-1") });
    }

    #[test]
    fn test_dangling_connection_rejected() {
        let template = chain().with_connection(ConnectionRecord::same_socket(
            "node-2",
            SocketName::XTrain,
            "node-9",
        ));
        let err = GraphModel::new().apply_template(&template).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound { node_id: NodeId::from("node-9") });
    }

    #[test]
    fn test_failure_midway_rolls_back() {
        let mut graph = GraphModel::new();
        graph.apply_template(&chain()).unwrap();
        let generation = graph.generation();
        let ids_before: Vec<_> = graph.list_nodes().iter().map(|n| n.id.clone()).collect();

        // The second connection rebinds node-2's data input.
        let template = chain()
            .with_node(NodeRecord::new("node-3", NodeKind::DataLoader))
            .with_connection(ConnectionRecord::same_socket("node-3", SocketName::Data, "node-2"));
        let err = graph.apply_template(&template).unwrap_err();
        assert!(matches!(err, GraphError::InputAlreadyBound { .. }));

        let ids_after: Vec<_> = graph.list_nodes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.generation(), generation);

        // Connection ids continue from where they were before the failed insert.
        let report = graph.apply_template(&chain()).unwrap();
        assert_eq!(report.inserted_connection_ids, vec![ConnectionId(1)]);
    }

    #[test]
    fn test_export_and_reimport() {
        let graph = GraphModel::from_template(Catalog::builtin(), &chain()).unwrap();
        let exported = graph.to_template("Chain", "loader into split");
        assert_eq!(exported, chain());

        let json = exported.to_json_string().unwrap();
        assert!(json.contains("\"sourceOutput\": \"data\""));
        assert_eq!(Template::from_json_str(&json).unwrap(), exported);
    }

    #[test]
    fn test_interchange_defaults() {
        let template = Template::from_json_str(r#"{ "nodes": [{ "id": "a", "kind": "dataLoader" }] }"#)
            .unwrap();
        assert_eq!(template.name, "");
        assert!(template.connections.is_empty());
        assert_eq!(template.nodes[0].position, Position::default());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("offset".parse::<IdRemapStrategy>(), Ok(IdRemapStrategy::Offset));
        assert_eq!("random".parse::<IdRemapStrategy>(), Ok(IdRemapStrategy::Random));
        assert_eq!(
            "prefix:copy-".parse::<IdRemapStrategy>(),
            Ok(IdRemapStrategy::Prefix("copy-".into()))
        );
        assert!("prefix:".parse::<IdRemapStrategy>().is_err());
        assert!("shuffle".parse::<IdRemapStrategy>().is_err());
    }

    #[test]
    fn test_slug() {
        assert_eq!(Template::new("Basic Classification", "").slug(), "basic-classification");
        assert_eq!(Template::new("  Feature -- Selection! ", "").slug(), "feature-selection");
    }

    #[test]
    fn test_diagnose_reports_every_bad_record() {
        let template = chain()
            .with_node(NodeRecord::new("node-3", NodeKind::Scaler))
            .with_node(NodeRecord::new("node-4", NodeKind::Classifier))
            .with_connection(ConnectionRecord::same_socket("node-1", SocketName::XTrain, "node-3"))
            .with_connection(ConnectionRecord::new_raw("node-2", "X_train", "node-4", "model"))
            .with_connection(ConnectionRecord::same_socket("node-2", SocketName::XTrain, "node-3"));

        let problems = TemplateInstantiator::diagnose(&template, Catalog::builtin());
        assert_eq!(
            problems,
            vec![
                GraphError::SocketNotFound {
                    node_id: NodeId::from("node-1"),
                    socket: SocketName::XTrain,
                    direction: crate::pipeline::socket::SocketDirection::Output,
                },
                GraphError::SocketNotFound {
                    node_id: NodeId::from("node-4"),
                    socket: SocketName::Model,
                    direction: crate::pipeline::socket::SocketDirection::Input,
                },
            ]
        );

        let mut fixed = template.clone();
        fixed.connections.remove(2);
        fixed.connections.remove(1);
        assert!(TemplateInstantiator::diagnose(&fixed, Catalog::builtin()).is_empty());
    }

    #[test]
    fn test_diagnose_skips_connections_of_rejected_nodes() {
        let mut template = chain()
            .with_node(NodeRecord::new("node-3", NodeKind::Scaler).with_control("method", 3i64))
            .with_connection(ConnectionRecord::same_socket("node-2", SocketName::XTrain, "node-3"))
            .with_connection(ConnectionRecord::new_raw("node-1", "features", "node-2", "data"));
        template.nodes[0].kind = "csvLoader".into();

        let problems = TemplateInstantiator::diagnose(&template, Catalog::builtin());
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0], GraphError::UnknownKind { kind: "csvLoader".into() });
        assert!(matches!(problems[1], GraphError::InvalidControl { ref key, .. } if key == "method"));
        assert_eq!(problems[2], GraphError::UnknownSocket { name: "features".into() });
    }

    #[test]
    fn test_diagnose_clean_template() {
        assert!(TemplateInstantiator::diagnose(&chain(), Catalog::builtin()).is_empty());
    }
}
