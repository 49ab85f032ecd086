//! Node definition catalog.
//!
//! A `NodeDefinition` declares, for one node kind, which input sockets must be
//! bound, which may be bound, which outputs it produces and which controls it
//! understands. The built-in catalog is process-wide constant data created on
//! first use; graphs borrow a catalog and never mutate it.

use crate::pipeline::controls::{ControlKind, ControlSpec};
use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::node_kind::NodeKind;
use crate::pipeline::socket::{lookup_socket, SocketDescriptor, SocketDirection, SocketName};
use std::sync::OnceLock;

/// Socket and configuration contract of one node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    kind: NodeKind,
    sockets: Vec<SocketDescriptor>,
    config_schema: Vec<ControlSpec>,
}

impl NodeDefinition {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            sockets: Vec::new(),
            config_schema: Vec::new(),
        }
    }

    pub fn required_input(mut self, name: SocketName) -> Self {
        self.push_socket(SocketDescriptor::required_input(name));
        self
    }

    pub fn optional_input(mut self, name: SocketName) -> Self {
        self.push_socket(SocketDescriptor::optional_input(name));
        self
    }

    pub fn output(mut self, name: SocketName) -> Self {
        self.push_socket(SocketDescriptor::output(name));
        self
    }

    pub fn control(mut self, key: &'static str, kind: ControlKind) -> Self {
        self.config_schema.retain(|spec| spec.key != key);
        self.config_schema.push(ControlSpec::new(key, kind));
        self
    }

    /// Build a definition from wire socket names.
    ///
    /// Socket names are resolved here, so an unknown name is rejected when
    /// the definition is declared rather than when a connection uses it.
    pub fn from_names(
        kind: NodeKind,
        required_inputs: &[&str],
        optional_inputs: &[&str],
        outputs: &[&str],
    ) -> GraphResult<Self> {
        let mut definition = Self::new(kind);
        for name in required_inputs {
            definition = definition.required_input(lookup_socket(name)?);
        }
        for name in optional_inputs {
            definition = definition.optional_input(lookup_socket(name)?);
        }
        for name in outputs {
            definition = definition.output(lookup_socket(name)?);
        }
        Ok(definition)
    }

    fn push_socket(&mut self, socket: SocketDescriptor) {
        // An input declared twice keeps its latest requiredness.
        self.sockets
            .retain(|s| !(s.name == socket.name && s.direction == socket.direction));
        self.sockets.push(socket);
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn sockets(&self) -> &[SocketDescriptor] {
        &self.sockets
    }

    pub fn config_schema(&self) -> &[ControlSpec] {
        &self.config_schema
    }

    pub fn required_inputs(&self) -> impl Iterator<Item = SocketName> + '_ {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Input && s.required)
            .map(|s| s.name)
    }

    pub fn optional_inputs(&self) -> impl Iterator<Item = SocketName> + '_ {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Input && !s.required)
            .map(|s| s.name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = SocketName> + '_ {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Input)
            .map(|s| s.name)
    }

    pub fn outputs(&self) -> impl Iterator<Item = SocketName> + '_ {
        self.sockets
            .iter()
            .filter(|s| s.direction == SocketDirection::Output)
            .map(|s| s.name)
    }

    pub fn has_input(&self, name: SocketName) -> bool {
        self.inputs().any(|s| s == name)
    }

    pub fn has_output(&self, name: SocketName) -> bool {
        self.outputs().any(|s| s == name)
    }
}

/// Lookup table from node kind to definition.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    definitions: Vec<NodeDefinition>,
}

impl Catalog {
    /// Create a catalog from custom definitions. A later definition for the
    /// same kind replaces an earlier one.
    pub fn new(definitions: impl IntoIterator<Item = NodeDefinition>) -> Self {
        let mut catalog = Self::default();
        for definition in definitions {
            catalog.definitions.retain(|d| d.kind != definition.kind);
            catalog.definitions.push(definition);
        }
        catalog
    }

    /// The built-in catalog covering every [`NodeKind`].
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| Catalog::new(builtin_definitions()))
    }

    pub fn lookup_node_kind(&self, kind: NodeKind) -> GraphResult<&NodeDefinition> {
        self.definitions
            .iter()
            .find(|d| d.kind == kind)
            .ok_or_else(|| GraphError::UnknownKind {
                kind: kind.as_str().to_string(),
            })
    }

    /// Resolve a wire kind name (e.g. `"dataSplit"`).
    pub fn lookup_kind_name(&self, kind: &str) -> GraphResult<&NodeDefinition> {
        let kind: NodeKind = kind.parse()?;
        self.lookup_node_kind(kind)
    }

    pub fn lookup_socket(&self, name: &str) -> GraphResult<SocketName> {
        lookup_socket(name)
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.definitions.iter().any(|d| d.kind == kind)
    }

    pub fn definitions(&self) -> &[NodeDefinition] {
        &self.definitions
    }
}

/// Resolve a kind against the built-in catalog.
pub fn lookup_node_kind(kind: &str) -> GraphResult<&'static NodeDefinition> {
    Catalog::builtin().lookup_kind_name(kind)
}

fn builtin_definitions() -> Vec<NodeDefinition> {
    use SocketName::*;

    let model = |kind| {
        NodeDefinition::new(kind)
            .required_input(XTrain)
            .required_input(YTrain)
            .output(Model)
            .control("algorithm", ControlKind::String)
            .control("n_estimators", ControlKind::Int)
    };

    vec![
        NodeDefinition::new(NodeKind::DataLoader)
            .output(Data)
            .control("fileName", ControlKind::String),
        NodeDefinition::new(NodeKind::DataSplit)
            .required_input(Data)
            .output(XTrain)
            .output(YTrain)
            .output(XTest)
            .output(YTest)
            .control("ratio", ControlKind::Float)
            .control("targetColumn", ControlKind::String),
        NodeDefinition::new(NodeKind::Scaler)
            .required_input(XTrain)
            .optional_input(XTest)
            .output(XTrain)
            .output(XTest)
            .control("method", ControlKind::String),
        NodeDefinition::new(NodeKind::FeatureSelection)
            .required_input(XTrain)
            .required_input(YTrain)
            .optional_input(XTest)
            .output(XTrain)
            .output(XTest)
            .control("method", ControlKind::String)
            .control("k", ControlKind::Int),
        model(NodeKind::Classifier),
        model(NodeKind::Regressor),
        NodeDefinition::new(NodeKind::HyperparamTune)
            .required_input(XTrain)
            .required_input(YTrain)
            .output(Model)
            .control("algorithm", ControlKind::String)
            .control("cv", ControlKind::Int)
            .control("scoring", ControlKind::String),
        NodeDefinition::new(NodeKind::Predict)
            .required_input(Model)
            .required_input(XTest)
            .output(Prediction),
        NodeDefinition::new(NodeKind::Evaluate)
            .required_input(YTest)
            .optional_input(Model)
            .optional_input(XTest)
            .optional_input(Prediction)
            .output(Metrics),
    ]
}
