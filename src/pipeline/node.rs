//! Node instances placed in a pipeline graph.

use crate::pipeline::controls::{ControlValue, Controls};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_kind::NodeKind;
use serde::{Deserialize, Serialize};

/// Editor canvas position. Presentation only; ignored by validation and
/// scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One pipeline stage instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub controls: Controls,
}

impl Node {
    /// Create a node labelled with its kind's display name.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
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

    pub fn control(&self, key: &str) -> Option<&ControlValue> {
        self.controls.get(key)
    }
}
