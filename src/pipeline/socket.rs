//! Socket registry for the node system.
//!
//! Each node kind declares its sockets (inputs/outputs) from the fixed
//! vocabulary below. Two sockets are compatible when their names are equal;
//! there is no structural typing beyond the name.

use crate::pipeline::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The artifact flowing through a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SocketName {
    /// Loaded raw dataset.
    #[serde(rename = "data")]
    Data,
    /// Training features.
    #[serde(rename = "X_train")]
    XTrain,
    /// Training targets.
    #[serde(rename = "y_train")]
    YTrain,
    /// Test features.
    #[serde(rename = "X_test")]
    XTest,
    /// Test targets.
    #[serde(rename = "y_test")]
    YTest,
    /// Fitted model.
    #[serde(rename = "model")]
    Model,
    /// Model predictions.
    #[serde(rename = "prediction")]
    Prediction,
    /// Evaluation metrics.
    #[serde(rename = "metrics")]
    Metrics,
}

impl SocketName {
    /// Wire name used by the template interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketName::Data => "data",
            SocketName::XTrain => "X_train",
            SocketName::YTrain => "y_train",
            SocketName::XTest => "X_test",
            SocketName::YTest => "y_test",
            SocketName::Model => "model",
            SocketName::Prediction => "prediction",
            SocketName::Metrics => "metrics",
        }
    }

    /// Every registered socket name.
    pub fn all() -> &'static [SocketName] {
        &[
            SocketName::Data,
            SocketName::XTrain,
            SocketName::YTrain,
            SocketName::XTest,
            SocketName::YTest,
            SocketName::Model,
            SocketName::Prediction,
            SocketName::Metrics,
        ]
    }

    pub fn description(&self) -> &'static str {
        match self {
            SocketName::Data => "Loaded source dataset (tabular frame)",
            SocketName::XTrain => "Feature matrix used for training",
            SocketName::YTrain => "Target values used for training",
            SocketName::XTest => "Feature matrix held out for testing",
            SocketName::YTest => "Target values held out for testing",
            SocketName::Model => "Fitted model",
            SocketName::Prediction => "Predictions produced by a model",
            SocketName::Metrics => "Evaluation metrics of a model",
        }
    }

    /// Wiring contract: sockets connect only to sockets of the same name.
    #[inline]
    pub fn is_compatible_with(self, other: SocketName) -> bool {
        self == other
    }
}

impl fmt::Display for SocketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocketName {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_socket(s)
    }
}

/// Resolve a socket name against the registry.
pub fn lookup_socket(name: &str) -> GraphResult<SocketName> {
    SocketName::all()
        .iter()
        .copied()
        .find(|socket| socket.as_str() == name)
        .ok_or_else(|| GraphError::UnknownSocket {
            name: name.to_string(),
        })
}

/// Whether a socket is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocketDirection {
    Input,
    Output,
}

impl fmt::Display for SocketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketDirection::Input => f.write_str("input"),
            SocketDirection::Output => f.write_str("output"),
        }
    }
}

/// A socket as it appears on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketDescriptor {
    pub name: SocketName,
    pub direction: SocketDirection,
    /// Only meaningful for inputs; outputs are never required.
    pub required: bool,
}

impl SocketDescriptor {
    pub const fn required_input(name: SocketName) -> Self {
        Self {
            name,
            direction: SocketDirection::Input,
            required: true,
        }
    }

    pub const fn optional_input(name: SocketName) -> Self {
        Self {
            name,
            direction: SocketDirection::Input,
            required: false,
        }
    }

    pub const fn output(name: SocketName) -> Self {
        Self {
            name,
            direction: SocketDirection::Output,
            required: false,
        }
    }
}
