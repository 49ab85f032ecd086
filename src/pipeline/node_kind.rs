//! Node kind enumeration.
//!
//! The kind vocabulary is part of the template interchange contract and must
//! stay stable: kinds are serialized by their camelCase wire names.

use crate::pipeline::error::GraphError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stage kinds a pipeline node can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    // Sources
    /// Loads a dataset from a file.
    DataLoader,

    // Preprocessing
    /// Splits a dataset into train/test features and targets.
    DataSplit,
    /// Normalizes feature matrices.
    Scaler,
    /// Keeps the most informative features.
    FeatureSelection,

    // Models
    /// Fits a classification model.
    Classifier,
    /// Fits a regression model.
    Regressor,
    /// Searches hyperparameters and yields the best model.
    HyperparamTune,

    // Consumers
    /// Produces predictions from a model.
    Predict,
    /// Scores a model or its predictions.
    Evaluate,
}

impl NodeKind {
    /// Wire name used by the template interchange format.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::DataLoader => "dataLoader",
            NodeKind::DataSplit => "dataSplit",
            NodeKind::Scaler => "scaler",
            NodeKind::FeatureSelection => "featureSelection",
            NodeKind::Classifier => "classifier",
            NodeKind::Regressor => "regressor",
            NodeKind::HyperparamTune => "hyperparamTune",
            NodeKind::Predict => "predict",
            NodeKind::Evaluate => "evaluate",
        }
    }

    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::DataLoader => "Data Loader",
            NodeKind::DataSplit => "Data Split",
            NodeKind::Scaler => "Scaler",
            NodeKind::FeatureSelection => "Feature Selection",
            NodeKind::Classifier => "Classifier",
            NodeKind::Regressor => "Regressor",
            NodeKind::HyperparamTune => "Hyperparameter Tuning",
            NodeKind::Predict => "Predict",
            NodeKind::Evaluate => "Evaluate",
        }
    }

    /// Get all available node kinds.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::DataLoader,
            NodeKind::DataSplit,
            NodeKind::Scaler,
            NodeKind::FeatureSelection,
            NodeKind::Classifier,
            NodeKind::Regressor,
            NodeKind::HyperparamTune,
            NodeKind::Predict,
            NodeKind::Evaluate,
        ]
    }

    /// Check if this kind fits a model.
    pub fn is_model(&self) -> bool {
        matches!(
            self,
            NodeKind::Classifier | NodeKind::Regressor | NodeKind::HyperparamTune
        )
    }

    /// Get a detailed description of what this node does.
    pub fn description(&self) -> &'static str {
        match self {
            NodeKind::DataLoader =>
                "Loads a CSV dataset.\n\
                 Configure fileName to pick the source file.",

            NodeKind::DataSplit =>
                "Splits data into train and test sets.\n\
                 ratio is the training fraction.\n\
                 targetColumn names the label column.",

            NodeKind::Scaler =>
                "Normalizes feature matrices.\n\
                 Fits on X_train, applies to X_test when wired.",

            NodeKind::FeatureSelection =>
                "Selects the k most informative features.\n\
                 Needs y_train to score features.",

            NodeKind::Classifier =>
                "Fits a classification model.\n\
                 Choose algorithm and n_estimators.",

            NodeKind::Regressor =>
                "Fits a regression model.\n\
                 Choose algorithm and n_estimators.",

            NodeKind::HyperparamTune =>
                "Cross-validated hyperparameter search.\n\
                 Emits the best model found.",

            NodeKind::Predict =>
                "Runs a fitted model on X_test.\n\
                 Emits predictions.",

            NodeKind::Evaluate =>
                "Scores a model against y_test.\n\
                 Accepts a model with X_test, or predictions.",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GraphError::UnknownKind {
                kind: s.to_string(),
            })
    }
}
