//! Template gallery.
//!
//! Four quick-start pipelines ship with the crate. Users can add their own
//! by dropping template JSON files into the templates directory.

use crate::error::{BuilderError, Result, ResultExt};
use crate::pipeline::node_kind::NodeKind;
use crate::pipeline::socket::SocketName;
use crate::pipeline::template::{ConnectionRecord, NodeRecord, Template};
use std::path::Path;

/// Built-in and user templates, searchable by name.
#[derive(Debug, Clone)]
pub struct TemplateGallery {
    templates: Vec<Template>,
}

impl Default for TemplateGallery {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateGallery {
    /// Gallery holding only the built-in templates.
    pub fn builtin() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Built-in templates followed by every `*.json` template in `dir`,
    /// in file name order. A missing directory is not an error; files that
    /// fail to parse are skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut gallery = Self::builtin();
        if !dir.exists() {
            tracing::debug!("Template directory {} does not exist", dir.display());
            return Ok(gallery);
        }

        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir)
            .map_err(BuilderError::from)
            .with_context(|| format!("Failed to list templates in {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            match Template::load(&path) {
                Ok(mut template) => {
                    if template.name.is_empty() {
                        template.name = path
                            .file_stem()
                            .map(|s| s.to_string_lossy().into_owned())
                            .unwrap_or_default();
                    }
                    tracing::debug!("Loaded template '{}' from {}", template.name, path.display());
                    gallery.templates.push(template);
                }
                Err(e) => tracing::warn!("Skipping template {}: {}", path.display(), e),
            }
        }

        Ok(gallery)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn add(&mut self, template: Template) {
        self.templates.push(template);
    }

    /// Find a template by exact name, case-insensitive name or slug.
    pub fn find(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .or_else(|| self.templates.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
            .or_else(|| self.templates.iter().find(|t| t.slug() == name))
    }

    /// Like [`find`](Self::find), failing with a template error.
    pub fn get(&self, name: &str) -> Result<&Template> {
        self.find(name)
            .ok_or_else(|| BuilderError::Template(format!("No template named '{}'", name)))
    }
}

// ==================== Built-in Templates ====================

fn loader(id: &str, x: f64) -> NodeRecord {
    NodeRecord::new(id, NodeKind::DataLoader)
        .at(x, 100.0)
        .with_control("fileName", "data.csv")
}

fn split(id: &str, x: f64) -> NodeRecord {
    NodeRecord::new(id, NodeKind::DataSplit)
        .at(x, 100.0)
        .with_control("ratio", 0.8)
        .with_control("targetColumn", "target")
}

fn scaler(id: &str, x: f64) -> NodeRecord {
    NodeRecord::new(id, NodeKind::Scaler)
        .at(x, 50.0)
        .with_control("method", "StandardScaler")
}

fn classifier(id: &str, x: f64, y: f64) -> NodeRecord {
    NodeRecord::new(id, NodeKind::Classifier)
        .at(x, y)
        .with_control("algorithm", "RandomForest")
        .with_control("n_estimators", 100i64)
}

fn wire(source: &str, socket: SocketName, target: &str) -> ConnectionRecord {
    ConnectionRecord::same_socket(source, socket, target)
}

pub fn basic_classification() -> Template {
    Template::new(
        "Basic Classification",
        "Load, split, scale, train a classifier and evaluate it.",
    )
    .with_node(loader("node-1", 50.0))
    .with_node(split("node-2", 300.0))
    .with_node(scaler("node-3", 550.0))
    .with_node(classifier("node-4", 800.0, 50.0))
    .with_node(NodeRecord::new("node-5", NodeKind::Evaluate).at(1050.0, 100.0))
    .with_connection(wire("node-1", SocketName::Data, "node-2"))
    .with_connection(wire("node-2", SocketName::XTrain, "node-3"))
    .with_connection(wire("node-3", SocketName::XTrain, "node-4"))
    .with_connection(wire("node-2", SocketName::YTrain, "node-4"))
    .with_connection(wire("node-4", SocketName::Model, "node-5"))
    .with_connection(wire("node-2", SocketName::XTest, "node-5"))
    .with_connection(wire("node-2", SocketName::YTest, "node-5"))
}

pub fn feature_selection() -> Template {
    Template::new(
        "Feature Selection",
        "Scale, keep the best features, then train and evaluate.",
    )
    .with_node(loader("node-1", 50.0))
    .with_node(split("node-2", 300.0))
    .with_node(scaler("node-3", 550.0))
    .with_node(
        NodeRecord::new("node-4", NodeKind::FeatureSelection)
            .at(800.0, 50.0)
            .with_control("method", "SelectKBest")
            .with_control("k", 10i64),
    )
    .with_node(classifier("node-5", 1050.0, 50.0))
    .with_node(NodeRecord::new("node-6", NodeKind::Evaluate).at(1300.0, 100.0))
    .with_connection(wire("node-1", SocketName::Data, "node-2"))
    .with_connection(wire("node-2", SocketName::XTrain, "node-3"))
    .with_connection(wire("node-3", SocketName::XTrain, "node-4"))
    .with_connection(wire("node-2", SocketName::YTrain, "node-4"))
    .with_connection(wire("node-4", SocketName::XTrain, "node-5"))
    .with_connection(wire("node-2", SocketName::YTrain, "node-5"))
    .with_connection(wire("node-5", SocketName::Model, "node-6"))
    .with_connection(wire("node-2", SocketName::XTest, "node-6"))
    .with_connection(wire("node-2", SocketName::YTest, "node-6"))
}

pub fn hyperparameter_tuning() -> Template {
    Template::new(
        "Hyperparameter Tuning",
        "Search model hyperparameters with cross-validation.",
    )
    .with_node(loader("node-1", 50.0))
    .with_node(split("node-2", 300.0))
    .with_node(NodeRecord::new("node-3", NodeKind::HyperparamTune).at(550.0, 100.0))
    .with_node(NodeRecord::new("node-4", NodeKind::Evaluate).at(800.0, 100.0))
    .with_connection(wire("node-1", SocketName::Data, "node-2"))
    .with_connection(wire("node-2", SocketName::XTrain, "node-3"))
    .with_connection(wire("node-2", SocketName::YTrain, "node-3"))
    .with_connection(wire("node-3", SocketName::Model, "node-4"))
    .with_connection(wire("node-2", SocketName::XTest, "node-4"))
    .with_connection(wire("node-2", SocketName::YTest, "node-4"))
}

pub fn prediction_workflow() -> Template {
    Template::new(
        "Prediction Workflow",
        "Train a classifier, predict on the test set and score the predictions.",
    )
    .with_node(loader("node-1", 50.0))
    .with_node(split("node-2", 300.0))
    .with_node(classifier("node-3", 550.0, 100.0))
    .with_node(NodeRecord::new("node-4", NodeKind::Predict).at(800.0, 100.0))
    .with_node(NodeRecord::new("node-5", NodeKind::Evaluate).at(1050.0, 100.0))
    .with_connection(wire("node-1", SocketName::Data, "node-2"))
    .with_connection(wire("node-2", SocketName::XTrain, "node-3"))
    .with_connection(wire("node-2", SocketName::YTrain, "node-3"))
    .with_connection(wire("node-3", SocketName::Model, "node-4"))
    .with_connection(wire("node-2", SocketName::XTest, "node-4"))
    .with_connection(wire("node-4", SocketName::Prediction, "node-5"))
    .with_connection(wire("node-2", SocketName::YTest, "node-5"))
}

/// The quick-start templates, in gallery order.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        basic_classification(),
        feature_selection(),
        hyperparameter_tuning(),
        prediction_workflow(),
    ]
}
