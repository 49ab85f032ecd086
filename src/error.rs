//! Error handling for the pipeline builder application
//!
//! Graph operations fail with [`GraphError`](crate::pipeline::GraphError).
//! Everything around them (configuration, template files, the CLI) reports
//! [`BuilderError`], which wraps graph errors and adds context.

use crate::pipeline::GraphError;
use thiserror::Error;

/// Main error type for pipeline builder operations
#[derive(Error, Debug)]
pub enum BuilderError {
    /// Errors raised by the graph model, validator or scheduler
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to template files and the gallery
    #[error("Template error: {0}")]
    Template(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BuilderError>,
    },
}

impl BuilderError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BuilderError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The underlying graph error, looking through any context layers.
    pub fn as_graph_error(&self) -> Option<&GraphError> {
        match self {
            BuilderError::Graph(e) => Some(e),
            BuilderError::WithContext { source, .. } => source.as_graph_error(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(e: serde_json::Error) -> Self {
        BuilderError::Serialization(e.to_string())
    }
}

/// Result type alias for pipeline builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, GraphError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BuilderError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| BuilderError::from(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NodeId;

    #[test]
    fn test_error_display() {
        let err = BuilderError::Template("empty file".to_string());
        assert_eq!(err.to_string(), "Template error: empty file");
    }

    #[test]
    fn test_error_with_context() {
        let err = BuilderError::Config("bad value".to_string());
        let with_ctx = err.with_context("Failed to load config.toml");
        assert!(with_ctx.to_string().contains("Failed to load config.toml"));
        assert!(with_ctx.to_string().contains("bad value"));
    }

    #[test]
    fn test_graph_error_context() {
        let result: std::result::Result<(), GraphError> = Err(GraphError::NodeNotFound {
            node_id: NodeId::from("node-3"),
        });
        let err = result.context("Applying template").unwrap_err();
        assert!(err.to_string().starts_with("Applying template: "));
        assert_eq!(
            err.as_graph_error(),
            Some(&GraphError::NodeNotFound {
                node_id: NodeId::from("node-3")
            })
        );
    }
}
