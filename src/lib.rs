//! # Pipeline Builder: typed ML pipeline graphs
//!
//! A graph model for visual machine-learning pipeline editors. Nodes are
//! pipeline stages (data loader, split, scaler, model, evaluate, ...) wired
//! through named sockets such as `X_train` or `model`. The crate guarantees
//! that every graph it holds is well-formed and produces a deterministic
//! execution order for an external executor.
//!
//! ## Architecture
//!
//! - **Catalog**: immutable node definitions (sockets and control schemas)
//! - **Graph model**: owns nodes and connections; every mutation is validated
//! - **Templates**: interchange records inserted atomically with id remapping
//! - **Scheduler**: Kahn's algorithm with ties broken by natural id order
//! - **Session**: crossbeam command/event channels serializing editor views
//!
//! ## Configuration
//!
//! Editor and logging settings are read from `config.toml` under
//! `dev.pipeline-builder` in the platform config directory; user templates
//! are read from the platform data directory. See [`config`].
//!
//! ## Example
//!
//! ```ignore
//! use pipeline_builder::pipeline::{gallery, schedule, GraphModel};
//!
//! let mut graph = GraphModel::new();
//! graph.apply_template(&gallery::basic_classification())?;
//! let schedule = schedule(&graph)?;
//! for id in &schedule {
//!     println!("{id}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{BuilderError, Result, ResultExt};
pub use pipeline::{
    Connection, GraphError, GraphModel, Node, NodeId, NodeKind, Schedule, SocketName, Template,
};
