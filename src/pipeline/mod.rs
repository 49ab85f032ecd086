//! Pipeline graph core.
//!
//! An ML pipeline is a directed acyclic graph of stage nodes (data loader,
//! split, scaler, model, evaluate, ...) wired output-to-input through named
//! sockets. This module holds everything needed to build such a graph
//! safely and to order it for execution.
//!
//! # Architecture
//!
//! ```text
//! [Catalog] ──► [GraphModel] ◄── [TemplateInstantiator] ◄── [TemplateGallery]
//!                   │  ▲
//!                   │  └── [ConnectionValidator]
//!                   ▼
//!          [TopologicalScheduler] ──► [Schedule]
//! ```
//!
//! # Design
//!
//! - **Immutable catalog**: node definitions are constant data borrowed by graphs.
//! - **Gated mutation**: every connection passes the validator; failed
//!   operations leave the graph untouched.
//! - **Generation counter**: bumped on each mutation to invalidate cached schedules.
//! - **Single owner**: concurrent editors go through [`EditorBridge`] and an
//!   [`EditorSession`] that applies commands in order.

pub mod bridge;
pub mod catalog;
pub mod connection;
pub mod controls;
pub mod error;
pub mod gallery;
pub mod graph;
pub mod id;
pub mod node;
pub mod node_kind;
pub mod schedule;
pub mod scheduler;
pub mod session;
pub mod socket;
pub mod template;
pub mod validator;

pub use bridge::{EditorBridge, GraphCommand, GraphEvent, TopologySnapshot};
pub use catalog::{lookup_node_kind, Catalog, NodeDefinition};
pub use connection::{Connection, Edge};
pub use controls::{ControlKind, ControlSpec, ControlValue, Controls};
pub use error::{GraphError, GraphResult, MissingInput};
pub use gallery::{builtin_templates, TemplateGallery};
pub use graph::GraphModel;
pub use id::{ConnectionId, NodeId};
pub use node::{Node, Position};
pub use node_kind::NodeKind;
pub use schedule::{Schedule, ScheduleStats};
pub use scheduler::{schedule, TopologicalScheduler};
pub use session::EditorSession;
pub use socket::{lookup_socket, SocketDescriptor, SocketDirection, SocketName};
pub use template::{
    ConnectionRecord, IdRemapStrategy, InstantiationReport, NodeRecord, Template,
    TemplateInstantiator,
};
pub use validator::ConnectionValidator;
