//! Node configuration controls.
//!
//! Controls are the per-node settings edited in the inspector (file name,
//! split ratio, algorithm, ...). Each node kind declares a schema of expected
//! keys and value kinds; values are checked against it when a node is created
//! or its controls are replaced.

use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Control values keyed by control name.
pub type Controls = BTreeMap<String, ControlValue>;

/// A single control value. Deserialized untagged, so `100` is an `Int` and
/// `0.8` is a `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ControlValue {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlValue::Bool(_) => ControlKind::Bool,
            ControlValue::Int(_) => ControlKind::Int,
            ControlValue::Float(_) => ControlKind::Float,
            ControlValue::String(_) => ControlKind::String,
        }
    }

    /// Whether this value is acceptable where `expected` is declared.
    /// Integers widen to floats.
    pub fn conforms_to(&self, expected: ControlKind) -> bool {
        match (self, expected) {
            (ControlValue::Int(_), ControlKind::Float) => true,
            _ => self.kind() == expected,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ControlValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ControlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ControlValue::Float(v) => Some(*v),
            ControlValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ControlValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ControlValue {
    fn from(v: bool) -> Self {
        ControlValue::Bool(v)
    }
}

impl From<i64> for ControlValue {
    fn from(v: i64) -> Self {
        ControlValue::Int(v)
    }
}

impl From<f64> for ControlValue {
    fn from(v: f64) -> Self {
        ControlValue::Float(v)
    }
}

impl From<&str> for ControlValue {
    fn from(v: &str) -> Self {
        ControlValue::String(v.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(v: String) -> Self {
        ControlValue::String(v)
    }
}

/// The declared kind of a control in a node schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Bool,
    Int,
    Float,
    String,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKind::Bool => f.write_str("bool"),
            ControlKind::Int => f.write_str("int"),
            ControlKind::Float => f.write_str("float"),
            ControlKind::String => f.write_str("string"),
        }
    }
}

/// One entry of a node kind's configuration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSpec {
    pub key: &'static str,
    pub kind: ControlKind,
}

impl ControlSpec {
    pub const fn new(key: &'static str, kind: ControlKind) -> Self {
        Self { key, kind }
    }
}

/// Check `controls` against `schema`.
///
/// Returns the keys that are not part of the schema; those are allowed but
/// flagged. A schema key holding a value of the wrong kind is an error.
pub fn check_controls(
    node_id: &NodeId,
    controls: &Controls,
    schema: &[ControlSpec],
) -> GraphResult<Vec<String>> {
    let mut unknown = Vec::new();

    for (key, value) in controls {
        match schema.iter().find(|spec| spec.key == key) {
            Some(spec) if !value.conforms_to(spec.kind) => {
                return Err(GraphError::InvalidControl {
                    node_id: node_id.clone(),
                    key: key.clone(),
                    expected: spec.kind,
                });
            }
            Some(_) => {}
            None => unknown.push(key.clone()),
        }
    }

    Ok(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[ControlSpec] = &[
        ControlSpec::new("ratio", ControlKind::Float),
        ControlSpec::new("targetColumn", ControlKind::String),
    ];

    #[test]
    #[allow(clippy::approx_constant)] // Intentionally using 3.14 as test value, not PI
    fn test_control_value_accessors() {
        assert_eq!(ControlValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ControlValue::Int(42).as_int(), Some(42));
        assert_eq!(ControlValue::Float(3.14).as_float(), Some(3.14));
        assert_eq!(ControlValue::Int(2).as_float(), Some(2.0));
        assert_eq!(ControlValue::String("hello".into()).as_str(), Some("hello"));
    }

    #[test]
    fn test_untagged_deserialization() {
        let controls: Controls =
            serde_json::from_str(r#"{"ratio": 0.8, "n_estimators": 100, "method": "StandardScaler", "shuffle": true}"#)
                .unwrap();
        assert_eq!(controls["ratio"], ControlValue::Float(0.8));
        assert_eq!(controls["n_estimators"], ControlValue::Int(100));
        assert_eq!(controls["method"], ControlValue::from("StandardScaler"));
        assert_eq!(controls["shuffle"], ControlValue::Bool(true));
    }

    #[test]
    fn test_check_controls_flags_unknown_keys() {
        let mut controls = Controls::new();
        controls.insert("ratio".into(), ControlValue::Float(0.7));
        controls.insert("seed".into(), ControlValue::Int(42));

        let unknown = check_controls(&NodeId::from("split"), &controls, SCHEMA).unwrap();
        assert_eq!(unknown, vec!["seed".to_string()]);
    }

    #[test]
    fn test_check_controls_widens_int_to_float() {
        let mut controls = Controls::new();
        controls.insert("ratio".into(), ControlValue::Int(1));
        assert!(check_controls(&NodeId::from("split"), &controls, SCHEMA)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_check_controls_rejects_wrong_kind() {
        let mut controls = Controls::new();
        controls.insert("targetColumn".into(), ControlValue::Int(3));

        let err = check_controls(&NodeId::from("split"), &controls, SCHEMA).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidControl {
                node_id: NodeId::from("split"),
                key: "targetColumn".to_string(),
                expected: ControlKind::String,
            }
        );
    }
}
