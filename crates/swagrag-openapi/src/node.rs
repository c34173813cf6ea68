//! Format-independent document tree.
//!
//! Parsed YAML is converted into [`Node`] rather than kept as the parser's
//! native value type, so the merge logic can match on shape alone.

use crate::Result;
use crate::error::OpenApiError;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping with sorted, deterministic iteration.
pub type Mapping = BTreeMap<String, Node>;

/// A node of a loaded document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// No value (`null`, `~`, or an empty document).
    #[default]
    Absent,
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered list.
    Sequence(Vec<Node>),
    /// A key → value mapping.
    Mapping(Mapping),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `true` or `false`.
    Bool(bool),
    /// An integer that fits in `i64`.
    Int(i64),
    /// A non-negative integer above `i64::MAX`.
    UInt(u64),
    /// Any other number.
    Float(f64),
    /// Text, including quoted numbers.
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl Node {
    /// Create a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    /// Whether this node carries no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    /// The mapping, if this node is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The items, if this node is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The leaf value, if this node is a scalar.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a key, if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the node's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Absent => "null",
            Node::Scalar(_) => "scalar",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::string(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::string(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Node::Mapping(value)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::Absent,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else if let Some(u) = n.as_u64() {
                Scalar::UInt(u)
            } else if let Some(x) = n.as_f64() {
                Scalar::Float(x)
            } else {
                Scalar::String(n.to_string())
            }),
            Value::String(s) => Node::string(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Absent => serializer.serialize_unit(),
            Node::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Node::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Node::Scalar(Scalar::UInt(u)) => serializer.serialize_u64(*u),
            Node::Scalar(Scalar::Float(x)) => serializer.serialize_f64(*x),
            Node::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl TryFrom<serde_yaml::Value> for Node {
    type Error = OpenApiError;

    fn try_from(value: serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => Node::Absent,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(yaml_number(&n)),
            Value::String(s) => Node::string(s),
            Value::Sequence(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, value) in map {
                    mapping.insert(yaml_key(key)?, Node::try_from(value)?);
                }
                Node::Mapping(mapping)
            }
            // Custom tags carry no meaning here; keep the tagged value.
            Value::Tagged(tagged) => Node::try_from(tagged.value)?,
        })
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else if let Some(x) = n.as_f64() {
        Scalar::Float(x)
    } else {
        Scalar::String(n.to_string())
    }
}

/// Unquoted keys such as `200:` arrive as numbers and are kept as text.
///
/// The text is rebuilt from the parsed value, not the source, so `1.10:`
/// becomes `"1.1"`. Quote such keys to keep them verbatim.
fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match Node::try_from(key)? {
        Node::Scalar(scalar) => Ok(scalar.to_string()),
        Node::Absent => Ok("null".to_string()),
        other => Err(OpenApiError::invalid(format!(
            "mapping keys must be scalars, found a {}",
            other.kind()
        ))),
    }
}
