//! Typed OpenAPI structures.
//!
//! These types model only the parts of an OpenAPI 3 document that the merge
//! treats specially. Route definitions and component bodies stay opaque
//! [`Node`] trees.

use crate::Result;
use crate::error::OpenApiError;
use crate::node::{Mapping, Node};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The `info` block of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Info {
    /// Title of the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Version of the API (not of the OpenAPI format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of the `servers` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Server {
    /// Base URL of the host; empty when the document leaves it out.
    pub url: String,
    /// Optional description of the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The reusable definition kinds found under `components`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Parameters,
    Schemas,
    Responses,
    RequestBodies,
    Headers,
    Examples,
    SecuritySchemes,
    Links,
    Callbacks,
}

impl ComponentKind {
    /// Every kind, in output order.
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Parameters,
        ComponentKind::Schemas,
        ComponentKind::Responses,
        ComponentKind::RequestBodies,
        ComponentKind::Headers,
        ComponentKind::Examples,
        ComponentKind::SecuritySchemes,
        ComponentKind::Links,
        ComponentKind::Callbacks,
    ];

    /// The key used under `components`.
    pub fn key(self) -> &'static str {
        match self {
            ComponentKind::Parameters => "parameters",
            ComponentKind::Schemas => "schemas",
            ComponentKind::Responses => "responses",
            ComponentKind::RequestBodies => "requestBodies",
            ComponentKind::Headers => "headers",
            ComponentKind::Examples => "examples",
            ComponentKind::SecuritySchemes => "securitySchemes",
            ComponentKind::Links => "links",
            ComponentKind::Callbacks => "callbacks",
        }
    }

    /// Singular noun for diagnostics ("schema already exists ...").
    pub fn singular(self) -> &'static str {
        match self {
            ComponentKind::Parameters => "parameter",
            ComponentKind::Schemas => "schema",
            ComponentKind::Responses => "response",
            ComponentKind::RequestBodies => "request body",
            ComponentKind::Headers => "header",
            ComponentKind::Examples => "example",
            ComponentKind::SecuritySchemes => "security scheme",
            ComponentKind::Links => "link",
            ComponentKind::Callbacks => "callback",
        }
    }

    /// Parse a `components` key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Reusable definitions, one mapping per kind.
///
/// Definitions are opaque: they are stored and merged as whole values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    kinds: BTreeMap<ComponentKind, Mapping>,
}

impl Components {
    /// Create an empty set of components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Definitions of one kind, if any were added.
    pub fn get(&self, kind: ComponentKind) -> Option<&Mapping> {
        self.kinds.get(&kind)
    }

    /// Mutable definitions of one kind, created empty on first use.
    pub fn kind_mut(&mut self, kind: ComponentKind) -> &mut Mapping {
        self.kinds.entry(kind).or_default()
    }

    /// Add a definition, replacing any previous one with the same key.
    pub fn with(mut self, kind: ComponentKind, key: impl Into<String>, definition: Node) -> Self {
        self.kind_mut(kind).insert(key.into(), definition);
        self
    }

    /// Whether no kind holds any definition.
    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(Mapping::is_empty)
    }

    fn from_node(node: Node) -> Result<Self> {
        let map = match node {
            Node::Absent => return Ok(Self::new()),
            Node::Mapping(map) => map,
            other => {
                return Err(OpenApiError::invalid(format!(
                    "`components` must be a mapping, found a {}",
                    other.kind()
                )));
            }
        };

        let mut components = Self::new();
        for (key, value) in map {
            let Some(kind) = ComponentKind::from_key(&key) else {
                tracing::warn!(component = %key, "ignoring unknown component kind");
                continue;
            };
            match value {
                Node::Absent => {}
                Node::Mapping(definitions) => {
                    components.kinds.insert(kind, definitions);
                }
                other => {
                    return Err(OpenApiError::invalid(format!(
                        "`components.{key}` must be a mapping, found a {}",
                        other.kind()
                    )));
                }
            }
        }
        Ok(components)
    }
}

impl IntoIterator for Components {
    type Item = (ComponentKind, Mapping);
    type IntoIter = std::collections::btree_map::IntoIter<ComponentKind, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.into_iter()
    }
}

impl Serialize for Components {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.kinds
                .iter()
                .filter(|(_, definitions)| !definitions.is_empty())
                .map(|(kind, definitions)| (kind.key(), definitions)),
        )
    }
}

/// One parsed input document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// Declared OpenAPI format version.
    pub openapi: Option<String>,
    /// Declared `info` block.
    pub info: Option<Info>,
    /// Declared hosts. Only the first one is used.
    pub servers: Vec<Server>,
    /// Route definitions keyed by path.
    pub paths: Mapping,
    /// Reusable definitions.
    pub components: Components,
    /// Every other top-level field.
    pub extensions: Mapping,
}

impl SourceDocument {
    /// Host to prefix this document's paths with.
    ///
    /// The first declared server's URL, or the empty string when none is declared.
    pub fn effective_host(&self) -> &str {
        self.servers.first().map_or("", |server| server.url.as_str())
    }
}

impl TryFrom<Node> for SourceDocument {
    type Error = OpenApiError;

    fn try_from(node: Node) -> Result<Self> {
        let mut root = match node {
            // An empty file is an empty document.
            Node::Absent => Mapping::new(),
            Node::Mapping(map) => map,
            other => {
                return Err(OpenApiError::invalid(format!(
                    "document root must be a mapping, found a {}",
                    other.kind()
                )));
            }
        };

        let openapi = take_text(&mut root, "openapi", "openapi")?;
        let info = match root.remove("info") {
            None | Some(Node::Absent) => None,
            Some(Node::Mapping(mut info)) => Some(Info {
                title: take_text(&mut info, "title", "info.title")?,
                version: take_text(&mut info, "version", "info.version")?,
                description: take_text(&mut info, "description", "info.description")?,
            }),
            Some(other) => {
                return Err(OpenApiError::invalid(format!(
                    "`info` must be a mapping, found a {}",
                    other.kind()
                )));
            }
        };
        let servers = match root.remove("servers") {
            None | Some(Node::Absent) => Vec::new(),
            Some(Node::Sequence(items)) => items
                .into_iter()
                .map(server_from_node)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(OpenApiError::invalid(format!(
                    "`servers` must be a sequence, found a {}",
                    other.kind()
                )));
            }
        };
        let paths = match root.remove("paths") {
            None | Some(Node::Absent) => Mapping::new(),
            Some(Node::Mapping(paths)) => paths,
            Some(other) => {
                return Err(OpenApiError::invalid(format!(
                    "`paths` must be a mapping, found a {}",
                    other.kind()
                )));
            }
        };
        let components = Components::from_node(root.remove("components").unwrap_or_default())?;

        Ok(Self {
            openapi,
            info,
            servers,
            paths,
            components,
            extensions: root,
        })
    }
}

fn server_from_node(node: Node) -> Result<Server> {
    match node {
        Node::Mapping(mut server) => Ok(Server {
            url: take_text(&mut server, "url", "servers[].url")?.unwrap_or_default(),
            description: take_text(&mut server, "description", "servers[].description")?,
        }),
        other => Err(OpenApiError::invalid(format!(
            "`servers` entries must be mappings, found a {}",
            other.kind()
        ))),
    }
}

/// Remove `key` and render it as text. Numbers and booleans are accepted.
fn take_text(map: &mut Mapping, key: &str, field: &str) -> Result<Option<String>> {
    match map.remove(key) {
        None | Some(Node::Absent) => Ok(None),
        Some(Node::Scalar(scalar)) => Ok(Some(scalar.to_string())),
        Some(other) => Err(OpenApiError::invalid(format!(
            "`{field}` must be a scalar, found a {}",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> SourceDocument {
        SourceDocument::try_from(Node::from(value)).unwrap()
    }

    #[test]
    fn test_splits_known_fields() {
        let doc = document(json!({
            "openapi": "3.0.1",
            "info": {"title": "Users", "version": "2", "contact": {"name": "ops"}},
            "servers": [{"url": "https://users", "description": "prod"}],
            "paths": {"/users": {"get": {}}},
            "components": {"schemas": {"User": {"type": "object"}}},
            "tags": [{"name": "users"}]
        }));

        assert_eq!(doc.openapi.as_deref(), Some("3.0.1"));
        assert_eq!(doc.info.as_ref().and_then(|i| i.title.as_deref()), Some("Users"));
        assert_eq!(doc.servers[0].description.as_deref(), Some("prod"));
        assert!(doc.paths.contains_key("/users"));
        assert!(doc.components.get(ComponentKind::Schemas).unwrap().contains_key("User"));
        assert_eq!(doc.extensions.keys().collect::<Vec<_>>(), vec!["tags"]);
    }

    #[test]
    fn test_effective_host() {
        assert_eq!(document(json!({})).effective_host(), "");
        assert_eq!(
            document(json!({"servers": [{"url": "https://a"}]})).effective_host(),
            "https://a"
        );
        assert_eq!(
            document(json!({"servers": [{"url": "https://a"}, {"url": "https://b"}]}))
                .effective_host(),
            "https://a"
        );
    }

    #[test]
    fn test_server_without_url_is_empty_host() {
        let doc = document(json!({"servers": [{"description": "no url"}]}));
        assert_eq!(doc.effective_host(), "");
    }

    #[test]
    fn test_numeric_versions_are_text() {
        let doc = document(json!({"openapi": 3.0, "info": {"version": 2}}));

        assert_eq!(doc.openapi.as_deref(), Some("3.0"));
        assert_eq!(doc.info.unwrap().version.as_deref(), Some("2"));
    }

    #[test]
    fn test_rejects_non_mapping_paths() {
        let result = SourceDocument::try_from(Node::from(json!({"paths": ["/x"]})));
        assert!(matches!(result, Err(OpenApiError::InvalidSpec { .. })));
    }

    #[test]
    fn test_rejects_scalar_root() {
        let result = SourceDocument::try_from(Node::from("just text"));
        assert!(matches!(result, Err(OpenApiError::InvalidSpec { .. })));
    }

    #[test]
    fn test_unknown_component_kind_ignored() {
        let doc = document(json!({
            "components": {"widgets": {"A": {}}, "responses": {"NotFound": {}}}
        }));

        assert!(doc.components.get(ComponentKind::Responses).is_some());
        assert_eq!(doc.components.clone().into_iter().count(), 1);
    }

    #[test]
    fn test_empty_kinds_not_serialized() {
        let components = Components::new()
            .with(ComponentKind::Schemas, "User", Node::from(json!({"type": "object"})));
        let mut with_empty = components.clone();
        with_empty.kind_mut(ComponentKind::Links);

        let rendered = serde_json::to_value(&with_empty).unwrap();
        assert_eq!(rendered, json!({"schemas": {"User": {"type": "object"}}}));
    }
}
