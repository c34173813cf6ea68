//! OpenAPI document builder for combining multiple sources.

use crate::merge::{Conflict, MergePolicy, merge_components, merge_extensions, merge_paths};
use crate::node::Mapping;
use crate::types::{Components, Info, Server, SourceDocument};
use serde::Serialize;

/// Builder for combining OpenAPI documents from multiple sources.
///
/// # Example
///
/// ```ignore
/// use swagrag_openapi::{OpenApiBuilder, parse_document};
///
/// let mut builder = OpenApiBuilder::new().title("Gateway").version("1.0.0");
/// builder.merge("users.yaml", parse_document(users)?);
/// builder.merge("orders.yaml", parse_document(orders)?);
/// let document = builder.build();
/// ```
///
/// # Conflict Resolution
///
/// See [`MergePolicy`]. By default:
///
/// - **Paths**: `host ‖ path` keys, first write wins, conflicts reported.
/// - **Components**: per kind, first write wins, conflicts reported.
/// - **Other fields**: deep merge, last write wins for scalars.
#[derive(Debug, Clone)]
pub struct OpenApiBuilder {
    openapi_version: String,
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    policy: MergePolicy,
    sources: Vec<String>,
    paths: Mapping,
    components: Components,
    extensions: Mapping,
}

/// What happened while merging one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Host the source's paths were prefixed with.
    pub effective_host: String,
    /// Declared servers that were ignored because only the first is used.
    pub ignored_servers: usize,
    /// Path and component keys some earlier source already defined.
    pub conflicts: Vec<Conflict>,
}

impl MergeReport {
    /// Whether the source merged without any warning.
    pub fn is_clean(&self) -> bool {
        self.ignored_servers == 0 && self.conflicts.is_empty()
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiBuilder {
    /// Default OpenAPI format version written to the output.
    pub const DEFAULT_OPENAPI_VERSION: &'static str = "3.0.0";

    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            openapi_version: Self::DEFAULT_OPENAPI_VERSION.to_string(),
            title: None,
            version: None,
            description: None,
            policy: MergePolicy::default(),
            sources: Vec::new(),
            paths: Mapping::new(),
            components: Components::new(),
            extensions: Mapping::new(),
        }
    }

    /// Set the OpenAPI format version of the output.
    pub fn openapi_version(mut self, version: impl Into<String>) -> Self {
        self.openapi_version = version.into();
        self
    }

    /// Set the API title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the API version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the API description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the conflict policy.
    pub fn policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Labels of the sources merged so far, in merge order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Fold one source document into the accumulated result.
    ///
    /// `label` names the source in diagnostics and in the synthesized title.
    /// The document's `openapi`, `info` and `servers` fields are not carried
    /// over; the output declares its own.
    pub fn merge(&mut self, label: impl Into<String>, document: SourceDocument) -> MergeReport {
        let label = label.into();
        let effective_host = document.effective_host().to_string();
        let ignored_servers = document.servers.len().saturating_sub(1);
        if ignored_servers > 0 {
            tracing::warn!(
                source = %label,
                host = %effective_host,
                "multiple servers defined; only the first is used"
            );
        }
        if let Some(declared) = &document.openapi
            && *declared != self.openapi_version
        {
            tracing::debug!(source = %label, %declared, "source declares a different openapi version");
        }

        let mut conflicts = merge_paths(
            &mut self.paths,
            &effective_host,
            document.paths,
            self.policy.paths,
        );
        conflicts.extend(merge_components(
            &mut self.components,
            document.components,
            self.policy.components,
        ));
        for conflict in &conflicts {
            tracing::warn!(source = %label, "{conflict}");
        }

        merge_extensions(
            &mut self.extensions,
            document.extensions,
            self.policy.extensions,
        );

        tracing::debug!(source = %label, host = %effective_host, "merged source");
        self.sources.push(label);

        MergeReport {
            effective_host,
            ignored_servers,
            conflicts,
        }
    }

    /// Build the final document.
    ///
    /// Title and version are resolved independently: each uses its configured
    /// value when set. A missing title names the sources passed to
    /// [`merge`](Self::merge), so files that failed to load are not listed.
    /// A missing version is left out.
    pub fn build(self) -> OutputDocument {
        let title = self
            .title
            .unwrap_or_else(|| format!("Combined API from {}", self.sources.join(", ")));

        OutputDocument {
            openapi: self.openapi_version,
            info: Info {
                title: Some(title),
                version: self.version,
                description: self.description,
            },
            servers: vec![Server::default()],
            paths: self.paths,
            components: self.components,
            extensions: self.extensions,
        }
    }
}

/// The merged document, ready to render.
///
/// Always declares exactly one server with an empty URL, since every path
/// already carries its host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    /// OpenAPI format version.
    pub openapi: String,
    /// Title, version and description of the combined API.
    pub info: Info,
    /// Always a single server with an empty URL.
    pub servers: Vec<Server>,
    /// Routes keyed by host and path.
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub paths: Mapping,
    /// Reusable definitions, first definition of each name kept.
    #[serde(skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    /// Every other top-level field, deep merged.
    #[serde(flatten)]
    pub extensions: Mapping,
}
