//! Reading documents from bytes and rendering the merged result.

use crate::Result;
use crate::builder::OutputDocument;
use crate::error::OpenApiError;
use crate::node::Node;
use crate::types::SourceDocument;
use std::path::Path;

/// Output format of [`render`].
///
/// Both are readable by [`parse_document`]; JSON is a subset of YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// Read and parse one document from disk.
pub fn load_file(path: &Path) -> Result<SourceDocument> {
    let bytes = std::fs::read(path).map_err(|source| OpenApiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&bytes)
}

/// Parse one YAML or JSON document.
pub fn parse_document(bytes: &[u8]) -> Result<SourceDocument> {
    let value: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(OpenApiError::Parse)?;
    SourceDocument::try_from(Node::try_from(value)?)
}

/// Render the merged document.
pub fn render(document: &OutputDocument, format: Format) -> Result<String> {
    match format {
        Format::Yaml => serde_yaml::to_string(document).map_err(OpenApiError::Yaml),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            Ok(json)
        }
    }
}
