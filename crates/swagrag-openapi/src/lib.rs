//! OpenAPI document merging for swagrag.
//!
//! This crate loads OpenAPI documents into a format-independent tree, folds
//! them into a single document and renders the result.
//!
//! Paths are prefixed with the host each source declares, so identical
//! relative paths served by different backends stay distinct. The merged
//! document declares a single empty server.
//!
//! # Example
//!
//! ```ignore
//! use swagrag_openapi::{Format, OpenApiBuilder, load_file, render};
//!
//! let mut builder = OpenApiBuilder::new().title("Gateway").version("1.0.0");
//! builder.merge("users.yaml", load_file("users.yaml".as_ref())?);
//! builder.merge("orders.yaml", load_file("orders.yaml".as_ref())?);
//! let yaml = render(&builder.build(), Format::Yaml)?;
//! ```

mod builder;
mod error;
mod loader;
mod merge;
mod node;
mod types;

pub use builder::{MergeReport, OpenApiBuilder, OutputDocument};
pub use error::OpenApiError;
pub use loader::{Format, load_file, parse_document, render};
pub use merge::{
    Conflict, ConflictPolicy, MergePolicy, Section, deep_merge, deep_merge_with, merge_components,
    merge_extensions, merge_paths,
};
pub use node::{Mapping, Node, Scalar};
pub use types::*;

/// Result type for OpenAPI operations.
pub type Result<T> = std::result::Result<T, OpenApiError>;
