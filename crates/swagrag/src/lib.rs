//! swagrag - combine OpenAPI documents served by different hosts into one.
//!
//! Each source's paths are prefixed with its first server URL, so identical
//! relative paths on different backends stay distinct. The merged document
//! declares a single empty server; routing on the prefix is left to a gateway
//! in front of the backends.
//!
//! The merge itself lives in [`swagrag_openapi`]. This crate reads the
//! command line, loads the sources in order and writes the result.
//!
//! # Failure handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Fewer than two distinct sources | usage error, nothing is read |
//! | A source cannot be read or parsed | logged, source skipped |
//! | Path or component key already merged | logged, later value dropped |
//! | No source could be loaded | run fails |
//! | Rendering the result fails | run fails, nothing written |

pub mod config;
pub mod telemetry;

pub use config::{Cli, ConfigError, MergeConfig, OutputFormat};

use std::io::Write;
use swagrag_openapi::{OpenApiError, OutputDocument, load_file, render};
use thiserror::Error;

/// Errors that end a run after configuration succeeded.
#[derive(Debug, Error)]
pub enum RunError {
    /// Every requested source failed to load.
    #[error("none of the {requested} source files could be loaded")]
    NoUsableSources { requested: usize },

    /// The merged document could not be rendered.
    #[error("failed to render merged document: {0}")]
    Render(#[source] OpenApiError),

    /// The rendered document could not be written.
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

/// Load every configured source in order and merge them.
///
/// Sources that fail to load are logged and skipped.
pub fn merge_sources(config: &MergeConfig) -> Result<OutputDocument, RunError> {
    let mut builder = config.builder();

    for path in &config.files {
        let label = path.display().to_string();
        let document = match load_file(path) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(source = %label, "skipping source: {err}");
                continue;
            }
        };
        builder.merge(label, document);
    }

    if builder.sources().is_empty() {
        return Err(RunError::NoUsableSources {
            requested: config.files.len(),
        });
    }
    tracing::info!(
        merged = builder.sources().len(),
        requested = config.files.len(),
        "merged sources"
    );

    Ok(builder.build())
}

/// Merge the configured sources and write the result to `out`.
///
/// The document is fully rendered before anything is written.
pub fn run(config: &MergeConfig, out: &mut impl Write) -> Result<(), RunError> {
    let document = merge_sources(config)?;
    let rendered = render(&document, config.format).map_err(RunError::Render)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
