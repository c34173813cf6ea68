//! Command-line surface and the validated configuration built from it.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use swagrag_openapi::{Format, OpenApiBuilder};
use thiserror::Error;

/// Combine OpenAPI documents served by different hosts into one.
///
/// Paths of each document are prefixed with its first server URL. The
/// result is written to stdout and declares a single empty server.
#[derive(Debug, Parser)]
#[command(name = "swagrag", version)]
pub struct Cli {
    /// Location of an OpenAPI document (comma separated or repeated)
    #[arg(
        long = "file",
        short = 'f',
        value_name = "PATH",
        value_delimiter = ',',
        required = true
    )]
    pub files: Vec<PathBuf>,

    /// OpenAPI version to print in the output
    #[arg(long, value_name = "VERSION", default_value = OpenApiBuilder::DEFAULT_OPENAPI_VERSION)]
    pub openapi_version: String,

    /// API title to print in the output (default names the source files)
    #[arg(long, value_name = "TITLE")]
    pub api_title: Option<String>,

    /// API version to print in the output
    #[arg(long, value_name = "VERSION")]
    pub api_version: Option<String>,

    /// API description to print in the output
    #[arg(long, value_name = "TEXT")]
    pub api_description: Option<String>,

    /// Format of the merged document
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output_format: OutputFormat,

    /// Increase diagnostic verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Json => Format::Json,
        }
    }
}

/// Configuration errors detected before any source is read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least {} distinct files must be specified, got {found}", MergeConfig::MIN_SOURCES)]
    TooFewSources { found: usize },
}

/// Everything the merge driver needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    /// Source documents, in merge order, without duplicates.
    pub files: Vec<PathBuf>,
    /// `openapi` field of the output.
    pub openapi_version: String,
    /// `info.title`; synthesized from the sources when unset.
    pub title: Option<String>,
    /// `info.version`; omitted when unset.
    pub version: Option<String>,
    /// `info.description`; omitted when unset.
    pub description: Option<String>,
    /// Output format.
    pub format: Format,
}

impl MergeConfig {
    /// Fewest distinct sources a run accepts.
    pub const MIN_SOURCES: usize = 2;

    /// Create a configuration with default metadata.
    ///
    /// Empty paths are dropped and repeated paths are kept once, in order of
    /// first appearance.
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Result<Self, ConfigError> {
        let mut distinct: Vec<PathBuf> = Vec::new();
        for file in files {
            if file.as_os_str().is_empty() {
                continue;
            }
            if distinct.contains(&file) {
                tracing::warn!(path = %file.display(), "ignoring repeated source file");
                continue;
            }
            distinct.push(file);
        }

        if distinct.len() < Self::MIN_SOURCES {
            return Err(ConfigError::TooFewSources {
                found: distinct.len(),
            });
        }

        Ok(Self {
            files: distinct,
            openapi_version: OpenApiBuilder::DEFAULT_OPENAPI_VERSION.to_string(),
            title: None,
            version: None,
            description: None,
            format: Format::default(),
        })
    }

    /// A builder carrying this configuration's output metadata.
    pub fn builder(&self) -> OpenApiBuilder {
        let mut builder = OpenApiBuilder::new().openapi_version(&self.openapi_version);
        if let Some(title) = &self.title {
            builder = builder.title(title);
        }
        if let Some(version) = &self.version {
            builder = builder.version(version);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        builder
    }
}

impl TryFrom<Cli> for MergeConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            openapi_version: cli.openapi_version,
            title: non_empty(cli.api_title),
            version: non_empty(cli.api_version),
            description: non_empty(cli.api_description),
            format: cli.output_format.into(),
            ..Self::new(cli.files)?
        })
    }
}

/// An empty flag value means "not configured".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("swagrag").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_comma_separated_files() {
        let cli = parse(&["--file", "a.yaml,b.yaml"]);
        assert_eq!(cli.files, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
    }

    #[test]
    fn test_repeated_and_mixed_files() {
        let cli = parse(&["-f", "a.yaml", "--file", "b.yaml,c.yaml"]);
        assert_eq!(cli.files.len(), 3);
    }

    #[test]
    fn test_defaults() {
        let config = MergeConfig::try_from(parse(&["--file", "a.yaml,b.yaml"])).unwrap();

        assert_eq!(config.openapi_version, "3.0.0");
        assert_eq!(config.title, None);
        assert_eq!(config.version, None);
        assert_eq!(config.format, Format::Yaml);
    }

    #[test]
    fn test_metadata_flags() {
        let config = MergeConfig::try_from(parse(&[
            "--file",
            "a.yaml,b.yaml",
            "--openapi-version",
            "3.1.0",
            "--api-title",
            "Gateway",
            "--api-version",
            "2.0.0",
            "--output-format",
            "json",
        ]))
        .unwrap();

        assert_eq!(config.openapi_version, "3.1.0");
        assert_eq!(config.title.as_deref(), Some("Gateway"));
        assert_eq!(config.version.as_deref(), Some("2.0.0"));
        assert_eq!(config.format, Format::Json);
    }

    #[test]
    fn test_empty_title_is_unset() {
        let config =
            MergeConfig::try_from(parse(&["--file", "a.yaml,b.yaml", "--api-title", ""])).unwrap();
        assert_eq!(config.title, None);
    }

    #[test]
    fn test_single_file_rejected() {
        let result = MergeConfig::try_from(parse(&["--file", "a.yaml"]));
        assert_eq!(result, Err(ConfigError::TooFewSources { found: 1 }));
    }

    #[test]
    fn test_duplicate_files_do_not_count() {
        let result = MergeConfig::new(["a.yaml", "a.yaml", ""].map(PathBuf::from));
        assert_eq!(result, Err(ConfigError::TooFewSources { found: 1 }));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let config = MergeConfig::new(["b.yaml", "a.yaml", "b.yaml"].map(PathBuf::from)).unwrap();
        assert_eq!(config.files, vec![PathBuf::from("b.yaml"), PathBuf::from("a.yaml")]);
    }

    #[test]
    fn test_missing_file_flag_is_usage_error() {
        assert!(Cli::try_parse_from(["swagrag"]).is_err());
    }

    #[test]
    fn test_builder_carries_metadata() {
        let mut config = MergeConfig::new(["a.yaml", "b.yaml"].map(PathBuf::from)).unwrap();
        config.version = Some("4".to_string());

        let output = config.builder().build();
        assert_eq!(output.info.version.as_deref(), Some("4"));
        assert_eq!(output.openapi, "3.0.0");
    }
}
