use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the I/O layer around the pipeline.
///
/// The merge/filter/localize core is infallible; everything here comes from
/// loading content, loading queries, writing outputs or running renderers.
#[derive(Debug, Error)]
pub enum CvError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Unsupported file extension for {0} (supported: .json, .yaml, .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("No queries found: {0}")]
    NoQueries(String),

    #[error("Could not extract person name for query '{0}' from CV data or query overrides")]
    PersonName(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl CvError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CvError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CvError>;
