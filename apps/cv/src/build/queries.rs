//! Query file discovery and decoding.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::context::loader::read_document;
use crate::errors::{CvError, Result};
use crate::models::query::{expand_queries, CvQuery};

/// Looked up, in order, when no queries file is given.
pub const DEFAULT_QUERY_FILES: &[&str] = &[
    "queries.json",
    "queries.yaml",
    "queries.yml",
    "cv-definitions.json",
];

/// A queries file is either a bare list or an object holding the list under
/// one of a few conventional keys.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryDocument {
    List(Vec<CvQuery>),
    Keyed {
        #[serde(default, rename = "cvQueries")]
        cv_queries: Option<Vec<CvQuery>>,
        #[serde(default)]
        queries: Option<Vec<CvQuery>>,
        #[serde(default)]
        default: Option<Vec<CvQuery>>,
    },
}

impl QueryDocument {
    fn into_queries(self) -> Vec<CvQuery> {
        match self {
            QueryDocument::List(queries) => queries,
            QueryDocument::Keyed {
                cv_queries,
                queries,
                default,
            } => cv_queries.or(queries).or(default).unwrap_or_default(),
        }
    }
}

/// Reads queries from `path` and expands multi-language entries.
pub fn load_queries(path: &Path) -> Result<Vec<CvQuery>> {
    let document: QueryDocument = read_document(path)?;
    let queries = document.into_queries();

    if queries.is_empty() {
        return Err(CvError::NoQueries(format!(
            "{} contains no queries",
            path.display()
        )));
    }

    let expanded = expand_queries(queries);
    info!(
        "Loaded {} queries from {}",
        expanded.len(),
        path.display()
    );
    Ok(expanded)
}

/// First existing default queries file under `dir`.
pub fn find_default_queries(dir: &Path) -> Option<PathBuf> {
    DEFAULT_QUERY_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Resolves the explicit path or falls back to the defaults in `dir`.
pub fn resolve_queries(explicit: Option<&Path>, dir: &Path) -> Result<Vec<CvQuery>> {
    match explicit {
        Some(path) => load_queries(path),
        None => {
            let path = find_default_queries(dir).ok_or_else(|| {
                CvError::NoQueries(format!(
                    "no queries file given and none of {} found in {}",
                    DEFAULT_QUERY_FILES.join(", "),
                    dir.display()
                ))
            })?;
            info!("Using default queries file {}", path.display());
            load_queries(&path)
        }
    }
}
