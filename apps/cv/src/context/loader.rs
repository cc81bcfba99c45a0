//! Fragment discovery: reads content files from disk and builds the merged,
//! tag-inherited `CvData` consumed by every query.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::context::inheritance::inherit_tags;
use crate::context::merge::merge_fragments;
use crate::errors::{CvError, Result};
use crate::models::cv::{CvData, CvFragment};

const SUPPORTED_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// File name fragments that mark query definitions or tooling files rather
/// than CV content.
const NON_CONTENT_MARKERS: &[&str] = &["cv-definitions", "queries", "package", "build"];

/// Loads, merges and tag-inherits all fragments under `path`.
pub fn load_cv_data(path: &Path) -> Result<CvData> {
    let fragments = load_fragments(path)?;
    info!(
        "Loaded {} content fragments from {}",
        fragments.len(),
        path.display()
    );
    Ok(inherit_tags(merge_fragments(fragments)))
}

/// Loads fragments from a single file or, recursively, from a directory.
///
/// Directory entries are visited in file-name order so merge order is stable.
/// Files that fail to decode are logged and skipped.
pub fn load_fragments(path: &Path) -> Result<Vec<CvFragment>> {
    let metadata = fs::metadata(path).map_err(|e| CvError::io(path, e))?;
    if metadata.is_file() {
        return Ok(vec![read_document(path)?]);
    }

    let mut fragments = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read directory entry under {}: {e}", path.display());
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_content_file(entry.path()) {
            continue;
        }

        match read_document::<CvFragment>(entry.path()) {
            Ok(fragment) => {
                debug!("Loaded fragment {}", entry.path().display());
                fragments.push(fragment);
            }
            Err(e) => warn!("Skipping {}: {e}", entry.path().display()),
        }
    }

    Ok(fragments)
}

/// True for supported data files that are not query definitions or tooling.
pub fn is_content_file(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if NON_CONTENT_MARKERS
        .iter()
        .any(|marker| file_name.contains(marker))
    {
        return false;
    }
    is_supported_file(path)
}

pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reads and decodes a JSON or YAML file, chosen by extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = fs::read_to_string(path).map_err(|e| CvError::io(path, e))?;

    match ext.as_str() {
        "json" => serde_json::from_str(&text).map_err(|source| CvError::Json {
            path: path.to_path_buf(),
            source,
        }),
        "yaml" | "yml" => serde_yaml_ng::from_str(&text).map_err(|source| CvError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(CvError::UnsupportedFormat(path.to_path_buf())),
    }
}
