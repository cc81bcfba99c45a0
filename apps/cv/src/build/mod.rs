//! Batch build: runs every query against the content pool and writes the
//! per-variant JSON outputs, rendered files and an index page.
//!
//! Layout: `<out>/<role>/<person>-<lang>.{resume.json,facts.json,letter.json,html,pdf,letter.pdf}`
//!
//! One failing query never aborts the batch; its `BuildResult` carries the error.

pub mod index;
pub mod queries;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::{CvError, Result};
use crate::generation::generate_variant;
use crate::models::cv::CvData;
use crate::models::localized::FALLBACK_LANGUAGE;
use crate::models::query::CvQuery;

pub use queries::{find_default_queries, load_queries, resolve_queries};
pub use render::{CommandRenderer, NoopRenderer, RenderStatus, Renderer};

/// Language suffixes stripped from query names to form the role directory.
pub const ROLE_LANGUAGE_SUFFIXES: &[&str] = &["en", "fr", "de", "es", "it", "pt", "ja"];

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output: PathBuf,
    /// Theme used when a query does not name its own.
    pub theme: String,
}

/// Outcome of building one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildResult {
    pub name: String,
    pub role: String,
    pub language: String,
    pub success: bool,
    pub json_path: Option<PathBuf>,
    pub facts_path: Option<PathBuf>,
    pub letter_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
    pub pdf_path: Option<PathBuf>,
    pub letter_pdf_path: Option<PathBuf>,
    pub error: Option<String>,
}

/// Query name with a trailing `-<lang>` removed, for known language codes only.
pub fn role_name(query_name: &str) -> &str {
    match query_name.rsplit_once('-') {
        Some((role, suffix)) if !role.is_empty() && ROLE_LANGUAGE_SUFFIXES.contains(&suffix) => {
            role
        }
        _ => query_name,
    }
}

/// File-name stem for the person: override name (English or first available)
/// before the basics name in the query language; lowercased, whitespace runs
/// collapsed to `-`.
pub fn person_slug(data: &CvData, query: &CvQuery) -> Result<String> {
    let from_override = query
        .overrides
        .as_ref()
        .and_then(|o| o.name.as_ref())
        .and_then(|name| name.resolve(FALLBACK_LANGUAGE))
        .filter(|name| !name.trim().is_empty());

    let name = from_override
        .or_else(|| {
            data.basics
                .as_ref()
                .and_then(|b| b.name.as_ref())
                .and_then(|name| name.resolve(&query.language))
        })
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| CvError::PersonName(query.name.clone()))?;

    Ok(name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).map_err(|source| CvError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(|e| CvError::io(path, e))
}

/// Runs the renderer and keeps the path only if something was produced.
fn rendered(
    query: &CvQuery,
    output: PathBuf,
    attempt: impl FnOnce(&Path) -> Result<RenderStatus>,
) -> Option<PathBuf> {
    match attempt(&output) {
        Ok(RenderStatus::Rendered) => Some(output),
        Ok(RenderStatus::Skipped) => None,
        Err(e) => {
            warn!(query = %query.name, "Rendering {} failed: {e}", output.display());
            None
        }
    }
}

fn build_one(
    data: &CvData,
    query: &CvQuery,
    options: &BuildOptions,
    renderer: &dyn Renderer,
    result: &mut BuildResult,
) -> Result<()> {
    let person = person_slug(data, query)?;
    let role_dir = options.output.join(&result.role);
    fs::create_dir_all(&role_dir).map_err(|e| CvError::io(&role_dir, e))?;

    let stem = format!("{person}-{}", query.language);
    let variant = generate_variant(data, query);

    let json_path = role_dir.join(format!("{stem}.resume.json"));
    write_json(&json_path, &variant.resume)?;
    result.json_path = Some(json_path.clone());

    let facts_path = role_dir.join(format!("{stem}.facts.json"));
    write_json(&facts_path, &variant.facts)?;
    result.facts_path = Some(facts_path);

    if let Some(letter) = &variant.letter {
        let letter_path = role_dir.join(format!("{stem}.letter.json"));
        write_json(&letter_path, letter)?;
        let letter_pdf = role_dir.join(format!("{stem}.letter.pdf"));
        result.letter_pdf_path =
            rendered(query, letter_pdf, |out| renderer.render_letter(&letter_path, out));
        result.letter_path = Some(letter_path);
    }

    let theme = query.theme.as_deref().unwrap_or(&options.theme);
    result.html_path = rendered(query, role_dir.join(format!("{stem}.html")), |out| {
        renderer.render_resume(&json_path, out, theme)
    });
    result.pdf_path = rendered(query, role_dir.join(format!("{stem}.pdf")), |out| {
        renderer.render_resume(&json_path, out, theme)
    });

    Ok(())
}

/// Builds every query in order and writes `index.html`.
pub fn build(
    data: &CvData,
    queries: &[CvQuery],
    options: &BuildOptions,
    renderer: &dyn Renderer,
) -> Result<Vec<BuildResult>> {
    fs::create_dir_all(&options.output).map_err(|e| CvError::io(&options.output, e))?;
    info!("Building {} CV variants into {}", queries.len(), options.output.display());

    let mut results = Vec::with_capacity(queries.len());
    for query in queries {
        let mut result = BuildResult {
            name: query.name.clone(),
            role: role_name(&query.name).to_string(),
            language: query.language.clone(),
            ..Default::default()
        };

        match build_one(data, query, options, renderer, &mut result) {
            Ok(()) => {
                result.success = true;
                info!(query = %query.name, "Built variant");
            }
            Err(e) => {
                error!(query = %query.name, "Build failed: {e}");
                result.error = Some(e.to_string());
            }
        }
        results.push(result);
    }

    let index_path = options.output.join("index.html");
    fs::write(&index_path, index::render_index(&results, Utc::now()))
        .map_err(|e| CvError::io(&index_path, e))?;

    let failed = results.iter().filter(|r| !r.success).count();
    info!(
        "Build completed: {} successful, {} failed",
        results.len() - failed,
        failed
    );
    Ok(results)
}
