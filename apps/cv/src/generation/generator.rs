//! CV Generation: runs one query against the merged content pool.
//!
//! Flow: filter_data → apply_overrides → project / project_facts / project_letter.
//!
//! The input `CvData` is never mutated; every step works on an owned copy, so
//! any number of queries can be generated from the same pool.

use serde::Serialize;
use tracing::info;

use crate::generation::localizer::{project, project_facts, project_letter};
use crate::generation::overrides::apply_overrides;
use crate::generation::tag_filter::filter_data;
use crate::models::cv::CvData;
use crate::models::query::CvQuery;
use crate::models::resume::{JsonResume, LocalizedLetter};

/// Everything produced for one query from a single filter pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedVariant {
    pub resume: JsonResume,
    pub facts: Vec<String>,
    pub letter: Option<LocalizedLetter>,
}

/// Filters, overrides and localizes `data` for `query`.
pub fn generate(data: &CvData, query: &CvQuery) -> JsonResume {
    let prepared = prepare(data, query);
    project(&prepared, &query.language)
}

/// The fact strings surviving the query's tag selection, in the query language.
pub fn generate_facts(data: &CvData, query: &CvQuery) -> Vec<String> {
    let filtered = filter_data(data, query);
    project_facts(&filtered, &query.language)
}

/// The cover letter for this query, if the pool has one.
pub fn generate_letter(data: &CvData, query: &CvQuery) -> Option<LocalizedLetter> {
    let filtered = filter_data(data, query);
    filtered
        .letter
        .as_ref()
        .map(|letter| project_letter(letter, &query.language))
}

pub fn generate_variant(data: &CvData, query: &CvQuery) -> GeneratedVariant {
    let prepared = prepare(data, query);
    let language = query.language.as_str();

    let variant = GeneratedVariant {
        resume: project(&prepared, language),
        facts: project_facts(&prepared, language),
        letter: prepared
            .letter
            .as_ref()
            .map(|letter| project_letter(letter, language)),
    };

    info!(
        query = %query.name,
        language,
        facts = variant.facts.len(),
        has_letter = variant.letter.is_some(),
        "Generated CV variant"
    );
    variant
}

fn prepare(data: &CvData, query: &CvQuery) -> CvData {
    apply_overrides(filter_data(data, query), query)
}
