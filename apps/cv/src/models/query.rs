use serde::{Deserialize, Serialize};

use crate::models::cv::{Location, Profile};
use crate::models::localized::{Language, LocalizedString, Tag, FALLBACK_LANGUAGE};

/// Tag logic for one query. Exclusion always wins over inclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSelection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Tag>,
    #[serde(default)]
    pub require_all: bool,
}

impl TagSelection {
    /// True when the selection admits everything.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Per-query replacements for the contact block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<Profile>>,
}

impl QueryOverrides {
    /// Shallow merge: every field set on `newer` replaces the current one.
    pub fn merged_with(self, newer: QueryOverrides) -> QueryOverrides {
        QueryOverrides {
            name: newer.name.or(self.name),
            label: newer.label.or(self.label),
            email: newer.email.or(self.email),
            phone: newer.phone.or(self.phone),
            summary: newer.summary.or(self.summary),
            location: newer.location.or(self.location),
            profiles: newer.profiles.or(self.profiles),
        }
    }
}

/// An immutable selection driving one output variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvQuery {
    pub name: String,
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
    /// Passed through to renderers untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_id: Option<String>,
    #[serde(default)]
    pub tags: TagSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<QueryOverrides>,
}

fn default_language() -> Language {
    FALLBACK_LANGUAGE.to_string()
}

impl CvQuery {
    /// A permissive query in the default language.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: default_language(),
            languages: None,
            theme: None,
            summary_id: None,
            tags: TagSelection::default(),
            overrides: None,
        }
    }
}

/// Fans queries with a non-empty `languages` list out into one query per
/// language, named `<name>-<lang>`. Other queries pass through unchanged.
pub fn expand_queries(queries: Vec<CvQuery>) -> Vec<CvQuery> {
    let mut expanded = Vec::with_capacity(queries.len());

    for query in queries {
        match query.languages.clone() {
            Some(languages) if !languages.is_empty() => {
                for lang in languages {
                    expanded.push(CvQuery {
                        name: format!("{}-{}", query.name, lang),
                        language: lang,
                        languages: None,
                        ..query.clone()
                    });
                }
            }
            _ => expanded.push(query),
        }
    }

    expanded
}
