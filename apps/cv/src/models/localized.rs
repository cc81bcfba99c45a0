use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque topical label used for inclusion/exclusion matching.
pub type Tag = String;

/// Language code such as `en` or `fr`.
pub type Language = String;

/// Language used when the requested one is missing from a localized value.
pub const FALLBACK_LANGUAGE: &str = "en";

/// A display string that is either language-neutral or keyed by language code.
///
/// The map is a `BTreeMap` so that "first available language" is the
/// alphabetically first code, independent of how the source file was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    Localized(BTreeMap<Language, String>),
}

impl LocalizedString {
    /// Resolves to a single string for `language`.
    ///
    /// Fallback chain: requested language, then `en`, then the first entry in
    /// key order, then `None`. Empty translations are skipped for the first
    /// two steps.
    pub fn resolve(&self, language: &str) -> Option<String> {
        match self {
            LocalizedString::Plain(text) => Some(text.clone()),
            LocalizedString::Localized(translations) => translations
                .get(language)
                .filter(|text| !text.is_empty())
                .or_else(|| {
                    translations
                        .get(FALLBACK_LANGUAGE)
                        .filter(|text| !text.is_empty())
                })
                .or_else(|| translations.values().next())
                .cloned(),
        }
    }
}

impl From<&str> for LocalizedString {
    fn from(text: &str) -> Self {
        LocalizedString::Plain(text.to_string())
    }
}

impl From<String> for LocalizedString {
    fn from(text: String) -> Self {
        LocalizedString::Plain(text)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LocalizedString {
    fn from(pairs: [(&str, &str); N]) -> Self {
        LocalizedString::Localized(
            pairs
                .into_iter()
                .map(|(lang, text)| (lang.to_string(), text.to_string()))
                .collect(),
        )
    }
}

/// A localized value paired with its own tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedContent {
    pub content: LocalizedString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// A highlight bullet or cover-letter paragraph.
///
/// Objects carrying a `content` key are tagged units; bare strings and
/// language maps are plain. Plain units are never filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentUnit {
    Tagged(TaggedContent),
    Plain(LocalizedString),
}

impl ContentUnit {
    pub fn tagged(content: impl Into<LocalizedString>, tags: &[&str]) -> Self {
        ContentUnit::Tagged(TaggedContent {
            content: content.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    pub fn content(&self) -> &LocalizedString {
        match self {
            ContentUnit::Tagged(unit) => &unit.content,
            ContentUnit::Plain(value) => value,
        }
    }

    /// The tag wrapper is discarded; only the resolved text survives.
    pub fn resolve(&self, language: &str) -> Option<String> {
        self.content().resolve(language)
    }
}
