//! Fluent construction of `CvQuery` values.

use crate::models::localized::{Language, Tag, FALLBACK_LANGUAGE};
use crate::models::query::{CvQuery, QueryOverrides};

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: CvQuery,
    languages: Vec<Language>,
}

impl QueryBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            query: CvQuery::new(name),
            languages: Vec::new(),
        }
    }

    /// Starts a multi-language query; the first language becomes the primary one.
    pub fn with_languages<I, S>(name: impl Into<String>, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Language>,
    {
        Self::new(name).languages(languages)
    }

    pub fn include<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Tag>,
    {
        self.query.tags.include.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Tag>,
    {
        self.query.tags.exclude.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn require_all(mut self, value: bool) -> Self {
        self.query.tags.require_all = value;
        self
    }

    pub fn language(mut self, language: impl Into<Language>) -> Self {
        self.query.language = language.into();
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Language>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self.query.language = self
            .languages
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
        self.query.languages = Some(self.languages.clone()).filter(|l| !l.is_empty());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.query.theme = Some(theme.into());
        self
    }

    pub fn summary_id(mut self, id: impl Into<String>) -> Self {
        self.query.summary_id = Some(id.into());
        self
    }

    /// Shallow-merges into the current overrides; `None` clears them.
    pub fn overrides(mut self, overrides: Option<QueryOverrides>) -> Self {
        self.query.overrides = overrides.map(|newer| match self.query.overrides.take() {
            Some(current) => current.merged_with(newer),
            None => newer,
        });
        self
    }

    pub fn build(&self) -> CvQuery {
        self.query.clone()
    }

    /// One query per language, each named `<name>-<lang>`, even for a single
    /// language.
    pub fn build_multi(&self) -> Vec<CvQuery> {
        let languages = if self.languages.is_empty() {
            vec![self.query.language.clone()]
        } else {
            self.languages.clone()
        };

        languages
            .into_iter()
            .map(|language| CvQuery {
                name: format!("{}-{}", self.query.name, language),
                language,
                languages: None,
                ..self.query.clone()
            })
            .collect()
    }
}
