//! Override Resolver: applies per-query contact overrides and the named summary.
//!
//! Runs after tag filtering (overrides are never subject to tag matching) and
//! before localization (override values may still be multi-language).

use tracing::debug;

use crate::models::cv::{Basics, CvData};
use crate::models::localized::LocalizedString;
use crate::models::query::CvQuery;

/// Picks the summary for this query: a `summary_id` found in the registry
/// wins, then `overrides.summary`. A dangling `summary_id` is not an error.
pub fn resolve_summary(data: &CvData, query: &CvQuery) -> Option<LocalizedString> {
    let from_registry = query.summary_id.as_ref().and_then(|id| {
        let hit = data.summaries.get(id).cloned();
        if hit.is_none() {
            debug!(query = %query.name, summary_id = %id, "Summary id not in registry");
        }
        hit
    });

    from_registry.or_else(|| {
        query
            .overrides
            .as_ref()
            .and_then(|overrides| overrides.summary.clone())
    })
}

pub fn apply_overrides(mut data: CvData, query: &CvQuery) -> CvData {
    let summary = resolve_summary(&data, query);
    let overrides = query.overrides.clone().unwrap_or_default();

    data.basics = match data.basics.take() {
        Some(basics) => {
            let location = match (basics.location, overrides.location) {
                (Some(existing), Some(newer)) => Some(existing.merged_with(newer)),
                (existing, newer) => newer.or(existing),
            };
            Some(Basics {
                name: overrides.name.or(basics.name),
                label: overrides.label.or(basics.label),
                email: overrides.email.or(basics.email),
                phone: overrides.phone.or(basics.phone),
                summary: summary.or(basics.summary),
                location,
                profiles: overrides.profiles.unwrap_or(basics.profiles),
                ..basics
            })
        }
        None if query.overrides.is_some() || summary.is_some() => Some(Basics {
            name: overrides.name,
            label: overrides.label,
            email: overrides.email,
            phone: overrides.phone,
            summary,
            location: overrides.location,
            profiles: overrides.profiles.unwrap_or_default(),
            ..Default::default()
        }),
        None => None,
    };

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{Location, Profile};
    use crate::models::query::QueryOverrides;
    use pretty_assertions::assert_eq;

    fn basics() -> Basics {
        Basics {
            name: Some("Gottfried Wilhelm Leibniz".into()),
            email: Some("gottfried@hanover.court".to_string()),
            summary: Some("Original summary".into()),
            location: Some(Location {
                city: Some("Hanover".into()),
                country_code: Some("DE".to_string()),
                ..Default::default()
            }),
            profiles: vec![Profile {
                network: Some("Royal Society".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn data_with_summaries() -> CvData {
        let mut data = CvData {
            basics: Some(basics()),
            ..Default::default()
        };
        data.summaries.insert(
            "intro".to_string(),
            LocalizedString::from([("en", "Hello"), ("fr", "Bonjour")]),
        );
        data
    }

    fn query_with(overrides: Option<QueryOverrides>, summary_id: Option<&str>) -> CvQuery {
        CvQuery {
            overrides,
            summary_id: summary_id.map(str::to_string),
            ..CvQuery::new("test")
        }
    }

    #[test]
    fn test_no_overrides_leaves_basics_untouched() {
        let data = data_with_summaries();
        let result = apply_overrides(data.clone(), &query_with(None, None));
        assert_eq!(result.basics, data.basics);
    }

    #[test]
    fn test_summary_id_wins_over_override_summary() {
        let overrides = QueryOverrides {
            summary: Some("Override summary".into()),
            ..Default::default()
        };
        let result = apply_overrides(
            data_with_summaries(),
            &query_with(Some(overrides), Some("intro")),
        );
        assert_eq!(
            result.basics.unwrap().summary,
            Some(LocalizedString::from([("en", "Hello"), ("fr", "Bonjour")]))
        );
    }

    #[test]
    fn test_dangling_summary_id_falls_back_to_override() {
        let overrides = QueryOverrides {
            summary: Some("Override summary".into()),
            ..Default::default()
        };
        let result = apply_overrides(
            data_with_summaries(),
            &query_with(Some(overrides), Some("missing")),
        );
        assert_eq!(result.basics.unwrap().summary, Some("Override summary".into()));
    }

    #[test]
    fn test_dangling_summary_id_keeps_existing() {
        let result = apply_overrides(data_with_summaries(), &query_with(None, Some("missing")));
        assert_eq!(result.basics.unwrap().summary, Some("Original summary".into()));
    }

    #[test]
    fn test_contact_fields_overridden() {
        let overrides = QueryOverrides {
            email: Some("g.leibniz@modernworld.com".to_string()),
            phone: Some("+1-555-BINARY".to_string()),
            ..Default::default()
        };
        let result = apply_overrides(data_with_summaries(), &query_with(Some(overrides), None));
        let basics = result.basics.unwrap();
        assert_eq!(basics.email.as_deref(), Some("g.leibniz@modernworld.com"));
        assert_eq!(basics.phone.as_deref(), Some("+1-555-BINARY"));
        assert_eq!(basics.name, Some("Gottfried Wilhelm Leibniz".into()));
    }

    #[test]
    fn test_location_merged_profiles_replaced() {
        let overrides = QueryOverrides {
            location: Some(Location {
                city: Some("Paris".into()),
                ..Default::default()
            }),
            profiles: Some(vec![Profile {
                network: Some("GitHub".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let result = apply_overrides(data_with_summaries(), &query_with(Some(overrides), None));
        let basics = result.basics.unwrap();

        let location = basics.location.unwrap();
        assert_eq!(location.city, Some("Paris".into()));
        assert_eq!(location.country_code.as_deref(), Some("DE"));

        assert_eq!(basics.profiles.len(), 1);
        assert_eq!(basics.profiles[0].network.as_deref(), Some("GitHub"));
    }

    #[test]
    fn test_basics_synthesized_from_overrides() {
        let overrides = QueryOverrides {
            name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        let result = apply_overrides(CvData::default(), &query_with(Some(overrides), None));
        let basics = result.basics.unwrap();
        assert_eq!(basics.name, Some("Ada Lovelace".into()));
        assert_eq!(basics.email.as_deref(), Some("ada@example.com"));
        assert!(basics.summary.is_none());
    }

    #[test]
    fn test_basics_synthesized_from_summary_only() {
        let mut data = CvData::default();
        data.summaries
            .insert("intro".to_string(), LocalizedString::from("Hello"));
        let result = apply_overrides(data, &query_with(None, Some("intro")));
        assert_eq!(result.basics.unwrap().summary, Some("Hello".into()));
    }

    #[test]
    fn test_no_basics_and_nothing_to_apply_stays_absent() {
        let result = apply_overrides(CvData::default(), &query_with(None, Some("missing")));
        assert!(result.basics.is_none());
    }
}
