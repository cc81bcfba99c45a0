//! Tag Filter: selects entries and highlights for one query.
//!
//! Matching is applied at two levels:
//! 1. entries in every list section, on their inherited tags
//! 2. highlights of surviving entries and cover-letter paragraphs; an untagged
//!    unit is matched on its parent's tags, plain units always pass
//!
//! Basics, document tags and the summary registry pass through unfiltered.

use tracing::debug;

use crate::models::cv::{CoverLetter, CvData, TaggedEntry};
use crate::models::localized::{ContentUnit, Tag};
use crate::models::query::{CvQuery, TagSelection};

/// Applies `selection` to a tag set.
///
/// Rules, in order:
/// 1. any tag in `exclude` → reject
/// 2. empty `include` → accept
/// 3. `require_all` → every include tag must be present
/// 4. otherwise at least one include tag must be present
pub fn matches_tags(item_tags: &[Tag], selection: &TagSelection) -> bool {
    if !selection.exclude.is_empty() && item_tags.iter().any(|t| selection.exclude.contains(t)) {
        return false;
    }

    if selection.include.is_empty() {
        return true;
    }

    if selection.require_all {
        selection.include.iter().all(|t| item_tags.contains(t))
    } else {
        selection.include.iter().any(|t| item_tags.contains(t))
    }
}

/// Returns a copy of `data` reduced to what `query` selects.
pub fn filter_data(data: &CvData, query: &CvQuery) -> CvData {
    let selection = &query.tags;
    if selection.is_empty() {
        debug!(query = %query.name, "Empty tag selection keeps all content");
        return data.clone();
    }

    let filtered = CvData {
        basics: data.basics.clone(),
        work: filter_section(&data.work, selection),
        volunteer: filter_section(&data.volunteer, selection),
        education: filter_section(&data.education, selection),
        awards: filter_section(&data.awards, selection),
        certificates: filter_section(&data.certificates, selection),
        publications: filter_section(&data.publications, selection),
        skills: filter_section(&data.skills, selection),
        projects: filter_section(&data.projects, selection),
        languages: filter_section(&data.languages, selection),
        interests: filter_section(&data.interests, selection),
        facts: filter_section(&data.facts, selection),
        references: filter_section(&data.references, selection),
        letter: data
            .letter
            .as_ref()
            .map(|letter| filter_letter(letter, selection)),
        tags: data.tags.clone(),
        summaries: data.summaries.clone(),
    };

    debug!(
        query = %query.name,
        work = filtered.work.len(),
        projects = filtered.projects.len(),
        skills = filtered.skills.len(),
        facts = filtered.facts.len(),
        "Filtered content by tags"
    );

    filtered
}

/// Keeps matching entries; highlights are trimmed only on survivors.
fn filter_section<E: TaggedEntry>(entries: &[E], selection: &TagSelection) -> Vec<E> {
    entries
        .iter()
        .filter(|entry| matches_tags(entry.tags(), selection))
        .cloned()
        .map(|mut entry| {
            let parent_tags = entry.tags().to_vec();
            if let Some(highlights) = entry.highlights_mut() {
                highlights.retain(|unit| unit_matches(unit, &parent_tags, selection));
            }
            entry
        })
        .collect()
}

/// Only the body paragraphs are filtered; every other letter field is kept.
fn filter_letter(letter: &CoverLetter, selection: &TagSelection) -> CoverLetter {
    let mut filtered = letter.clone();
    if let Some(content) = filtered.content.as_mut() {
        content
            .body
            .retain(|paragraph| unit_matches(paragraph, &letter.tags, selection));
    }
    filtered
}

fn unit_matches(unit: &ContentUnit, parent_tags: &[Tag], selection: &TagSelection) -> bool {
    match unit {
        ContentUnit::Plain(_) => true,
        ContentUnit::Tagged(tagged) if tagged.tags.is_empty() => {
            matches_tags(parent_tags, selection)
        }
        ContentUnit::Tagged(tagged) => matches_tags(&tagged.tags, selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{inherit_tags, merge_fragments};
    use crate::models::cv::{CvFragment, LetterContent, Project, Skill, Work};
    use crate::models::localized::LocalizedString;
    use serde_json::json;

    fn tags(values: &[&str]) -> Vec<Tag> {
        values.iter().map(|t| t.to_string()).collect()
    }

    fn selection(include: &[&str], exclude: &[&str], require_all: bool) -> TagSelection {
        TagSelection {
            include: tags(include),
            exclude: tags(exclude),
            require_all,
        }
    }

    fn query(include: &[&str], exclude: &[&str], require_all: bool) -> CvQuery {
        CvQuery {
            tags: selection(include, exclude, require_all),
            ..CvQuery::new("test")
        }
    }

    fn work(name: &str, entry_tags: &[&str], highlights: Vec<ContentUnit>) -> Work {
        Work {
            name: Some(name.into()),
            highlights,
            tags: tags(entry_tags),
            ..Default::default()
        }
    }

    fn sample() -> CvData {
        let fragment: CvFragment = serde_json::from_value(json!({
            "tags": ["global"],
            "work": [
                {
                    "name": "Senior Co",
                    "highlights": [
                        { "content": { "en": "Led platform team" }, "tags": ["senior"] },
                        { "content": { "en": "Fixed typos" }, "tags": ["junior"] },
                        { "content": { "en": "Untagged wrapper" } },
                        "Plain bullet"
                    ],
                    "tags": ["senior", "backend"]
                },
                { "name": "Junior Co", "tags": ["junior"] },
                { "name": "Both Co", "tags": ["senior", "junior"] }
            ],
            "skills": [
                { "name": "Rust", "tags": ["backend"] },
                { "name": "React", "tags": ["frontend"] }
            ],
            "projects": [
                {
                    "name": "VitaeMatrix",
                    "highlights": [{ "content": "Backend work", "tags": ["backend"] }],
                    "tags": ["senior"]
                }
            ]
        }))
        .unwrap();
        inherit_tags(merge_fragments(vec![fragment]))
    }

    fn names(entries: &[Work]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|w| w.name.as_ref().and_then(|n| n.resolve("en")))
            .collect()
    }

    // ── matches_tags ──────────────────────────────────────────────────────

    #[test]
    fn test_matches_when_item_has_included_tag() {
        assert!(matches_tags(&tags(&["senior"]), &selection(&["senior"], &[], false)));
    }

    #[test]
    fn test_rejects_when_item_lacks_included_tag() {
        assert!(!matches_tags(&tags(&["junior"]), &selection(&["senior"], &[], false)));
    }

    #[test]
    fn test_rejects_excluded_tag() {
        assert!(!matches_tags(&tags(&["junior"]), &selection(&[], &["junior"], false)));
    }

    #[test]
    fn test_empty_include_admits_everything() {
        assert!(matches_tags(&[], &selection(&[], &[], false)));
        assert!(matches_tags(&tags(&["anything"]), &selection(&[], &["other"], false)));
    }

    #[test]
    fn test_require_all_needs_every_include_tag() {
        let all = selection(&["senior", "backend"], &[], true);
        assert!(matches_tags(&tags(&["senior", "backend", "rust"]), &all));
        assert!(!matches_tags(&tags(&["senior"]), &all));

        let any = selection(&["senior", "backend"], &[], false);
        assert!(matches_tags(&tags(&["senior"]), &any));
    }

    #[test]
    fn test_exclude_wins_over_include_and_require_all() {
        for require_all in [false, true] {
            let sel = selection(&["senior"], &["junior"], require_all);
            assert!(
                !matches_tags(&tags(&["senior", "junior"]), &sel),
                "Exclude must win (require_all={require_all})"
            );
        }
    }

    // ── filter_data ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_query_is_identity() {
        let data = sample();
        assert_eq!(filter_data(&data, &query(&[], &[], false)), data);
        assert_eq!(
            filter_data(&data, &query(&[], &[], true)),
            data,
            "require_all without include tags selects nothing less"
        );
    }

    #[test]
    fn test_senior_query_trims_junior_highlight() {
        let data = CvData {
            work: vec![work(
                "Acme",
                &["senior"],
                vec![
                    ContentUnit::tagged([("en", "Senior bullet")], &["senior"]),
                    ContentUnit::tagged([("en", "Junior bullet")], &["junior"]),
                ],
            )],
            ..Default::default()
        };

        let filtered = filter_data(&data, &query(&["senior"], &[], false));
        assert_eq!(filtered.work.len(), 1);
        assert_eq!(filtered.work[0].highlights.len(), 1);
        assert_eq!(
            filtered.work[0].highlights[0].resolve("en").as_deref(),
            Some("Senior bullet")
        );
    }

    #[test]
    fn test_exclude_drops_entry_with_both_tags() {
        let filtered = filter_data(&sample(), &query(&[], &["junior"], false));
        assert_eq!(names(&filtered.work), ["Senior Co"]);
    }

    #[test]
    fn test_untagged_highlight_uses_parent_tags() {
        let filtered = filter_data(&sample(), &query(&["senior"], &[], false));
        let highlights: Vec<_> = filtered.work[0]
            .highlights
            .iter()
            .filter_map(|h| h.resolve("en"))
            .collect();
        assert_eq!(
            highlights,
            ["Led platform team", "Untagged wrapper", "Plain bullet"],
            "Untagged wrapper inherits 'senior' from its entry; plain bullets always pass"
        );
    }

    #[test]
    fn test_untagged_highlight_follows_parent_entry() {
        let data = CvData {
            work: vec![work(
                "Acme",
                &["backend"],
                vec![
                    ContentUnit::tagged("Tagged senior", &["senior"]),
                    ContentUnit::tagged("Inherits backend", &[]),
                ],
            )],
            ..Default::default()
        };

        let filtered = filter_data(&data, &query(&["backend"], &[], false));
        let highlights: Vec<_> = filtered.work[0]
            .highlights
            .iter()
            .filter_map(|h| h.resolve("en"))
            .collect();
        assert_eq!(highlights, ["Inherits backend"]);

        let filtered = filter_data(&data, &query(&["senior"], &[], false));
        assert!(filtered.work.is_empty(), "Entry lacks 'senior' so it is dropped");
    }

    #[test]
    fn test_project_highlights_filtered() {
        let filtered = filter_data(&sample(), &query(&["senior"], &[], false));
        assert_eq!(filtered.projects.len(), 1);
        assert!(
            filtered.projects[0].highlights.is_empty(),
            "'backend' highlight does not match a 'senior' query"
        );
    }

    #[test]
    fn test_require_all_subset_of_any() {
        let data = sample();
        let any = filter_data(&data, &query(&["senior", "backend"], &[], false));
        let all = filter_data(&data, &query(&["senior", "backend"], &[], true));

        for entry in &all.work {
            assert!(any.work.contains(entry), "{entry:?} missing from OR result");
        }
        for skill in &all.skills {
            assert!(any.skills.contains(skill));
        }
        assert!(all.work.len() <= any.work.len());
        assert!(all.skills.len() <= any.skills.len());
    }

    #[test]
    fn test_sections_filtered_independently() {
        let filtered = filter_data(&sample(), &query(&["frontend"], &[], false));
        assert!(filtered.work.is_empty());
        assert_eq!(filtered.skills.len(), 1);
        assert_eq!(filtered.skills[0].name, Some(LocalizedString::from("React")));
    }

    #[test]
    fn test_basics_and_summaries_pass_through() {
        let mut data = sample();
        data.basics = Some(Default::default());
        data.summaries
            .insert("intro".to_string(), LocalizedString::from("Hello"));

        let filtered = filter_data(&data, &query(&["nothing-matches"], &[], false));
        assert_eq!(filtered.basics, data.basics);
        assert_eq!(filtered.summaries, data.summaries);
        assert_eq!(filtered.tags, data.tags);
        assert!(filtered.work.is_empty());
    }

    #[test]
    fn test_letter_paragraphs_filtered() {
        let letter = CoverLetter {
            subject: Some("Application".into()),
            content: Some(LetterContent {
                opening: Some("Dear team".into()),
                body: vec![
                    ContentUnit::tagged("Leadership paragraph", &["senior"]),
                    ContentUnit::tagged("Eager learner paragraph", &["junior"]),
                    ContentUnit::tagged("Falls back to letter tags", &[]),
                    ContentUnit::Plain(LocalizedString::from("Always kept")),
                ],
                closing: Some("Regards".into()),
            }),
            tags: tags(&["senior"]),
            ..Default::default()
        };
        let data = CvData {
            letter: Some(letter),
            ..Default::default()
        };

        let filtered = filter_data(&data, &query(&["senior"], &[], false));
        let letter = filtered.letter.unwrap();
        assert_eq!(letter.subject, Some("Application".into()));

        let content = letter.content.unwrap();
        let body: Vec<_> = content.body.iter().filter_map(|p| p.resolve("en")).collect();
        assert_eq!(
            body,
            [
                "Leadership paragraph",
                "Falls back to letter tags",
                "Always kept"
            ]
        );
        assert_eq!(content.closing, Some("Regards".into()));
    }

    #[test]
    fn test_letter_with_no_matching_paragraphs_keeps_structure() {
        let data = CvData {
            letter: Some(CoverLetter {
                content: Some(LetterContent {
                    body: vec![ContentUnit::tagged("Junior", &["junior"])],
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let filtered = filter_data(&data, &query(&["senior"], &[], false));
        let content = filtered.letter.unwrap().content.unwrap();
        assert!(content.body.is_empty());
    }

    #[test]
    fn test_entries_without_tags_only_pass_empty_include() {
        let data = CvData {
            skills: vec![Skill::default()],
            projects: vec![Project::default()],
            ..Default::default()
        };
        assert_eq!(filter_data(&data, &query(&[], &["x"], false)).skills.len(), 1);
        assert!(filter_data(&data, &query(&["x"], &[], false)).skills.is_empty());
    }
}
