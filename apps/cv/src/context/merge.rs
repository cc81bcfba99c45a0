//! Fragment Merger: folds partial documents into one `CvData`.
//!
//! List sections are appended in fragment order with no de-duplication.
//! Basics, letter and summaries are shallow-merged with later fragments winning.

use tracing::debug;

use crate::models::cv::{Basics, CoverLetter, CvData, CvFragment};

/// Merges fragments in order. Sections no fragment supplies stay empty;
/// `basics` and `letter` stay `None`.
pub fn merge_fragments(fragments: Vec<CvFragment>) -> CvData {
    let count = fragments.len();
    let merged = fragments.into_iter().fold(CvData::default(), merge_step);
    debug!(
        fragments = count,
        work = merged.work.len(),
        projects = merged.projects.len(),
        skills = merged.skills.len(),
        "Merged content fragments"
    );
    merged
}

/// One fold step: returns a new document with `fragment` applied on top.
fn merge_step(mut acc: CvData, fragment: CvFragment) -> CvData {
    if let Some(basics) = fragment.basics {
        acc.basics = Some(match acc.basics {
            Some(existing) => merge_basics(existing, basics),
            None => basics,
        });
    }

    append(&mut acc.work, fragment.work);
    append(&mut acc.volunteer, fragment.volunteer);
    append(&mut acc.education, fragment.education);
    append(&mut acc.awards, fragment.awards);
    append(&mut acc.certificates, fragment.certificates);
    append(&mut acc.publications, fragment.publications);
    append(&mut acc.skills, fragment.skills);
    append(&mut acc.projects, fragment.projects);
    append(&mut acc.languages, fragment.languages);
    append(&mut acc.interests, fragment.interests);
    append(&mut acc.facts, fragment.facts);
    append(&mut acc.references, fragment.references);
    append(&mut acc.tags, fragment.tags);

    if let Some(letter) = fragment.letter {
        acc.letter = Some(match acc.letter {
            Some(existing) => merge_letter(existing, letter),
            None => letter,
        });
    }

    if let Some(summaries) = fragment.summaries {
        acc.summaries.extend(summaries);
    }

    acc
}

fn append<T>(section: &mut Vec<T>, incoming: Option<Vec<T>>) {
    if let Some(items) = incoming {
        section.extend(items);
    }
}

/// Field-by-field override; location merged the same way; profiles concatenated.
fn merge_basics(existing: Basics, newer: Basics) -> Basics {
    let location = match (existing.location, newer.location) {
        (Some(old), Some(new)) => Some(old.merged_with(new)),
        (old, new) => new.or(old),
    };

    let mut profiles = existing.profiles;
    profiles.extend(newer.profiles);

    Basics {
        name: newer.name.or(existing.name),
        label: newer.label.or(existing.label),
        image: newer.image.or(existing.image),
        email: newer.email.or(existing.email),
        phone: newer.phone.or(existing.phone),
        url: newer.url.or(existing.url),
        summary: newer.summary.or(existing.summary),
        location,
        profiles,
        tags: if newer.tags.is_empty() {
            existing.tags
        } else {
            newer.tags
        },
    }
}

/// Shallow merge of top-level letter fields. A newer `content` block replaces
/// the older one wholesale, body paragraphs included.
fn merge_letter(existing: CoverLetter, newer: CoverLetter) -> CoverLetter {
    CoverLetter {
        recipient: newer.recipient.or(existing.recipient),
        subject: newer.subject.or(existing.subject),
        content: newer.content.or(existing.content),
        sender: newer.sender.or(existing.sender),
        date: newer.date.or(existing.date),
        tags: if newer.tags.is_empty() {
            existing.tags
        } else {
            newer.tags
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{LetterContent, Location, Profile, Work};
    use crate::models::localized::{ContentUnit, LocalizedString};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fragment(value: serde_json::Value) -> CvFragment {
        serde_json::from_value(value).unwrap()
    }

    fn work_named(name: &str) -> Work {
        Work {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_work_concatenated_in_fragment_order() {
        let merged = merge_fragments(vec![
            fragment(json!({ "work": [{ "name": "A" }] })),
            fragment(json!({ "work": [{ "name": "B" }] })),
        ]);
        assert_eq!(merged.work, vec![work_named("A"), work_named("B")]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let merged = merge_fragments(vec![
            fragment(json!({ "work": [{ "name": "A" }] })),
            fragment(json!({ "work": [{ "name": "A" }] })),
        ]);
        assert_eq!(merged.work.len(), 2, "Merge must not de-duplicate");
    }

    #[test]
    fn test_missing_sections_are_empty_not_absent() {
        let merged = merge_fragments(vec![fragment(json!({ "skills": [{ "name": "Rust" }] }))]);
        assert!(merged.work.is_empty());
        assert!(merged.references.is_empty());
        assert_eq!(merged.skills.len(), 1);
        assert!(merged.basics.is_none());
        assert!(merged.letter.is_none());
    }

    #[test]
    fn test_no_fragments_yields_empty_document() {
        assert_eq!(merge_fragments(vec![]), CvData::default());
    }

    #[test]
    fn test_basics_shallow_merge() {
        let merged = merge_fragments(vec![
            fragment(json!({ "basics": {
                "name": "Gottfried Leibniz",
                "email": "old@example.com",
                "location": { "city": "Leipzig", "countryCode": "DE" },
                "profiles": [{ "network": "GitHub" }]
            }})),
            fragment(json!({ "basics": {
                "email": "new@example.com",
                "location": { "city": "Hanover" },
                "profiles": [{ "network": "LinkedIn" }]
            }})),
        ]);

        let basics = merged.basics.unwrap();
        assert_eq!(basics.name, Some("Gottfried Leibniz".into()));
        assert_eq!(basics.email.as_deref(), Some("new@example.com"));
        assert_eq!(
            basics.location,
            Some(Location {
                city: Some("Hanover".into()),
                country_code: Some("DE".to_string()),
                ..Default::default()
            })
        );
        let networks: Vec<_> = basics
            .profiles
            .iter()
            .map(|p: &Profile| p.network.clone().unwrap_or_default())
            .collect();
        assert_eq!(networks, ["GitHub", "LinkedIn"]);
    }

    #[test]
    fn test_letter_adopted_then_shallow_merged() {
        let merged = merge_fragments(vec![
            fragment(json!({ "letter": {
                "subject": "First subject",
                "date": "2024-01-01",
                "content": { "opening": "Hello", "body": ["one", "two"] }
            }})),
            fragment(json!({ "letter": {
                "subject": "Second subject",
                "content": { "body": ["replacement"] }
            }})),
        ]);

        let letter = merged.letter.unwrap();
        assert_eq!(letter.subject, Some("Second subject".into()));
        assert_eq!(letter.date.as_deref(), Some("2024-01-01"));
        assert_eq!(
            letter.content,
            Some(LetterContent {
                opening: None,
                body: vec![ContentUnit::Plain(LocalizedString::from("replacement"))],
                closing: None,
            }),
            "A later content block replaces the earlier one entirely"
        );
    }

    #[test]
    fn test_summaries_later_fragment_wins() {
        let merged = merge_fragments(vec![
            fragment(json!({ "summaries": { "intro": "old", "short": "kept" } })),
            fragment(json!({ "summaries": { "intro": { "en": "new" } } })),
        ]);
        assert_eq!(merged.summaries.len(), 2);
        assert_eq!(
            merged.summaries.get("intro"),
            Some(&LocalizedString::from([("en", "new")]))
        );
        assert_eq!(merged.summaries.get("short"), Some(&LocalizedString::from("kept")));
    }

    #[test]
    fn test_document_tags_concatenated() {
        let merged = merge_fragments(vec![
            fragment(json!({ "tags": ["global"] })),
            fragment(json!({ "tags": ["extra"] })),
        ]);
        assert_eq!(merged.tags, ["global", "extra"]);
    }
}
