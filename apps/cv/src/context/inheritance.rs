//! Tag Inheritance: one-time derivation pass run after merge.
//!
//! Document-level tags are prepended to every entry's own tags and to every
//! tagged cover-letter paragraph. Highlights are left alone: an untagged
//! highlight is matched against its parent entry, which already carries the
//! document tags.

use crate::models::cv::{CoverLetter, CvData, TaggedEntry};
use crate::models::localized::{ContentUnit, Tag};

pub fn inherit_tags(data: CvData) -> CvData {
    let global = data.tags.clone();

    CvData {
        work: with_global_tags(data.work, &global),
        volunteer: with_global_tags(data.volunteer, &global),
        education: with_global_tags(data.education, &global),
        awards: with_global_tags(data.awards, &global),
        certificates: with_global_tags(data.certificates, &global),
        publications: with_global_tags(data.publications, &global),
        skills: with_global_tags(data.skills, &global),
        projects: with_global_tags(data.projects, &global),
        languages: with_global_tags(data.languages, &global),
        interests: with_global_tags(data.interests, &global),
        facts: with_global_tags(data.facts, &global),
        references: with_global_tags(data.references, &global),
        letter: data.letter.map(|letter| letter_with_global_tags(letter, &global)),
        ..data
    }
}

fn union(global: &[Tag], own: Vec<Tag>) -> Vec<Tag> {
    global.iter().cloned().chain(own).collect()
}

fn with_global_tags<E: TaggedEntry>(entries: Vec<E>, global: &[Tag]) -> Vec<E> {
    entries
        .into_iter()
        .map(|mut entry| {
            let own = std::mem::take(entry.tags_mut());
            *entry.tags_mut() = union(global, own);
            entry
        })
        .collect()
}

fn letter_with_global_tags(mut letter: CoverLetter, global: &[Tag]) -> CoverLetter {
    letter.tags = union(global, std::mem::take(&mut letter.tags));

    if let Some(content) = letter.content.as_mut() {
        for paragraph in content.body.iter_mut() {
            // Plain paragraphs always pass the filter; nothing to inherit.
            if let ContentUnit::Tagged(unit) = paragraph {
                unit.tags = union(global, std::mem::take(&mut unit.tags));
            }
        }
    }

    letter
}
