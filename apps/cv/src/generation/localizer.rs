//! Localizer: projects a filtered document onto one language.
//!
//! Every `LocalizedString` is resolved through the fallback chain in
//! [`LocalizedString::resolve`]; tags and language maps do not survive.
//! Sections that end up empty are omitted from the output instead of being
//! emitted as `[]`.

use crate::models::cv::{
    Award, Basics, Certificate, CoverLetter, CvData, Education, Interest, LanguageSkill,
    LetterContent, Location, PostalAddress, Project, Publication, Recipient, Reference, Sender,
    SenderLocation, Skill, Volunteer, Work,
};
use crate::models::localized::{ContentUnit, LocalizedString};
use crate::models::resume::{
    JsonResume, LocalizedAddress, LocalizedLetter, LocalizedLetterContent, LocalizedRecipient,
    LocalizedSender, LocalizedSenderLocation, ResumeAward, ResumeBasics, ResumeCertificate,
    ResumeEducation, ResumeInterest, ResumeLanguage, ResumeLocation, ResumeMeta, ResumeProject,
    ResumePublication, ResumeReference, ResumeSkill, ResumeVolunteer, ResumeWork,
    JSON_RESUME_SCHEMA,
};

/// Resolves a single localized value. See [`LocalizedString::resolve`].
pub fn resolve(value: &LocalizedString, language: &str) -> Option<String> {
    value.resolve(language)
}

/// Conversion of a content record into its plain-string form for one language.
pub trait Localize {
    type Output;

    fn localize(&self, language: &str) -> Self::Output;
}

fn opt(value: &Option<LocalizedString>, language: &str) -> Option<String> {
    value.as_ref().and_then(|v| v.resolve(language))
}

/// Element-wise resolution; unresolvable elements are dropped.
fn list(values: &[LocalizedString], language: &str) -> Vec<String> {
    values.iter().filter_map(|v| v.resolve(language)).collect()
}

fn units(values: &[ContentUnit], language: &str) -> Vec<String> {
    values.iter().filter_map(|u| u.resolve(language)).collect()
}

/// `None` for an empty section so it is left out of the JSON.
fn section<T: Localize>(entries: &[T], language: &str) -> Option<Vec<T::Output>> {
    if entries.is_empty() {
        return None;
    }
    Some(entries.iter().map(|e| e.localize(language)).collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Document projection
// ────────────────────────────────────────────────────────────────────────────

/// Builds the JSON Resume document for `language`.
pub fn project(data: &CvData, language: &str) -> JsonResume {
    JsonResume {
        schema: JSON_RESUME_SCHEMA.to_string(),
        meta: ResumeMeta {
            language: language.to_string(),
        },
        basics: data.basics.as_ref().map(|b| b.localize(language)),
        work: section(&data.work, language),
        volunteer: section(&data.volunteer, language),
        education: section(&data.education, language),
        awards: section(&data.awards, language),
        certificates: section(&data.certificates, language),
        publications: section(&data.publications, language),
        skills: section(&data.skills, language),
        projects: section(&data.projects, language),
        languages: section(&data.languages, language),
        interests: section(&data.interests, language),
        references: section(&data.references, language),
    }
}

/// Flat list of fact strings; facts resolving to nothing or to `""` are dropped.
pub fn project_facts(data: &CvData, language: &str) -> Vec<String> {
    data.facts
        .iter()
        .filter_map(|fact| fact.content.resolve(language))
        .filter(|content| !content.is_empty())
        .collect()
}

pub fn project_letter(letter: &CoverLetter, language: &str) -> LocalizedLetter {
    letter.localize(language)
}

// ────────────────────────────────────────────────────────────────────────────
// Per-record conversions
// ────────────────────────────────────────────────────────────────────────────

impl Localize for Location {
    type Output = ResumeLocation;

    fn localize(&self, language: &str) -> ResumeLocation {
        ResumeLocation {
            address: opt(&self.address, language),
            postal_code: self.postal_code.clone(),
            city: opt(&self.city, language),
            country_code: self.country_code.clone(),
            region: opt(&self.region, language),
        }
    }
}

impl Localize for Basics {
    type Output = ResumeBasics;

    fn localize(&self, language: &str) -> ResumeBasics {
        ResumeBasics {
            name: opt(&self.name, language),
            label: opt(&self.label, language),
            image: self.image.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            url: self.url.clone(),
            summary: opt(&self.summary, language),
            location: self.location.as_ref().map(|l| l.localize(language)),
            profiles: self.profiles.clone(),
        }
    }
}

impl Localize for Work {
    type Output = ResumeWork;

    fn localize(&self, language: &str) -> ResumeWork {
        ResumeWork {
            name: opt(&self.name, language),
            position: opt(&self.position, language),
            url: self.url.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            summary: opt(&self.summary, language),
            highlights: units(&self.highlights, language),
        }
    }
}

impl Localize for Volunteer {
    type Output = ResumeVolunteer;

    fn localize(&self, language: &str) -> ResumeVolunteer {
        ResumeVolunteer {
            organization: opt(&self.organization, language),
            position: opt(&self.position, language),
            url: self.url.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            summary: opt(&self.summary, language),
            highlights: units(&self.highlights, language),
        }
    }
}

impl Localize for Education {
    type Output = ResumeEducation;

    fn localize(&self, language: &str) -> ResumeEducation {
        ResumeEducation {
            institution: opt(&self.institution, language),
            url: self.url.clone(),
            area: opt(&self.area, language),
            study_type: opt(&self.study_type, language),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            score: self.score.clone(),
            courses: list(&self.courses, language),
        }
    }
}

impl Localize for Skill {
    type Output = ResumeSkill;

    fn localize(&self, language: &str) -> ResumeSkill {
        ResumeSkill {
            name: opt(&self.name, language),
            level: opt(&self.level, language),
            keywords: list(&self.keywords, language),
        }
    }
}

impl Localize for Project {
    type Output = ResumeProject;

    fn localize(&self, language: &str) -> ResumeProject {
        ResumeProject {
            name: opt(&self.name, language),
            description: opt(&self.description, language),
            highlights: units(&self.highlights, language),
            keywords: list(&self.keywords, language),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            url: self.url.clone(),
            roles: list(&self.roles, language),
            entity: opt(&self.entity, language),
            project_type: opt(&self.project_type, language),
        }
    }
}

impl Localize for LanguageSkill {
    type Output = ResumeLanguage;

    fn localize(&self, language: &str) -> ResumeLanguage {
        ResumeLanguage {
            language: opt(&self.language, language),
            fluency: opt(&self.fluency, language),
        }
    }
}

impl Localize for Interest {
    type Output = ResumeInterest;

    fn localize(&self, language: &str) -> ResumeInterest {
        ResumeInterest {
            name: opt(&self.name, language),
            keywords: list(&self.keywords, language),
        }
    }
}

impl Localize for Award {
    type Output = ResumeAward;

    fn localize(&self, language: &str) -> ResumeAward {
        ResumeAward {
            title: opt(&self.title, language),
            date: self.date.clone(),
            awarder: opt(&self.awarder, language),
            summary: opt(&self.summary, language),
        }
    }
}

impl Localize for Certificate {
    type Output = ResumeCertificate;

    fn localize(&self, language: &str) -> ResumeCertificate {
        ResumeCertificate {
            name: opt(&self.name, language),
            date: self.date.clone(),
            issuer: opt(&self.issuer, language),
            url: self.url.clone(),
        }
    }
}

impl Localize for Publication {
    type Output = ResumePublication;

    fn localize(&self, language: &str) -> ResumePublication {
        ResumePublication {
            name: opt(&self.name, language),
            publisher: opt(&self.publisher, language),
            release_date: self.release_date.clone(),
            url: self.url.clone(),
            summary: opt(&self.summary, language),
        }
    }
}

impl Localize for Reference {
    type Output = ResumeReference;

    fn localize(&self, language: &str) -> ResumeReference {
        ResumeReference {
            name: opt(&self.name, language),
            reference: opt(&self.reference, language),
        }
    }
}

// ── Cover letter ──────────────────────────────────────────────────────────

impl Localize for PostalAddress {
    type Output = LocalizedAddress;

    fn localize(&self, language: &str) -> LocalizedAddress {
        LocalizedAddress {
            street: opt(&self.street, language),
            city: opt(&self.city, language),
            postal_code: self.postal_code.clone(),
            region: opt(&self.region, language),
            country_code: self.country_code.clone(),
        }
    }
}

impl Localize for Recipient {
    type Output = LocalizedRecipient;

    fn localize(&self, language: &str) -> LocalizedRecipient {
        LocalizedRecipient {
            company: opt(&self.company, language),
            name: opt(&self.name, language),
            title: opt(&self.title, language),
            address: self.address.as_ref().map(|a| a.localize(language)),
        }
    }
}

impl Localize for LetterContent {
    type Output = LocalizedLetterContent;

    fn localize(&self, language: &str) -> LocalizedLetterContent {
        LocalizedLetterContent {
            opening: opt(&self.opening, language),
            body: units(&self.body, language),
            closing: opt(&self.closing, language),
        }
    }
}

impl Localize for SenderLocation {
    type Output = LocalizedSenderLocation;

    fn localize(&self, language: &str) -> LocalizedSenderLocation {
        LocalizedSenderLocation {
            city: opt(&self.city, language),
            region: opt(&self.region, language),
            country_code: self.country_code.clone(),
        }
    }
}

impl Localize for Sender {
    type Output = LocalizedSender;

    fn localize(&self, language: &str) -> LocalizedSender {
        LocalizedSender {
            name: opt(&self.name, language),
            email: self.email.clone(),
            phone: self.phone.clone(),
            location: self.location.as_ref().map(|l| l.localize(language)),
            url: self.url.clone(),
        }
    }
}

impl Localize for CoverLetter {
    type Output = LocalizedLetter;

    fn localize(&self, language: &str) -> LocalizedLetter {
        LocalizedLetter {
            recipient: self.recipient.as_ref().map(|r| r.localize(language)),
            subject: opt(&self.subject, language),
            content: self.content.as_ref().map(|c| c.localize(language)),
            sender: self.sender.as_ref().map(|s| s.localize(language)),
            date: self.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::Fact;
    use serde_json::json;

    fn sample() -> CvData {
        serde_json::from_value(json!({
            "basics": {
                "name": "Gottfried Wilhelm Leibniz",
                "label": { "en": "Polymath", "fr": "Polymathe" },
                "summary": { "en": "Hello", "fr": "Bonjour" },
                "location": { "city": { "en": "Hanover", "de": "Hannover" }, "countryCode": "DE" }
            },
            "work": [{
                "name": "House of Hanover",
                "position": { "en": "Librarian", "fr": "Bibliothécaire" },
                "startDate": "1676-01-01",
                "highlights": [
                    { "content": { "en": "Catalogued", "fr": "Catalogué" }, "tags": ["archives"] },
                    { "en": "Plain localized" },
                    "Plain string"
                ],
                "tags": ["court"]
            }],
            "skills": [{
                "name": "Calculus",
                "keywords": [{ "en": "Integration" }, "Differentiation", {}]
            }],
            "education": [{ "institution": "Leipzig", "courses": [{ "de": "Philosophie" }] }],
            "facts": [
                { "content": { "en": "Invented binary arithmetic", "fr": "A inventé l'arithmétique binaire" } },
                { "content": "" },
                { "content": {} }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_project_resolves_requested_language() {
        let resume = project(&sample(), "fr");
        assert_eq!(resume.meta.language, "fr");
        assert_eq!(resume.schema, JSON_RESUME_SCHEMA);

        let basics = resume.basics.unwrap();
        assert_eq!(basics.name.as_deref(), Some("Gottfried Wilhelm Leibniz"));
        assert_eq!(basics.label.as_deref(), Some("Polymathe"));
        assert_eq!(basics.summary.as_deref(), Some("Bonjour"));
        assert_eq!(
            basics.location.unwrap().city.as_deref(),
            Some("Hanover"),
            "No French city, falls back to English"
        );
    }

    #[test]
    fn test_highlights_become_bare_strings() {
        let resume = project(&sample(), "fr");
        let work = &resume.work.unwrap()[0];
        assert_eq!(work.position.as_deref(), Some("Bibliothécaire"));
        assert_eq!(work.start_date.as_deref(), Some("1676-01-01"));
        assert_eq!(
            work.highlights,
            ["Catalogué", "Plain localized", "Plain string"]
        );
    }

    #[test]
    fn test_unresolved_list_elements_dropped() {
        let resume = project(&sample(), "en");
        assert_eq!(
            resume.skills.unwrap()[0].keywords,
            ["Integration", "Differentiation"]
        );
        assert_eq!(
            resume.education.unwrap()[0].courses,
            ["Philosophie"],
            "Only German is available, so it is the first available language"
        );
    }

    #[test]
    fn test_empty_sections_omitted() {
        let resume = project(&sample(), "en");
        assert!(resume.projects.is_none());
        assert!(resume.references.is_none());

        let json = serde_json::to_value(&resume).unwrap();
        assert!(json.get("projects").is_none(), "Empty section must be absent, not []");
        assert!(json.get("work").is_some());
        assert_eq!(json["$schema"], JSON_RESUME_SCHEMA);
    }

    #[test]
    fn test_output_contains_no_tags() {
        let json = serde_json::to_string(&project(&sample(), "en")).unwrap();
        assert!(!json.contains("\"tags\""));
        assert!(!json.contains("archives"));
    }

    #[test]
    fn test_project_facts_drops_empty() {
        assert_eq!(
            project_facts(&sample(), "fr"),
            ["A inventé l'arithmétique binaire"]
        );
    }

    #[test]
    fn test_project_facts_empty_section() {
        let data = CvData {
            facts: vec![Fact {
                content: "".into(),
                tags: vec![],
            }],
            ..Default::default()
        };
        assert!(project_facts(&data, "en").is_empty());
    }

    #[test]
    fn test_project_letter_recurses() {
        let letter: CoverLetter = serde_json::from_value(json!({
            "recipient": {
                "company": "Tech Corp",
                "title": { "en": "Hiring Manager", "fr": "Responsable du recrutement" },
                "address": { "city": { "en": "Paris" }, "postalCode": "75001" }
            },
            "subject": { "en": "Application", "fr": "Candidature" },
            "content": {
                "opening": { "en": "Dear team", "fr": "Chère équipe" },
                "body": [
                    { "content": { "en": "First", "fr": "Premier" }, "tags": ["senior"] },
                    { "en": "Second", "fr": "Deuxième" }
                ],
                "closing": "Leibniz"
            },
            "sender": { "name": "G. W. Leibniz", "location": { "city": "Hanover" } },
            "date": "1700-07-11",
            "tags": ["letter"]
        }))
        .unwrap();

        let localized = project_letter(&letter, "fr");
        let recipient = localized.recipient.unwrap();
        assert_eq!(recipient.title.as_deref(), Some("Responsable du recrutement"));
        assert_eq!(recipient.address.unwrap().postal_code.as_deref(), Some("75001"));
        assert_eq!(localized.subject.as_deref(), Some("Candidature"));

        let content = localized.content.unwrap();
        assert_eq!(content.opening.as_deref(), Some("Chère équipe"));
        assert_eq!(content.body, ["Premier", "Deuxième"]);
        assert_eq!(content.closing.as_deref(), Some("Leibniz"));
        assert_eq!(
            localized.sender.unwrap().location.unwrap().city.as_deref(),
            Some("Hanover")
        );
        assert_eq!(localized.date.as_deref(), Some("1700-07-11"));
    }

    #[test]
    fn test_resolve_helper_matches_fallback_chain() {
        assert_eq!(resolve(&LocalizedString::from([("en", "X")]), "fr").as_deref(), Some("X"));
        assert_eq!(resolve(&LocalizedString::from("X"), "de").as_deref(), Some("X"));
        assert_eq!(
            resolve(&LocalizedString::from([("fr", "Y"), ("en", "X")]), "fr").as_deref(),
            Some("Y")
        );
    }
}
