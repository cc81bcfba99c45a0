pub mod cv;
pub mod localized;
pub mod query;
pub mod resume;

pub use cv::{CoverLetter, CvData, CvFragment, SummaryRegistry, TaggedEntry};
pub use localized::{ContentUnit, Language, LocalizedString, Tag, TaggedContent};
pub use query::{expand_queries, CvQuery, QueryOverrides, TagSelection};
pub use resume::{JsonResume, LocalizedLetter};
