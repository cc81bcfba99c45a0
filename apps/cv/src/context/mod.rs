// Content pool: loading, merging and tag inheritance.
// Runs once per build; the resulting CvData is read-only for every query.

pub mod inheritance;
pub mod loader;
pub mod merge;

pub use inheritance::inherit_tags;
pub use loader::{load_cv_data, load_fragments};
pub use merge::merge_fragments;
