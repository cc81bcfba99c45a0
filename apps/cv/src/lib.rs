//! Systematic CV: one pool of tagged, multi-language CV content, many targeted
//! JSON Resume documents.
//!
//! Pipeline: [`context`] loads and merges fragments, [`generation`] filters,
//! overrides and localizes per query, [`build`] writes the outputs.

pub mod build;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod generation;
pub mod models;
