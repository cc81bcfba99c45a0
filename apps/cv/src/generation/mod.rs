// CV generation: tag filtering, overrides and localization for one query.
// Everything here is pure; the pool is read-only and each query gets its own copy.

pub mod generator;
pub mod localizer;
pub mod overrides;
pub mod query_builder;
pub mod tag_filter;

pub use generator::{generate, generate_facts, generate_letter, generate_variant, GeneratedVariant};
pub use query_builder::QueryBuilder;
