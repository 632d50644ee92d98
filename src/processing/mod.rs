//! Skill extraction and matching engine

pub mod dictionary;
pub mod acronyms;
pub mod text_processor;
pub mod exact_matcher;
pub mod fuzzy_matcher;
pub mod context;
pub mod embeddings;
pub mod embedding_manager;
pub mod registry;
pub mod extractor;
pub mod job_analyzer;
pub mod scorer;

/// Clamp a score into [0, 1]; NaN collapses to 0
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
