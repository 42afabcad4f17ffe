//! Deduplicates font styles across the document and assigns each block a
//! `style_id`; idempotent since the hash is a pure function of the style's
//! own fields.

mod style_normalizer;

pub use style_normalizer::normalize_styles;
