//! Geometry-to-semantics document intelligence pipeline: turns a PDF or
//! DOCX file into a validated, layout-and-tone-aware JSON document.
//!
//! The pipeline runs in five stages, each independently testable:
//! geometry extraction (chars → words → lines → blocks, or a direct
//! paragraph/table walk for DOCX), optional vision-backed semantic
//! tagging with a heuristic fallback, block matching, style
//! normalization, and schema assembly.

pub mod config;
pub mod error;
pub mod geometry;
pub mod merger;
pub mod pipeline;
pub mod styles;
pub mod types;
pub mod vision;

pub use config::PipelineConfig;
pub use error::{FvError, Result};
pub use pipeline::process;
pub use types::LayoutDocument;
pub use vision::{NullTagger, VisionTagger};
