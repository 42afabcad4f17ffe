//! Merges geometry blocks with tagger output and assembles the final schema.

mod block_matcher;
mod schema_assembler;

pub use block_matcher::match_blocks_to_tags;
pub use schema_assembler::{assemble_document, PageGeometry};
