//! Capability interface for a semantic-tagging backend. No concrete backend
//! ships in this crate — [`NullTagger`] is the default, and the orchestrator
//! falls back to heuristic classification whenever a tagger returns nothing.

mod heuristic;
pub mod prompts;

pub use heuristic::classify_block;

use crate::error::Result;
use crate::types::{Block, DomainType, ModalityType, RhetoricFeatures, TenseType, ToneType, VoiceType};

/// Compact, truncated view of a block handed to a tagger; never the full
/// block, since taggers should not need (or be trusted with) internal state.
#[derive(Debug, Clone)]
pub struct BlockSummary {
    pub index: usize,
    pub text: String,
    pub font: String,
    pub size: f64,
}

pub fn summarize_blocks(blocks: &[Block], text_chars: usize) -> Vec<BlockSummary> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let full = block.text.as_deref().unwrap_or("");
            let text = if full.chars().count() > text_chars {
                full.chars().take(text_chars).collect::<String>() + "..."
            } else {
                full.to_string()
            };
            BlockSummary { index, text, font: block.fontname.clone(), size: block.size }
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TaggedRhetoric {
    pub tone: Option<ToneType>,
    pub voice: Option<VoiceType>,
    pub modality: Option<ModalityType>,
    pub tense: Option<TenseType>,
    pub domain: Option<DomainType>,
}

#[derive(Debug, Clone)]
pub struct TagResult {
    pub block_index: usize,
    pub block_type: String,
    pub role: String,
    /// `None` when the tagger's response omitted the field entirely —
    /// distinct from `Some(0)`, which is a tagger-asserted "reads first".
    pub reading_order: Option<usize>,
    pub rhetoric: Option<TaggedRhetoric>,
    pub rhetoric_features: Option<RhetoricFeatures>,
    /// Echoed block text, when a tagger provides it; used by the block
    /// matcher's fuzzy pass to line up a tag whose `block_index` didn't
    /// survive the round trip. Most taggers omit it, leaving that pass a
    /// no-op.
    pub text: Option<String>,
}

/// A backend that can classify a page's (or office batch's) blocks. Any
/// exception, parse error, or missing field should surface as `Ok(vec![])`
/// rather than an error — an empty tag list is the orchestrator's signal to
/// fall back to heuristic classification for that page.
pub trait VisionTagger: Send + Sync {
    fn tag_page(&self, image: Option<&[u8]>, blocks: &[BlockSummary]) -> Result<Vec<TagResult>>;
    fn tag_batch(&self, blocks: &[BlockSummary]) -> Result<Vec<TagResult>>;
}

/// Always returns no tags, so the orchestrator's heuristic fallback runs
/// unconditionally. Used when no vision backend is configured.
pub struct NullTagger;

impl VisionTagger for NullTagger {
    fn tag_page(&self, _image: Option<&[u8]>, _blocks: &[BlockSummary]) -> Result<Vec<TagResult>> {
        Ok(Vec::new())
    }

    fn tag_batch(&self, _blocks: &[BlockSummary]) -> Result<Vec<TagResult>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
pub struct MockTagger {
    pub results: Vec<TagResult>,
}

#[cfg(test)]
impl VisionTagger for MockTagger {
    fn tag_page(&self, _image: Option<&[u8]>, _blocks: &[BlockSummary]) -> Result<Vec<TagResult>> {
        Ok(self.results.clone())
    }

    fn tag_batch(&self, _blocks: &[BlockSummary]) -> Result<Vec<TagResult>> {
        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tagger_always_returns_empty() {
        let tagger = NullTagger;
        assert!(tagger.tag_page(None, &[]).unwrap().is_empty());
        assert!(tagger.tag_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn summarize_truncates_long_text() {
        let mut block = crate::types::Block {
            id: "b".into(),
            block_type: crate::types::BlockType::Paragraph,
            role: None,
            page: 1,
            bbox: [0.0, 0.0, 1.0, 1.0],
            bbox_norm: None,
            reading_order: 0,
            z_index: 0,
            parent: None,
            children: None,
            text: Some("x".repeat(200)),
            style_id: None,
            html: None,
            html_template: None,
            rhetoric: None,
            rhetoric_features: None,
            fontname: "Helvetica".into(),
            size: 10.0,
            color: "#000000".into(),
            words: vec![],
        };
        let summaries = summarize_blocks(std::slice::from_mut(&mut block), 120);
        assert!(summaries[0].text.ends_with("..."));
        assert_eq!(summaries[0].text.chars().count(), 123);
    }
}
