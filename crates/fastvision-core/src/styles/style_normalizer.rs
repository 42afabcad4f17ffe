use std::collections::BTreeMap;

use crate::geometry::strip_subset_prefix;
use crate::types::{AlignType, Block, Style, WeightType};

/// Derives a [`Style`] from each block's carried font metadata, hashes it
/// into a stable `style_id`, and returns the deduplicated `id -> Style` map.
/// Alignment has no per-block signal in this pipeline, so every style gets
/// the same default.
pub fn normalize_styles(blocks: &mut [Block]) -> BTreeMap<String, Style> {
    let mut styles = BTreeMap::new();

    for block in blocks.iter_mut() {
        let fn_lower = block.fontname.to_lowercase();
        let weight = if fn_lower.contains("bold") { WeightType::Bold } else { WeightType::Normal };
        let italic = fn_lower.contains("italic") || fn_lower.contains("oblique");

        let style = Style {
            font_family: Some(strip_subset_prefix(&block.fontname).to_string()),
            size: Some((block.size * 10.0).round() / 10.0),
            weight: Some(weight),
            italic: Some(italic),
            underline: Some(false),
            color: Some(block.color.clone()),
            align: Some(AlignType::Left),
        };

        let style_id = style.compute_id();
        block.style_id = Some(style_id.clone());
        styles.entry(style_id).or_insert(style);
    }

    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockType;

    fn block(fontname: &str, size: f64, color: &str) -> Block {
        Block {
            id: "b1".to_string(),
            block_type: BlockType::Paragraph,
            role: None,
            page: 1,
            bbox: [0.0, 0.0, 1.0, 1.0],
            bbox_norm: None,
            reading_order: 0,
            z_index: 0,
            parent: None,
            children: None,
            text: Some("x".to_string()),
            style_id: None,
            html: None,
            html_template: None,
            rhetoric: None,
            rhetoric_features: None,
            fontname: fontname.to_string(),
            size,
            color: color.to_string(),
            words: vec![],
        }
    }

    #[test]
    fn bold_fontname_yields_bold_weight() {
        let mut blocks = vec![block("Helvetica-Bold", 18.0, "#000000")];
        let styles = normalize_styles(&mut blocks);
        let style = &styles[blocks[0].style_id.as_ref().unwrap()];
        assert_eq!(style.weight, Some(WeightType::Bold));
    }

    #[test]
    fn identical_fonts_dedupe_to_one_style() {
        let mut blocks = vec![block("Arial", 12.0, "#111111"), block("Arial", 12.0, "#111111")];
        let styles = normalize_styles(&mut blocks);
        assert_eq!(styles.len(), 1);
        assert_eq!(blocks[0].style_id, blocks[1].style_id);
    }

    #[test]
    fn is_idempotent_across_repeated_runs() {
        let mut blocks = vec![block("Times-Italic", 10.0, "#222222")];
        let first = normalize_styles(&mut blocks).keys().cloned().collect::<Vec<_>>();
        let second = normalize_styles(&mut blocks).keys().cloned().collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn subset_prefix_is_stripped_from_family() {
        let mut blocks = vec![block("ABCDEF+Georgia", 14.0, "#000000")];
        let styles = normalize_styles(&mut blocks);
        let style = &styles[blocks[0].style_id.as_ref().unwrap()];
        assert_eq!(style.font_family.as_deref(), Some("Georgia"));
    }
}
