//! Merges adjacent lines into paragraph-like blocks: lines merge when the
//! vertical gap, horizontal origin shift, and font family are all consistent
//! with a single flowing paragraph; anything else starts a new block.

use uuid::Uuid;

use super::constants::{LINE_GAP_FACTOR, LINE_GAP_MIN, X_SHIFT_TOLERANCE};
use super::font::normalized_family_for_grouping;
use super::line_builder::Line;
use crate::types::bbox;
use crate::types::Bbox;
use crate::types::Block;
use crate::types::BlockType;

pub fn build_blocks(lines: Vec<Line>, page_number: usize) -> Vec<Block> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut sorted = lines;
    sorted.sort_by(|a, b| a.bbox[1].partial_cmp(&b.bbox[1]).unwrap());

    let mut groups: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = vec![sorted.remove(0)];

    for ln in sorted {
        let prev = current.last().unwrap();

        let gap = ln.bbox[1] - prev.bbox[3];
        let threshold = (prev.size * LINE_GAP_FACTOR).max(LINE_GAP_MIN);
        let x_shift = (ln.bbox[0] - prev.bbox[0]).abs();
        let same_family = normalized_family_for_grouping(&ln.fontname) == normalized_family_for_grouping(&prev.fontname);

        if gap <= threshold && x_shift <= X_SHIFT_TOLERANCE && same_family {
            current.push(ln);
        } else {
            groups.push(std::mem::replace(&mut current, vec![ln]));
        }
    }
    groups.push(current);

    groups.into_iter().map(|lines| merge_lines(lines, page_number)).collect()
}

fn merge_lines(lines: Vec<Line>, page_number: usize) -> Block {
    let text = lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n");

    let mut font_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    let mut size_sum = 0.0;
    for l in &lines {
        *font_counts.entry(l.fontname.as_str()).or_insert(0) += 1;
        size_sum += l.size;
    }
    let dominant_font = font_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let bboxes: Vec<Bbox> = lines.iter().map(|l| l.bbox).collect();
    let merged_bbox = bbox::union_all(bboxes).unwrap_or([0.0, 0.0, 0.0, 0.0]);
    let color = lines[0].color.clone();
    let size = (size_sum / lines.len() as f64 * 100.0).round() / 100.0;
    let words = lines.into_iter().flat_map(|l| l.words).collect();

    Block {
        id: Uuid::new_v4().to_string(),
        block_type: BlockType::Paragraph,
        role: None,
        page: page_number,
        bbox: merged_bbox,
        bbox_norm: None,
        reading_order: 0,
        z_index: 0,
        parent: None,
        children: None,
        text: Some(text),
        style_id: None,
        html: None,
        html_template: None,
        rhetoric: None,
        rhetoric_features: None,
        fontname: dominant_font,
        size,
        color,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::word_builder::Word;

    fn line(text: &str, x0: f64, x1: f64, y0: f64, y1: f64, size: f64, fontname: &str) -> Line {
        Line {
            text: text.to_string(),
            bbox: [x0, y0, x1, y1],
            fontname: fontname.to_string(),
            size,
            color: "#000000".to_string(),
            words: vec![Word {
                text: text.to_string(),
                bbox: [x0, y0, x1, y1],
                fontname: fontname.to_string(),
                size,
                color: "#000000".to_string(),
            }],
        }
    }

    #[test]
    fn consecutive_close_lines_form_one_block() {
        let lines = vec![
            line("First line", 0.0, 100.0, 0.0, 10.0, 10.0, "Helvetica"),
            line("Second line", 0.0, 100.0, 12.0, 22.0, 10.0, "Helvetica"),
        ];
        let blocks = build_blocks(lines, 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text.as_deref(), Some("First line\nSecond line"));
    }

    #[test]
    fn large_vertical_gap_splits_blocks() {
        let lines = vec![
            line("Para one", 0.0, 100.0, 0.0, 10.0, 10.0, "Helvetica"),
            line("Para two", 0.0, 100.0, 100.0, 110.0, 10.0, "Helvetica"),
        ];
        let blocks = build_blocks(lines, 1);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn horizontal_shift_splits_blocks_even_with_small_gap() {
        let lines = vec![
            line("Left column", 0.0, 100.0, 0.0, 10.0, 10.0, "Helvetica"),
            line("Right column", 200.0, 300.0, 12.0, 22.0, 10.0, "Helvetica"),
        ];
        let blocks = build_blocks(lines, 1);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn differing_font_family_splits_blocks() {
        let lines = vec![
            line("Heading", 0.0, 100.0, 0.0, 10.0, 10.0, "Helvetica-Bold"),
            line("Body text", 0.0, 100.0, 12.0, 22.0, 10.0, "Times"),
        ];
        let blocks = build_blocks(lines, 1);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn generated_ids_are_unique() {
        let lines = vec![
            line("A", 0.0, 100.0, 0.0, 10.0, 10.0, "Helvetica"),
            line("B", 0.0, 100.0, 100.0, 110.0, 10.0, "Helvetica"),
        ];
        let blocks = build_blocks(lines, 1);
        assert_ne!(blocks[0].id, blocks[1].id);
    }
}
