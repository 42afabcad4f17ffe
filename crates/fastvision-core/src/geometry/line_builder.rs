//! Groups words into text lines based on vertical proximity to the line's
//! first word — not a running average, so a line can't drift as it grows.

use super::constants::{LINE_Y_TOLERANCE_FACTION, LINE_Y_TOLERANCE_MIN};
use super::word_builder::Word;
use crate::types::bbox;
use crate::types::Bbox;

#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub bbox: Bbox,
    pub fontname: String,
    pub size: f64,
    pub color: String,
    pub words: Vec<Word>,
}

pub fn build_lines(words: Vec<Word>) -> Vec<Line> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut sorted = words;
    sorted.sort_by(|a, b| a.bbox[1].partial_cmp(&b.bbox[1]).unwrap().then(a.bbox[0].partial_cmp(&b.bbox[0]).unwrap()));

    let mut lines: Vec<Vec<Word>> = Vec::new();
    let mut current: Vec<Word> = vec![sorted.remove(0)];

    for w in sorted {
        let ref_word = &current[0];
        let ref_mid_y = (ref_word.bbox[1] + ref_word.bbox[3]) / 2.0;
        let w_mid_y = (w.bbox[1] + w.bbox[3]) / 2.0;
        let tolerance = (ref_word.size * LINE_Y_TOLERANCE_FACTION).max(LINE_Y_TOLERANCE_MIN);

        if (w_mid_y - ref_mid_y).abs() <= tolerance {
            current.push(w);
        } else {
            lines.push(std::mem::replace(&mut current, vec![w]));
        }
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|mut line_words| {
            line_words.sort_by(|a, b| a.bbox[0].partial_cmp(&b.bbox[0]).unwrap());
            merge_words(line_words)
        })
        .collect()
}

fn merge_words(words: Vec<Word>) -> Line {
    let text = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");

    let mut font_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    let mut size_sum = 0.0;
    for w in &words {
        *font_counts.entry(w.fontname.as_str()).or_insert(0) += 1;
        size_sum += w.size;
    }
    let dominant_font = font_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let bboxes: Vec<Bbox> = words.iter().map(|w| w.bbox).collect();
    let merged_bbox = bbox::union_all(bboxes).unwrap_or([0.0, 0.0, 0.0, 0.0]);
    let color = words[0].color.clone();
    let size = (size_sum / words.len() as f64 * 100.0).round() / 100.0;

    Line {
        text,
        bbox: merged_bbox,
        fontname: dominant_font,
        size,
        color,
        words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, x1: f64, y0: f64, y1: f64, size: f64) -> Word {
        Word {
            text: text.to_string(),
            bbox: [x0, y0, x1, y1],
            fontname: "Helvetica".to_string(),
            size,
            color: "#000000".to_string(),
        }
    }

    #[test]
    fn words_on_same_baseline_join_one_line() {
        let words = vec![word("Hi", 0.0, 10.0, 0.0, 10.0, 10.0), word("World", 40.0, 80.0, 0.0, 10.0, 10.0)];
        let lines = build_lines(words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hi World");
    }

    #[test]
    fn words_far_apart_vertically_become_separate_lines() {
        let words = vec![word("Top", 0.0, 10.0, 0.0, 10.0, 10.0), word("Bottom", 0.0, 10.0, 100.0, 110.0, 10.0)];
        let lines = build_lines(words);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn line_words_are_ordered_left_to_right() {
        let words = vec![word("World", 40.0, 80.0, 0.0, 10.0, 10.0), word("Hi", 0.0, 10.0, 0.0, 10.0, 10.0)];
        let lines = build_lines(words);
        assert_eq!(lines[0].text, "Hi World");
    }
}
