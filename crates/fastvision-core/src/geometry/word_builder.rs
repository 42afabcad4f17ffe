//! Clusters extracted characters into words based on horizontal gaps.
//!
//! Chars are sorted top-to-bottom, left-to-right; a run of chars on the same
//! baseline is split into a new word whenever the horizontal gap between
//! consecutive chars exceeds a threshold derived from the run's average char
//! width and the previous char's font size.

use super::char_extractor::Char;
use super::constants::{GAP_FACTOR, SAME_LINE_OVERLAP_RATIO};
use crate::types::bbox;
use crate::types::Bbox;

#[derive(Debug, Clone)]
pub struct Word {
    pub text: String,
    pub bbox: Bbox,
    pub fontname: String,
    pub size: f64,
    pub color: String,
}

/// Clusters characters into words. Chars already carry top-down bboxes, so a
/// `same_line` test can compare `y0`/`y1` directly without re-flipping.
pub fn build_words(chars: &[Char]) -> Vec<Word> {
    if chars.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Char> = chars.iter().collect();
    sorted.sort_by(|a, b| {
        let ya = (a.bbox[1] * 10.0).round();
        let yb = (b.bbox[1] * 10.0).round();
        ya.partial_cmp(&yb).unwrap().then(a.bbox[0].partial_cmp(&b.bbox[0]).unwrap())
    });

    let mut words = Vec::new();
    let mut current: Vec<&Char> = vec![sorted[0]];

    for c in &sorted[1..] {
        let prev = *current.last().unwrap();

        let y_overlap = prev.bbox[3].min(c.bbox[3]) - prev.bbox[1].max(c.bbox[1]);
        let min_height = (prev.bbox[3] - prev.bbox[1]).min(c.bbox[3] - c.bbox[1]);
        let same_line = y_overlap > 0.0 && (y_overlap / min_height.max(0.1)) > SAME_LINE_OVERLAP_RATIO;

        if same_line {
            let gap = c.bbox[0] - prev.bbox[2];
            let avg_width = ((prev.bbox[2] - prev.bbox[0]) + (c.bbox[2] - c.bbox[0])) / 2.0;
            let threshold = (avg_width * GAP_FACTOR).max(prev.size * 0.25);

            if gap <= threshold {
                current.push(c);
                continue;
            }
        }

        words.push(merge_chars(&current));
        current = vec![c];
    }
    words.push(merge_chars(&current));

    words
}

fn merge_chars(chars: &[&Char]) -> Word {
    let text: String = chars.iter().map(|c| c.text.as_str()).collect();

    let mut font_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    let mut size_sum = 0.0;
    for c in chars {
        *font_counts.entry(c.fontname.as_str()).or_insert(0) += 1;
        size_sum += c.size;
    }
    let dominant_font = font_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let bboxes: Vec<Bbox> = chars.iter().map(|c| c.bbox).collect();
    let merged_bbox = bbox::union_all(bboxes).unwrap_or([0.0, 0.0, 0.0, 0.0]);

    Word {
        text,
        bbox: merged_bbox,
        fontname: dominant_font,
        size: (size_sum / chars.len() as f64 * 100.0).round() / 100.0,
        color: chars[0].color.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(text: &str, x0: f64, x1: f64, y0: f64, y1: f64, size: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: [x0, y0, x1, y1],
            fontname: "Helvetica".to_string(),
            size,
            color: "#000000".to_string(),
        }
    }

    #[test]
    fn adjacent_chars_merge_into_one_word() {
        let chars = vec![
            ch("H", 0.0, 5.0, 0.0, 10.0, 10.0),
            ch("i", 5.2, 7.0, 0.0, 10.0, 10.0),
        ];
        let words = build_words(&chars);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Hi");
    }

    #[test]
    fn large_gap_starts_new_word() {
        // "Hi World" — a gap far larger than font size must split the words.
        let chars = vec![
            ch("H", 0.0, 5.0, 0.0, 10.0, 10.0),
            ch("i", 5.2, 7.0, 0.0, 10.0, 10.0),
            ch("W", 40.0, 48.0, 0.0, 10.0, 10.0),
        ];
        let words = build_words(&chars);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Hi");
        assert_eq!(words[1].text, "W");
    }

    #[test]
    fn different_baselines_never_merge() {
        let chars = vec![
            ch("A", 0.0, 5.0, 0.0, 10.0, 10.0),
            ch("B", 0.0, 5.0, 100.0, 110.0, 10.0),
        ];
        let words = build_words(&chars);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn dominant_font_wins_merge() {
        let mut a = ch("x", 0.0, 5.0, 0.0, 10.0, 10.0);
        a.fontname = "Arial".to_string();
        let mut b = ch("y", 5.1, 10.0, 0.0, 10.0, 10.0);
        b.fontname = "Arial".to_string();
        let mut c = ch("z", 10.1, 15.0, 0.0, 10.0, 10.0);
        c.fontname = "Times".to_string();
        let words = build_words(&[a, b, c]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].fontname, "Arial");
    }
}
