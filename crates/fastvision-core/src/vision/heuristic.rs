//! Heuristic fallback classifier, applied to every block on a page whenever
//! the tagger is disabled or fails. Never populates rhetoric — that's a
//! tagger-only field.

use crate::geometry::constants::{BOLD_HEADING_MIN_SIZE, HEADING_MIN_SIZE};
use crate::types::{BlockType, RoleType};

pub fn classify_block(fontname: &str, size: f64, text: &str) -> (BlockType, RoleType) {
    let is_bold = fontname.to_lowercase().contains("bold");

    if size >= HEADING_MIN_SIZE || (is_bold && size >= BOLD_HEADING_MIN_SIZE) {
        return (BlockType::Heading, RoleType::SectionTitle);
    }

    let trimmed = text.trim();
    let word_count = trimmed.split_whitespace().count();
    if word_count <= 3 && !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return (BlockType::PageNumber, RoleType::Footer);
    }

    if trimmed.starts_with(['•', '-', '–', '▪', '◦']) {
        return (BlockType::ListItem, RoleType::ListItem);
    }
    let mut chars = trimmed.chars();
    if let (Some(c0), Some(c1)) = (chars.next(), chars.next()) {
        if trimmed.len() > 2 && c0.is_ascii_digit() && (c1 == '.' || c1 == ')') {
            return (BlockType::ListItem, RoleType::ListItem);
        }
    }

    (BlockType::Paragraph, RoleType::Paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_text_is_heading() {
        let (bt, role) = classify_block("Helvetica", 18.0, "Hello");
        assert_eq!(bt, BlockType::Heading);
        assert_eq!(role, RoleType::SectionTitle);
    }

    #[test]
    fn bold_medium_text_is_heading() {
        let (bt, _) = classify_block("Helvetica-Bold", 12.0, "Section");
        assert_eq!(bt, BlockType::Heading);
    }

    #[test]
    fn standalone_digits_are_page_number() {
        let (bt, role) = classify_block("Helvetica", 10.0, "42");
        assert_eq!(bt, BlockType::PageNumber);
        assert_eq!(role, RoleType::Footer);
    }

    #[test]
    fn bullet_prefix_is_list_item() {
        let (bt, _) = classify_block("Helvetica", 10.0, "• first point");
        assert_eq!(bt, BlockType::ListItem);
    }

    #[test]
    fn digit_dot_prefix_is_list_item() {
        let (bt, _) = classify_block("Helvetica", 10.0, "1. first point");
        assert_eq!(bt, BlockType::ListItem);
    }

    #[test]
    fn plain_text_is_paragraph() {
        let (bt, role) = classify_block("Helvetica", 10.0, "Just a normal sentence.");
        assert_eq!(bt, BlockType::Paragraph);
        assert_eq!(role, RoleType::Paragraph);
    }
}
