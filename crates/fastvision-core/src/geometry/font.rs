//! Shared font-name normalization helpers, used by both the block builder's
//! same-family grouping test and the style normalizer's `font_family` cleanup.

use super::constants::FONT_FAMILY_SUFFIXES;

/// Strips an embedded-font subset prefix (`ABCDEF+Helvetica` → `Helvetica`).
pub fn strip_subset_prefix(fontname: &str) -> &str {
    match fontname.split_once('+') {
        Some((_, rest)) => rest,
        None => fontname,
    }
}

/// Subset-prefix-stripped family, further stripped of style suffixes
/// (`-Bold`, `,Italic`, ...), used only to decide whether two consecutive
/// lines belong to the same paragraph. Not the value stored as a block's
/// `fontname`.
pub fn normalized_family_for_grouping(fontname: &str) -> String {
    let mut family = strip_subset_prefix(fontname).to_string();
    for suffix in FONT_FAMILY_SUFFIXES {
        if let Some(stripped) = family.strip_suffix(suffix) {
            family = stripped.to_string();
            break;
        }
    }
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Helvetica"), "Helvetica");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
    }

    #[test]
    fn strips_bold_suffix() {
        assert_eq!(normalized_family_for_grouping("Helvetica-Bold"), "Helvetica");
        assert_eq!(normalized_family_for_grouping("ABCDEF+Helvetica-BoldItalic"), "Helvetica");
    }

    #[test]
    fn strips_comma_italic_suffix() {
        assert_eq!(normalized_family_for_grouping("Arial,Italic"), "Arial");
    }

    #[test]
    fn leaves_plain_family_untouched() {
        assert_eq!(normalized_family_for_grouping("Times New Roman"), "Times New Roman");
    }
}
