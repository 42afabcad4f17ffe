//! Named thresholds for the geometric clustering pipeline.

/// Word builder: a horizontal gap beyond `max(GAP_FACTOR * avg_char_width,
/// 0.25 * size)` starts a new word.
pub const GAP_FACTOR: f64 = 0.35;

/// Word builder: same-line test passes when vertical-overlap ratio exceeds this.
pub const SAME_LINE_OVERLAP_RATIO: f64 = 0.5;

/// Line builder: a word joins the current line when its vertical-midpoint
/// distance from the line's first word is within `max(0.6 * size, 3.0)`.
pub const LINE_Y_TOLERANCE_FACTION: f64 = 0.6;
pub const LINE_Y_TOLERANCE_MIN: f64 = 3.0;

/// Block builder: vertical-gap threshold `max(LINE_GAP_FACTOR * prev.size, 4.0)`.
pub const LINE_GAP_FACTOR: f64 = 1.5;
pub const LINE_GAP_MIN: f64 = 4.0;

/// Block builder: max allowed horizontal-origin shift between consecutive lines.
pub const X_SHIFT_TOLERANCE: f64 = 40.0;

/// Block builder: font-family suffixes stripped before the equality check,
/// tried longest-first so e.g. `-BoldItalic` isn't shadowed by `-Bold`.
pub const FONT_FAMILY_SUFFIXES: &[&str] = &[
    "-BoldItalic",
    "-Bold",
    "-Italic",
    ",BoldItalic",
    ",Bold",
    ",Italic",
    "-Regular",
    ",Regular",
];

/// Table extractor / de-duplication: blocks covered more than this fraction
/// by a table bbox are dropped.
pub const TABLE_OVERLAP_THRESHOLD: f64 = 0.5;

/// Block matcher: minimum LCS ratio to accept a fuzzy tag match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.4;
pub const FUZZY_MATCH_TEXT_CHARS: usize = 200;

/// Vision tagger: text truncation lengths and fan-out bound.
pub const PDF_TAGGER_TEXT_CHARS: usize = 120;
pub const OFFICE_TAGGER_TEXT_CHARS: usize = 80;
pub const OFFICE_TAGGER_BATCH_SIZE: usize = 50;
pub const TAGGER_MAX_IN_FLIGHT: usize = 8;

/// Heuristic classifier thresholds.
pub const HEADING_MIN_SIZE: f64 = 14.0;
pub const BOLD_HEADING_MIN_SIZE: f64 = 12.0;

/// Office extractor synthetic layout constants.
pub const OFFICE_LEFT_MARGIN: f64 = 72.0;
pub const OFFICE_LINE_HEIGHT_FACTOR: f64 = 1.4;
pub const OFFICE_GLYPH_WIDTH_FACTOR: f64 = 0.6;
pub const OFFICE_VERTICAL_ADVANCE_FACTOR: f64 = 0.4;
pub const OFFICE_WORD_WIDTH_FACTOR: f64 = 0.55;
pub const OFFICE_WORD_GAP_FACTOR: f64 = 0.3;
pub const OFFICE_TABLE_ROW_HEIGHT: f64 = 20.0;
pub const OFFICE_DEFAULT_PAGE_WIDTH: f64 = 612.0;
pub const OFFICE_DEFAULT_PAGE_HEIGHT: f64 = 792.0;
pub const OFFICE_HEADING_BOLD_MIN_SIZE: f64 = 14.0;
pub const EMU_PER_POINT: f64 = 12700.0;
/// OOXML `w:sectPr/w:pgSz` width/height attributes are twentieths of a point.
pub const EMU_PER_TWIP: f64 = 635.0;
pub const OFFICE_PARAGRAPH_SPACING_EMPTY: f64 = 6.0;
pub const OFFICE_TABLE_SPACING_AFTER: f64 = 12.0;
pub const OFFICE_TOP_MARGIN: f64 = 36.0;
