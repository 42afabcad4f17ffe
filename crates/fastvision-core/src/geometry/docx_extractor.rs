//! Extracts structured blocks and tables from a DOCX file by walking the
//! document body in order and synthesizing bboxes from font metrics, since
//! OOXML paragraphs carry no native layout geometry. Produces the same
//! block/table shape the PDF geometry stages do so the rest of the pipeline
//! treats both inputs identically.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use uuid::Uuid;

use super::constants::*;
use crate::error::{FvError, Result};
use crate::types::{BlockType, Bbox, Page, PageUnit, RoleType, Table, TableCell};
use crate::types::Block;

pub struct DocxExtraction {
    pub pages: Vec<Page>,
    pub blocks: Vec<Block>,
    pub tables: Vec<Table>,
}

struct RawWord {
    text: String,
    bbox: Bbox,
    fontname: String,
    size: f64,
    color: String,
}

struct RawBlock {
    id: String,
    text: String,
    bbox: Bbox,
    fontname: String,
    size: f64,
    color: String,
    words: Vec<RawWord>,
    block_type: BlockType,
    role: RoleType,
}

struct RawTable {
    id: String,
    bbox: Bbox,
    rows: usize,
    cols: usize,
    cells: Vec<TableCell>,
}

pub fn extract_from_docx(path: &Path) -> Result<DocxExtraction> {
    let bytes = read_zip_entry(path, "word/document.xml")?;
    let style_names = read_zip_entry(path, "word/styles.xml")
        .ok()
        .map(|xml| parse_style_names(&xml))
        .unwrap_or_default();

    let xml = String::from_utf8_lossy(&bytes);
    let (page_w, page_h) = parse_page_size(&xml).unwrap_or((OFFICE_DEFAULT_PAGE_WIDTH, OFFICE_DEFAULT_PAGE_HEIGHT));

    let mut blocks = Vec::new();
    let mut tables = Vec::new();
    walk_body(&xml, page_w, &style_names, &mut blocks, &mut tables)?;

    let (pages, blocks, tables) = paginate(blocks, tables, page_w, page_h);
    Ok(DocxExtraction { pages, blocks, tables })
}

fn read_zip_entry(path: &Path, name: &str) -> Result<Vec<u8>> {
    let file = std::fs::File::open(path).map_err(|e| FvError::IoFailure { path: path.to_path_buf(), source: e })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| FvError::IoFailure {
        path: path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let mut entry = archive.by_name(name).map_err(|e| FvError::IoFailure {
        path: path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let mut buf = Vec::new();
    entry
        .read_to_end(&mut buf)
        .map_err(|e| FvError::IoFailure { path: path.to_path_buf(), source: e })?;
    Ok(buf)
}

fn local_name(name: quick_xml::name::QName) -> String {
    let s = name.as_ref();
    match s.iter().position(|&b| b == b':') {
        Some(i) => String::from_utf8_lossy(&s[i + 1..]).to_string(),
        None => String::from_utf8_lossy(s).to_string(),
    }
}

fn attr_value(e: &quick_xml::events::BytesStart, local: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if local_name(a.key) == local {
            Some(String::from_utf8_lossy(&a.value).to_string())
        } else {
            None
        }
    })
}

fn parse_page_size(xml: &str) -> Option<(f64, f64)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return None,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if local_name(e.name()) == "pgSz" => {
                let w = attr_value(&e, "w").and_then(|v| v.parse::<f64>().ok());
                let h = attr_value(&e, "h").and_then(|v| v.parse::<f64>().ok());
                if let (Some(w), Some(h)) = (w, h) {
                    return Some((twips_to_pt(w), twips_to_pt(h)));
                }
            }
            Ok(_) => {}
            Err(_) => return None,
        }
        buf.clear();
    }
}

fn twips_to_pt(twips: f64) -> f64 {
    (twips * EMU_PER_TWIP) / EMU_PER_POINT
}

fn parse_style_names(xml: &[u8]) -> HashMap<String, String> {
    let xml = String::from_utf8_lossy(xml);
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) if local_name(e.name()) == "style" => {
                current_id = attr_value(&e, "styleId");
            }
            Ok(Event::Empty(e)) if local_name(e.name()) == "name" => {
                if let (Some(id), Some(val)) = (current_id.clone(), attr_value(&e, "val")) {
                    names.insert(id, val.to_lowercase());
                }
            }
            Ok(Event::End(e)) if local_name(e.name()) == "style" => current_id = None,
            Ok(_) => {}
            Err(_) => break,
        }
        buf.clear();
    }
    names
}

/// Walks `w:body`'s direct children in document order, synthesizing a bbox
/// for each paragraph/table from a running vertical cursor rather than real
/// layout geometry.
fn walk_body(
    xml: &str,
    page_w: f64,
    style_names: &HashMap<String, String>,
    blocks: &mut Vec<RawBlock>,
    tables: &mut Vec<RawTable>,
) -> Result<()> {
    let left_margin = OFFICE_LEFT_MARGIN;
    let text_width = page_w - 2.0 * left_margin;
    let mut y_cursor = OFFICE_TOP_MARGIN;

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut body_depth: i32 = 0;
    let mut in_body = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = local_name(e.name());
                if name == "body" {
                    in_body = true;
                    body_depth = 1;
                } else if in_body && body_depth == 1 && name == "p" {
                    let para = parse_paragraph(&mut reader, style_names)?;
                    append_paragraph_block(para, left_margin, text_width, &mut y_cursor, blocks);
                } else if in_body && body_depth == 1 && name == "tbl" {
                    let table = parse_table(&mut reader)?;
                    append_table(table, left_margin, text_width, &mut y_cursor, tables);
                } else if in_body {
                    body_depth += 1;
                }
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(e.name());
                if in_body && body_depth == 1 && name == "tbl" {
                    // empty table element, nothing to extract
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name(e.name());
                if name == "body" {
                    break;
                }
                if in_body && body_depth > 1 {
                    body_depth -= 1;
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(FvError::IoFailure {
                    path: Path::new("word/document.xml").to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
        }
        buf.clear();
    }
    Ok(())
}

struct ParsedParagraph {
    text: String,
    font_name: Option<String>,
    font_size: Option<f64>,
    font_color: Option<String>,
    bold: bool,
    italic: bool,
    style_id: Option<String>,
    style_name: Option<String>,
}

/// Consumes events up to and including the matching `</w:p>`. Text is
/// collected from every `w:t`, including those inside `w:hyperlink` runs,
/// which `python-docx`-style `.text` accessors silently drop.
fn parse_paragraph(reader: &mut Reader<&[u8]>, style_names: &HashMap<String, String>) -> Result<ParsedParagraph> {
    let mut text = String::new();
    let mut font_name = None;
    let mut font_size = None;
    let mut font_color = None;
    let mut bold = false;
    let mut italic = false;
    let mut style_id = None;

    let mut captured_first_run = false;
    let mut in_first_run = false;
    let mut want_text = false;
    let mut depth = 1i32;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = local_name(e.name());
                match name.as_str() {
                    "p" => depth += 1,
                    "r" if !captured_first_run => in_first_run = true,
                    "pStyle" => style_id = attr_value(&e, "val"),
                    "rFonts" if in_first_run => {
                        if let Some(v) = attr_value(&e, "ascii") {
                            font_name = Some(v);
                        }
                    }
                    "sz" if in_first_run => {
                        if let Some(v) = attr_value(&e, "val").and_then(|v| v.parse::<f64>().ok()) {
                            font_size = Some(v / 2.0);
                        }
                    }
                    "color" if in_first_run => {
                        if let Some(v) = attr_value(&e, "val") {
                            if v.to_lowercase() != "auto" {
                                font_color = Some(format!("#{v}"));
                            }
                        }
                    }
                    "b" if in_first_run => {
                        bold = attr_value(&e, "val").map(|v| v != "0" && v.to_lowercase() != "false").unwrap_or(true)
                    }
                    "i" if in_first_run => {
                        italic = attr_value(&e, "val").map(|v| v != "0" && v.to_lowercase() != "false").unwrap_or(true)
                    }
                    "t" => want_text = true,
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if want_text {
                    text.push_str(&t.unescape().unwrap_or_default());
                    want_text = false;
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name(e.name());
                match name.as_str() {
                    "p" => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    "r" if in_first_run => {
                        captured_first_run = true;
                        in_first_run = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FvError::IoFailure {
                    path: Path::new("word/document.xml").to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    let style_name = style_id.as_ref().and_then(|id| style_names.get(id)).cloned();
    Ok(ParsedParagraph {
        text,
        font_name,
        font_size,
        font_color,
        bold,
        italic,
        style_id,
        style_name,
    })
}

/// Consumes events up to and including the matching `</w:tbl>`.
fn parse_table(reader: &mut Reader<&[u8]>) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut depth = 1i32;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = local_name(e.name());
                if name == "tbl" {
                    depth += 1;
                } else if name == "tr" {
                    rows.push(parse_table_row(reader)?);
                }
            }
            Ok(Event::End(e)) if local_name(e.name()) == "tbl" => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FvError::IoFailure {
                    path: Path::new("word/document.xml").to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(rows)
}

fn parse_table_row(reader: &mut Reader<&[u8]>) -> Result<Vec<String>> {
    let mut cells = Vec::new();
    let mut depth = 1i32;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = local_name(e.name());
                if name == "tr" {
                    depth += 1;
                } else if name == "tc" {
                    cells.push(collect_cell_text(reader)?);
                }
            }
            Ok(Event::End(e)) if local_name(e.name()) == "tr" => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FvError::IoFailure {
                    path: Path::new("word/document.xml").to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(cells)
}

fn collect_cell_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut want_text = false;
    let mut depth = 1i32;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = local_name(e.name());
                if name == "tc" {
                    depth += 1;
                } else if name == "t" {
                    want_text = true;
                }
            }
            Ok(Event::Text(t)) => {
                if want_text {
                    current.push_str(&t.unescape().unwrap_or_default());
                    want_text = false;
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name(e.name());
                if name == "p" {
                    paragraphs.push(std::mem::take(&mut current));
                } else if name == "tc" {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FvError::IoFailure {
                    path: Path::new("word/document.xml").to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs.join("\n").trim().to_string())
}

fn append_paragraph_block(para: ParsedParagraph, left_margin: f64, text_width: f64, y_cursor: &mut f64, blocks: &mut Vec<RawBlock>) {
    let text = para.text.trim().to_string();
    if text.is_empty() {
        *y_cursor += OFFICE_PARAGRAPH_SPACING_EMPTY;
        return;
    }

    let font_size = para.font_size.unwrap_or(11.0);
    let mut fontname = para.font_name.unwrap_or_else(|| "Calibri".to_string());
    if para.bold {
        fontname.push_str("-Bold");
    }
    if para.italic {
        fontname.push_str("-Italic");
    }
    let color = para.font_color.unwrap_or_else(|| "#000000".to_string());

    let line_height = font_size * OFFICE_LINE_HEIGHT_FACTOR;
    let num_lines = (text.len() as f64 * font_size * OFFICE_GLYPH_WIDTH_FACTOR / text_width + 0.5).max(1.0);
    let block_height = line_height * num_lines;

    let bbox_x0 = left_margin;
    let bbox_y0 = *y_cursor;
    let bbox_x1 = left_margin + text_width;
    let bbox_y1 = *y_cursor + block_height;

    let mut words = Vec::new();
    let mut word_x = bbox_x0;
    for word_text in text.split_whitespace() {
        let word_w = word_text.chars().count() as f64 * font_size * OFFICE_WORD_WIDTH_FACTOR;
        words.push(RawWord {
            text: word_text.to_string(),
            bbox: [word_x, bbox_y0, (word_x + word_w).min(bbox_x1), bbox_y1],
            fontname: fontname.clone(),
            size: font_size,
            color: color.clone(),
        });
        word_x += word_w + font_size * OFFICE_WORD_GAP_FACTOR;
        if word_x > bbox_x1 {
            word_x = bbox_x0;
        }
    }

    let (block_type, role) = classify_paragraph(para.style_name.as_deref(), para.style_id.as_deref(), font_size, para.bold, &text);

    blocks.push(RawBlock {
        id: Uuid::new_v4().to_string(),
        text,
        bbox: [bbox_x0, bbox_y0, bbox_x1, bbox_y1],
        fontname,
        size: font_size,
        color,
        words,
        block_type,
        role,
    });

    *y_cursor = bbox_y1 + font_size * OFFICE_VERTICAL_ADVANCE_FACTOR;
}

fn classify_paragraph(style_name: Option<&str>, style_id: Option<&str>, font_size: f64, bold: bool, text: &str) -> (BlockType, RoleType) {
    let lowered = style_name.map(|s| s.to_string()).or_else(|| style_id.map(|s| s.to_lowercase())).unwrap_or_default();

    if lowered.contains("title") {
        return (BlockType::Heading, RoleType::Title);
    }
    if lowered.contains("heading") {
        for lvl in 1..=6 {
            if lowered.contains(&lvl.to_string()) {
                return if lvl <= 2 { (BlockType::Heading, RoleType::SectionTitle) } else { (BlockType::Heading, RoleType::SubsectionTitle) };
            }
        }
        return (BlockType::Heading, RoleType::SectionTitle);
    }
    if lowered.contains("list") || lowered.contains("bullet") {
        return (BlockType::ListItem, RoleType::ListItem);
    }
    if lowered.contains("caption") {
        return (BlockType::Caption, RoleType::Caption);
    }
    if lowered.contains("code") || lowered.contains("mono") {
        return (BlockType::CodeBlock, RoleType::Paragraph);
    }
    if bold && font_size >= OFFICE_HEADING_BOLD_MIN_SIZE {
        return (BlockType::Heading, RoleType::SectionTitle);
    }

    let stripped = text.trim_start();
    if stripped.starts_with(['•', '–', '—', '▪', '◦', '○']) {
        return (BlockType::ListItem, RoleType::ListItem);
    }
    let mut chars = stripped.chars();
    if let (Some(c0), Some(c1)) = (chars.next(), chars.next()) {
        if stripped.len() > 2 && c0.is_ascii_digit() && (c1 == '.' || c1 == ')') {
            return (BlockType::ListItem, RoleType::ListItem);
        }
    }
    (BlockType::Paragraph, RoleType::Paragraph)
}

fn append_table(rows: Vec<Vec<String>>, left_margin: f64, text_width: f64, y_cursor: &mut f64, tables: &mut Vec<RawTable>) {
    let n_rows = rows.len();
    let n_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return;
    }

    let table_height = n_rows as f64 * OFFICE_TABLE_ROW_HEIGHT;
    let bbox = [left_margin, *y_cursor, left_margin + text_width, *y_cursor + table_height];

    let col_w = text_width / n_cols.max(1) as f64;
    let row_h = table_height / n_rows.max(1) as f64;
    let mut cells = Vec::with_capacity(n_rows * n_cols);
    for (r, row) in rows.into_iter().enumerate() {
        for (c, text) in row.into_iter().enumerate() {
            cells.push(TableCell {
                row: r,
                col: c,
                row_span: 1,
                col_span: 1,
                text,
                bbox: [
                    left_margin + c as f64 * col_w,
                    *y_cursor + r as f64 * row_h,
                    left_margin + (c + 1) as f64 * col_w,
                    *y_cursor + (r + 1) as f64 * row_h,
                ],
                bbox_norm: None,
                style_id: None,
            });
        }
    }

    tables.push(RawTable {
        id: Uuid::new_v4().to_string(),
        bbox,
        rows: n_rows,
        cols: n_cols,
        cells,
    });

    *y_cursor += table_height + OFFICE_TABLE_SPACING_AFTER;
}

/// Splits synthesized content across pages of height `page_h`, rebasing each
/// block/table's y-coordinates to its page's own origin. A block exactly on
/// a page boundary belongs to the lower (earlier) page — matching the strict
/// `<` comparison the original pagination pass used.
fn paginate(blocks: Vec<RawBlock>, tables: Vec<RawTable>, page_w: f64, page_h: f64) -> (Vec<Page>, Vec<Block>, Vec<Table>) {
    if blocks.is_empty() && tables.is_empty() {
        let page = Page {
            page_number: 1,
            width: page_w,
            height: page_h,
            rotation: 0,
            unit: PageUnit::Pt,
        };
        return (vec![page], Vec::new(), Vec::new());
    }

    let max_y = blocks
        .iter()
        .map(|b| b.bbox[3])
        .chain(tables.iter().map(|t| t.bbox[3]))
        .fold(0.0f64, f64::max);
    let n_pages = ((max_y / page_h) as usize + 1).max(1);

    let mut pages = Vec::with_capacity(n_pages);
    let mut out_blocks = Vec::with_capacity(blocks.len());
    let mut out_tables = Vec::with_capacity(tables.len());
    let mut reading_order_counters = vec![0usize; n_pages];

    for page_num in 1..=n_pages {
        pages.push(Page {
            page_number: page_num,
            width: page_w,
            height: page_h,
            rotation: 0,
            unit: PageUnit::Pt,
        });

        let page_top = (page_num - 1) as f64 * page_h;
        let page_bottom = page_top + page_h;

        for b in &blocks {
            if b.bbox[1] >= page_top && b.bbox[1] < page_bottom {
                let reading_order = reading_order_counters[page_num - 1];
                reading_order_counters[page_num - 1] += 1;
                out_blocks.push(Block {
                    id: b.id.clone(),
                    block_type: b.block_type,
                    role: Some(b.role),
                    page: page_num,
                    bbox: [b.bbox[0], b.bbox[1] - page_top, b.bbox[2], b.bbox[3] - page_top],
                    bbox_norm: None,
                    reading_order,
                    z_index: 0,
                    parent: None,
                    children: None,
                    text: Some(b.text.clone()),
                    style_id: None,
                    html: None,
                    html_template: None,
                    rhetoric: None,
                    rhetoric_features: None,
                    fontname: b.fontname.clone(),
                    size: b.size,
                    color: b.color.clone(),
                    words: b
                        .words
                        .iter()
                        .map(|w| crate::geometry::Word {
                            text: w.text.clone(),
                            bbox: [w.bbox[0], w.bbox[1] - page_top, w.bbox[2], w.bbox[3] - page_top],
                            fontname: w.fontname.clone(),
                            size: w.size,
                            color: w.color.clone(),
                        })
                        .collect(),
                });
            }
        }

        for t in &tables {
            if t.bbox[1] >= page_top && t.bbox[1] < page_bottom {
                out_tables.push(Table {
                    id: t.id.clone(),
                    page: page_num,
                    rows: t.rows,
                    cols: t.cols,
                    bbox: Some([t.bbox[0], t.bbox[1] - page_top, t.bbox[2], t.bbox[3] - page_top]),
                    cells: t
                        .cells
                        .iter()
                        .map(|c| TableCell {
                            row: c.row,
                            col: c.col,
                            row_span: c.row_span,
                            col_span: c.col_span,
                            text: c.text.clone(),
                            bbox: [c.bbox[0], c.bbox[1] - page_top, c.bbox[2], c.bbox[3] - page_top],
                            bbox_norm: None,
                            style_id: None,
                        })
                        .collect(),
                });
            }
        }
    }

    (pages, out_blocks, out_tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twips_to_pt_converts_letter_width() {
        // US Letter width is 12240 twips == 612pt.
        assert!((twips_to_pt(12240.0) - 612.0).abs() < 1e-6);
    }

    #[test]
    fn classify_heading_style_name() {
        let (bt, role) = classify_paragraph(Some("heading 1"), None, 11.0, false, "Intro");
        assert_eq!(bt, BlockType::Heading);
        assert_eq!(role, RoleType::SectionTitle);
    }

    #[test]
    fn classify_bullet_text_as_list_item() {
        let (bt, _) = classify_paragraph(None, None, 11.0, false, "• first point");
        assert_eq!(bt, BlockType::ListItem);
    }

    #[test]
    fn classify_plain_text_as_paragraph() {
        let (bt, role) = classify_paragraph(None, None, 11.0, false, "Just a sentence.");
        assert_eq!(bt, BlockType::Paragraph);
        assert_eq!(role, RoleType::Paragraph);
    }
}
