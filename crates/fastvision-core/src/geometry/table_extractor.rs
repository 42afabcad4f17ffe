//! Detects ruled tables on a PDF page from the page's path objects and
//! approximates each cell's bounding box by uniformly dividing the detected
//! grid, since pdfium exposes drawn line segments but not pdfplumber-style
//! per-cell geometry.

use pdfium_render::prelude::*;
use uuid::Uuid;

use super::char_extractor::Char;
use super::constants::TABLE_OVERLAP_THRESHOLD;
use crate::error::FvError;
use crate::types::bbox;
use crate::types::{Block, Table, TableCell};

/// Coordinates within this many points are treated as the same grid line.
const GRID_CLUSTER_TOLERANCE: f64 = 2.0;
/// A ruled table needs at least this many lines in each direction (2 lines
/// bound 1 row/col; we require at least 2 rows and 2 cols, so 3 lines each).
const MIN_GRID_LINES: usize = 3;

/// Non-fatal: any failure to read page objects yields zero tables for the page.
pub fn extract_tables(page: &PdfPage, page_number: usize, page_height: f64, chars: &[Char]) -> Vec<Table> {
    let objects: Vec<PdfPageObject> = page.objects().iter().collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut unreadable = 0usize;
    for obj in &objects {
        let Some(path) = obj.as_path_object() else { continue };
        let bounds = match path.bounds() {
            Ok(b) => b,
            Err(e) => {
                unreadable += 1;
                tracing::trace!(page = page_number, error = %e, "unreadable path object bounds");
                continue;
            }
        };
        let left = bounds.left().value as f64;
        let right = bounds.right().value as f64;
        let bottom = page_height - bounds.bottom().value as f64;
        let top = page_height - bounds.top().value as f64;
        let width = (right - left).abs();
        let height = (bottom - top).abs();

        if width < GRID_CLUSTER_TOLERANCE && height > 5.0 {
            xs.push((left + right) / 2.0);
        } else if height < GRID_CLUSTER_TOLERANCE && width > 5.0 {
            ys.push((top + bottom) / 2.0);
        }
    }

    let grid_xs = cluster(&mut xs);
    let grid_ys = cluster(&mut ys);

    if grid_xs.len() < MIN_GRID_LINES || grid_ys.len() < MIN_GRID_LINES {
        if unreadable > 0 {
            let err = FvError::TableDetectionFailure {
                page: page_number,
                reason: format!("{unreadable} path object(s) had unreadable bounds"),
            };
            tracing::warn!("{err}");
        }
        return Vec::new();
    }

    let table_bbox = [grid_xs[0], grid_ys[0], *grid_xs.last().unwrap(), *grid_ys.last().unwrap()];
    let rows = grid_ys.len() - 1;
    let cols = grid_xs.len() - 1;

    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let cell_bbox = [grid_xs[c], grid_ys[r], grid_xs[c + 1], grid_ys[r + 1]];
            let text = cell_text(chars, cell_bbox);
            cells.push(TableCell {
                row: r,
                col: c,
                row_span: 1,
                col_span: 1,
                text,
                bbox: cell_bbox,
                bbox_norm: None,
                style_id: None,
            });
        }
    }

    vec![Table {
        id: Uuid::new_v4().to_string(),
        page: page_number,
        rows,
        cols,
        bbox: Some(table_bbox),
        cells,
    }]
}

fn cluster(coords: &mut [f64]) -> Vec<f64> {
    coords.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut out: Vec<f64> = Vec::new();
    for &v in coords.iter() {
        match out.last() {
            Some(&last) if (v - last).abs() <= GRID_CLUSTER_TOLERANCE => {}
            _ => out.push(v),
        }
    }
    out
}

fn cell_text(chars: &[Char], cell_bbox: crate::types::Bbox) -> String {
    let mut in_cell: Vec<&Char> = chars
        .iter()
        .filter(|c| {
            let cx = (c.bbox[0] + c.bbox[2]) / 2.0;
            let cy = (c.bbox[1] + c.bbox[3]) / 2.0;
            cx >= cell_bbox[0] && cx <= cell_bbox[2] && cy >= cell_bbox[1] && cy <= cell_bbox[3]
        })
        .collect();
    in_cell.sort_by(|a, b| a.bbox[1].partial_cmp(&b.bbox[1]).unwrap().then(a.bbox[0].partial_cmp(&b.bbox[0]).unwrap()));
    in_cell.iter().map(|c| c.text.as_str()).collect::<String>().trim().to_string()
}

/// Drops text blocks that are substantially covered by a detected table, so
/// the same content isn't emitted twice (once as prose, once as table cells).
pub fn deduplicate_blocks_from_tables(blocks: Vec<Block>, tables: &[Table]) -> Vec<Block> {
    if tables.is_empty() {
        return blocks;
    }

    blocks
        .into_iter()
        .filter(|block| {
            !tables.iter().any(|table| {
                table
                    .bbox
                    .map(|tbbox| bbox::intersection_ratio(block.bbox, tbbox) > TABLE_OVERLAP_THRESHOLD)
                    .unwrap_or(false)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(text: &str, x0: f64, x1: f64, y0: f64, y1: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: [x0, y0, x1, y1],
            fontname: "Helvetica".to_string(),
            size: 10.0,
            color: "#000000".to_string(),
        }
    }

    #[test]
    fn cluster_merges_near_duplicate_coordinates() {
        let mut coords = vec![0.0, 0.3, 100.0, 100.2, 200.0];
        let clustered = cluster(&mut coords);
        assert_eq!(clustered, vec![0.0, 100.0, 200.0]);
    }

    #[test]
    fn cell_text_picks_up_chars_within_bounds() {
        let chars = vec![ch("A", 1.0, 5.0, 1.0, 5.0), ch("B", 50.0, 55.0, 50.0, 55.0)];
        let text = cell_text(&chars, [0.0, 0.0, 10.0, 10.0]);
        assert_eq!(text, "A");
    }

    #[test]
    fn dedup_drops_block_fully_inside_table() {
        let table = Table {
            id: "t1".to_string(),
            page: 1,
            rows: 2,
            cols: 2,
            bbox: Some([0.0, 0.0, 100.0, 100.0]),
            cells: vec![],
        };
        let mut block = test_block();
        block.bbox = [10.0, 10.0, 20.0, 20.0];
        let kept = deduplicate_blocks_from_tables(vec![block], &[table]);
        assert!(kept.is_empty());
    }

    #[test]
    fn dedup_keeps_block_outside_table() {
        let table = Table {
            id: "t1".to_string(),
            page: 1,
            rows: 2,
            cols: 2,
            bbox: Some([0.0, 0.0, 100.0, 100.0]),
            cells: vec![],
        };
        let mut block = test_block();
        block.bbox = [200.0, 200.0, 220.0, 220.0];
        let kept = deduplicate_blocks_from_tables(vec![block], &[table]);
        assert_eq!(kept.len(), 1);
    }

    fn test_block() -> Block {
        Block {
            id: "b1".to_string(),
            block_type: crate::types::BlockType::Paragraph,
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
            fontname: "Helvetica".to_string(),
            size: 10.0,
            color: "#000000".to_string(),
            words: vec![],
        }
    }
}
