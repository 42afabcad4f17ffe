//! Assembles tagged blocks and tables into the final [`LayoutDocument`]:
//! normalized bboxes, one span per block, one token per word, synthetic
//! table blocks threaded into the reading chain, and the document-wide
//! `next` edge graph.

use std::collections::BTreeMap;

use crate::error::{FvError, Result};
use crate::types::{
    Bbox, Block, BlockType, DocumentMeta, Edge, LayoutDocument, Page, PageUnit, RelationType,
    RoleType, SourceType, Span, Style, Table, TableCell, Token,
};

/// Physical page dimensions handed in from an extractor, independent of
/// [`Page`] itself since assembly is what turns geometry into the schema type.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
}

/// Maps a `block_type` to the semantic HTML tag used for `html`/`html_template`.
fn html_tag_for_type(block_type: BlockType) -> &'static str {
    match block_type {
        BlockType::Heading => "h2",
        BlockType::Paragraph => "p",
        BlockType::ListItem => "li",
        BlockType::Table => "table",
        BlockType::Figure => "figure",
        BlockType::Caption => "figcaption",
        BlockType::Header => "header",
        BlockType::Footer => "footer",
        BlockType::PageNumber => "span",
        BlockType::CodeBlock => "pre",
    }
}

/// Builds the final [`LayoutDocument`] from already-tagged blocks, detected
/// tables, and the deduplicated style map. `blocks` and `tables` may be in
/// any order; each carries its own 1-based `page` field.
pub fn assemble_document(
    doc_id: String,
    pages: &[PageGeometry],
    blocks: Vec<Block>,
    tables: Vec<Table>,
    styles: BTreeMap<String, Style>,
    source_type: SourceType,
) -> Result<LayoutDocument> {
    let mut out_pages = Vec::with_capacity(pages.len());
    let mut all_blocks = Vec::new();
    let mut all_spans = Vec::new();
    let mut all_tokens = Vec::new();
    let mut all_tables = Vec::new();
    let mut all_edges = Vec::new();
    let mut prev_block_id: Option<String> = None;

    for page in pages {
        out_pages.push(Page {
            page_number: page.page_number,
            width: page.width,
            height: page.height,
            rotation: 0,
            unit: PageUnit::Pt,
        });

        let mut page_blocks: Vec<&Block> =
            blocks.iter().filter(|b| b.page == page.page_number).collect();
        page_blocks.sort_by_key(|b| b.reading_order);

        for block in page_blocks {
            let bbox_norm = crate::types::bbox::normalize(block.bbox, page.width, page.height);
            let text = block.text.clone().unwrap_or_default();
            let html_tag = html_tag_for_type(block.block_type);
            let html = format!("<{html_tag}>{text}</{html_tag}>");
            let html_template = format!("<{html_tag}>{{{{text}}}}</{html_tag}>");

            let out_block = Block {
                id: block.id.clone(),
                block_type: block.block_type,
                role: block.role,
                page: page.page_number,
                bbox: block.bbox,
                bbox_norm,
                reading_order: block.reading_order,
                z_index: 0,
                parent: None,
                children: None,
                text: block.text.clone(),
                style_id: block.style_id.clone(),
                html: Some(html),
                html_template: Some(html_template),
                rhetoric: block.rhetoric.clone(),
                rhetoric_features: block.rhetoric_features.clone(),
                fontname: block.fontname.clone(),
                size: block.size,
                color: block.color.clone(),
                words: block.words.clone(),
            };

            let span_id = format!("s-{}", out_block.id);
            all_spans.push(Span {
                id: span_id.clone(),
                block_id: out_block.id.clone(),
                text,
                bbox: out_block.bbox,
                bbox_norm,
                style_id: out_block.style_id.clone(),
            });

            for word in &block.words {
                let word_bbox_norm = crate::types::bbox::normalize(word.bbox, page.width, page.height);
                all_tokens.push(Token {
                    text: word.text.clone(),
                    bbox: word.bbox,
                    bbox_norm: word_bbox_norm,
                    block_id: out_block.id.clone(),
                    span_id: Some(span_id.clone()),
                });
            }

            if let Some(prev) = &prev_block_id {
                all_edges.push(Edge { from_id: prev.clone(), to: out_block.id.clone(), relation: RelationType::Next });
            }
            prev_block_id = Some(out_block.id.clone());
            all_blocks.push(out_block);
        }

        for table in tables.iter().filter(|t| t.page == page.page_number) {
            let cells = table
                .cells
                .iter()
                .map(|cell| TableCell {
                    bbox_norm: crate::types::bbox::normalize(cell.bbox, page.width, page.height),
                    ..cell.clone()
                })
                .collect();

            let table_bbox_norm = table.bbox.and_then(|b| crate::types::bbox::normalize(b, page.width, page.height));

            all_tables.push(Table { id: table.id.clone(), page: page.page_number, rows: table.rows, cols: table.cols, bbox: table.bbox, cells });

            if let Some(bbox) = table.bbox {
                let table_block = Block {
                    id: table.id.clone(),
                    block_type: BlockType::Table,
                    role: Some(RoleType::Table),
                    page: page.page_number,
                    bbox,
                    bbox_norm: table_bbox_norm,
                    reading_order: all_blocks.len(),
                    z_index: 0,
                    parent: None,
                    children: None,
                    text: Some("[TABLE]".to_string()),
                    style_id: None,
                    html: None,
                    html_template: None,
                    rhetoric: None,
                    rhetoric_features: None,
                    fontname: String::new(),
                    size: 0.0,
                    color: String::new(),
                    words: Vec::new(),
                };

                if let Some(prev) = &prev_block_id {
                    all_edges.push(Edge { from_id: prev.clone(), to: table_block.id.clone(), relation: RelationType::Next });
                }
                prev_block_id = Some(table_block.id.clone());
                all_blocks.push(table_block);
            }
        }
    }

    let document = LayoutDocument {
        document: DocumentMeta {
            document_id: doc_id,
            schema_version: crate::types::SCHEMA_VERSION.to_string(),
            source: source_type,
            page_count: Some(out_pages.len()),
        },
        pages: out_pages,
        blocks: all_blocks,
        spans: if all_spans.is_empty() { None } else { Some(all_spans) },
        tokens: if all_tokens.is_empty() { None } else { Some(all_tokens) },
        tables: if all_tables.is_empty() { None } else { Some(all_tables) },
        styles: if styles.is_empty() { None } else { Some(styles) },
        reading_graph: if all_edges.is_empty() { None } else { Some(all_edges) },
    };

    validate_document(&document)?;
    Ok(document)
}

/// Invariant checks no type construction already guarantees: every edge
/// endpoint must resolve to a real block id, and the declared page count
/// must match the page list actually assembled.
fn validate_document(doc: &LayoutDocument) -> Result<()> {
    if doc.document.page_count != Some(doc.pages.len()) {
        return Err(FvError::SchemaValidationFailure {
            field_path: "document.page_count".to_string(),
            reason: "page_count does not match assembled pages".to_string(),
        });
    }

    let known_ids: std::collections::HashSet<&str> = doc.blocks.iter().map(|b| b.id.as_str()).collect();
    if let Some(edges) = &doc.reading_graph {
        for edge in edges {
            if !known_ids.contains(edge.from_id.as_str()) || !known_ids.contains(edge.to.as_str()) {
                return Err(FvError::SchemaValidationFailure {
                    field_path: "reading_graph".to_string(),
                    reason: format!("edge {} -> {} references an unknown block", edge.from_id, edge.to),
                });
            }
        }
    }

    for block in &doc.blocks {
        let b: Bbox = block.bbox;
        if !b.iter().all(|v| v.is_finite()) {
            return Err(FvError::SchemaValidationFailure {
                field_path: format!("blocks[{}].bbox", block.id),
                reason: "bbox contains a non-finite coordinate".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockType;

    fn simple_block(id: &str, page: usize, reading_order: usize) -> Block {
        Block {
            id: id.to_string(),
            block_type: BlockType::Paragraph,
            role: Some(RoleType::Paragraph),
            page,
            bbox: [10.0, 10.0, 100.0, 30.0],
            bbox_norm: None,
            reading_order,
            z_index: 0,
            parent: None,
            children: None,
            text: Some("Hello world".to_string()),
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

    #[test]
    fn assembles_pages_blocks_and_normalized_bboxes() {
        let pages = vec![PageGeometry { page_number: 1, width: 612.0, height: 792.0 }];
        let blocks = vec![simple_block("b1", 1, 0)];
        let doc = assemble_document(
            "doc-1".to_string(),
            &pages,
            blocks,
            vec![],
            BTreeMap::new(),
            SourceType::Pdf,
        )
        .unwrap();

        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.blocks.len(), 1);
        assert!(doc.blocks[0].bbox_norm.is_some());
        assert_eq!(doc.blocks[0].html.as_deref(), Some("<p>Hello world</p>"));
    }

    #[test]
    fn reading_chain_edges_connect_blocks_in_order() {
        let pages = vec![PageGeometry { page_number: 1, width: 612.0, height: 792.0 }];
        let blocks = vec![simple_block("b1", 1, 0), simple_block("b2", 1, 1)];
        let doc = assemble_document(
            "doc-1".to_string(),
            &pages,
            blocks,
            vec![],
            BTreeMap::new(),
            SourceType::Pdf,
        )
        .unwrap();

        let edges = doc.reading_graph.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from_id, "b1");
        assert_eq!(edges[0].to, "b2");
    }

    #[test]
    fn table_gets_a_synthetic_block_in_the_reading_chain() {
        let pages = vec![PageGeometry { page_number: 1, width: 612.0, height: 792.0 }];
        let blocks = vec![simple_block("b1", 1, 0)];
        let table = Table {
            id: "t1".to_string(),
            page: 1,
            rows: 1,
            cols: 1,
            bbox: Some([10.0, 40.0, 100.0, 80.0]),
            cells: vec![TableCell {
                row: 0,
                col: 0,
                row_span: 1,
                col_span: 1,
                text: "cell".to_string(),
                bbox: [10.0, 40.0, 100.0, 80.0],
                bbox_norm: None,
                style_id: None,
            }],
        };
        let doc = assemble_document(
            "doc-1".to_string(),
            &pages,
            blocks,
            vec![table],
            BTreeMap::new(),
            SourceType::Pdf,
        )
        .unwrap();

        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].block_type, BlockType::Table);
        assert_eq!(doc.blocks[1].text.as_deref(), Some("[TABLE]"));
        let edges = doc.reading_graph.unwrap();
        assert_eq!(edges.last().unwrap().to, "t1");
    }

    #[test]
    fn empty_document_has_no_optional_collections() {
        let pages = vec![PageGeometry { page_number: 1, width: 612.0, height: 792.0 }];
        let doc = assemble_document(
            "doc-1".to_string(),
            &pages,
            vec![],
            vec![],
            BTreeMap::new(),
            SourceType::Pdf,
        )
        .unwrap();

        assert!(doc.spans.is_none());
        assert!(doc.tokens.is_none());
        assert!(doc.tables.is_none());
        assert!(doc.reading_graph.is_none());
    }
}
