//! End-to-end orchestrator: geometry extraction, optional vision tagging
//! with a heuristic fallback, style normalization, and schema assembly.
//! Dispatches on file extension; PDF and DOCX share everything downstream
//! of their respective extraction stage.

use std::collections::HashSet;
use std::path::Path;

use rayon::prelude::*;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{FvError, Result};
use crate::geometry::constants::{OFFICE_TAGGER_BATCH_SIZE, OFFICE_TAGGER_TEXT_CHARS, PDF_TAGGER_TEXT_CHARS};
use crate::geometry::{self, extract_page_chars};
use crate::merger::{assemble_document, match_blocks_to_tags, PageGeometry};
use crate::styles::normalize_styles;
use crate::types::{Block, LayoutDocument, SourceType, Table};
use crate::vision::{classify_block, summarize_blocks, VisionTagger};

/// `Fn(percent_complete, status_message)`; called from multiple rayon
/// threads during the per-page geometry and tagging stages, so it must
/// tolerate concurrent invocation.
pub type ProgressCallback<'a> = dyn Fn(f64, &str) + Sync + 'a;

fn report(cb: Option<&ProgressCallback>, pct: f64, msg: &str) {
    if let Some(cb) = cb {
        cb(pct, msg);
    }
    tracing::debug!(pct, msg, "pipeline progress");
}

/// Processes a single `.pdf` or `.docx` file into a [`LayoutDocument`].
/// `tagger` is consulted only when `config.use_vision` is set; whenever it
/// returns no tags for a scope (disabled, no credentials, or an empty
/// response) that scope's blocks fall back to the heuristic classifier.
pub fn process(
    path: &Path,
    config: &PipelineConfig,
    tagger: &dyn VisionTagger,
    progress: Option<&ProgressCallback>,
) -> Result<LayoutDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "pdf" => process_pdf(path, config, tagger, progress),
        "docx" | "doc" => process_docx(path, config, tagger, progress),
        other => Err(FvError::UnsupportedInput { path: path.to_path_buf(), extension: other.to_string() }),
    }
}

struct PageResult {
    page_number: usize,
    width: f64,
    height: f64,
    blocks: Vec<Block>,
    tables: Vec<Table>,
}

fn process_pdf(
    path: &Path,
    config: &PipelineConfig,
    tagger: &dyn VisionTagger,
    progress: Option<&ProgressCallback>,
) -> Result<LayoutDocument> {
    let doc_id = Uuid::new_v4().to_string();

    report(progress, 0.05, "Extracting characters from PDF...");
    let pdfium = pdfium_render::prelude::Pdfium::default();
    let document = pdfium.load_pdf_from_file(path, None).map_err(|e| FvError::IoFailure {
        path: path.to_path_buf(),
        source: std::io::Error::other(e.to_string()),
    })?;

    let total_in_doc = document.pages().len() as usize;
    let wanted: HashSet<usize> = match &config.page_range {
        Some(range) => parse_page_range(range, total_in_doc),
        None => (1..=total_in_doc).collect(),
    };

    let mut page_meta = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let page_number = idx + 1;
        if !wanted.contains(&page_number) {
            continue;
        }
        page_meta.push((page_number, page.width().value as f64, page.height().value as f64));
    }
    let total_pages = page_meta.len();

    report(progress, 0.08, &format!("Building geometry for {total_pages} pages in parallel..."));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_count(total_pages))
        .build()
        .map_err(|e| FvError::IoFailure { path: path.to_path_buf(), source: std::io::Error::other(e.to_string()) })?;

    let mut page_results: Vec<PageResult> = pool.install(|| {
        let done = std::sync::atomic::AtomicUsize::new(0);
        page_meta
            .par_iter()
            .map(|&(page_number, width, height)| {
                let page = document.pages().get((page_number - 1) as u16).ok();
                let (blocks, tables) = match page {
                    Some(page) => {
                        let chars = extract_page_chars(&page, height).unwrap_or_else(|reason| {
                            let err = FvError::PageExtractionFailure { page: page_number, reason };
                            tracing::warn!("{err}");
                            Vec::new()
                        });
                        let words = geometry::build_words(&chars);
                        let lines = geometry::build_lines(words);
                        let blocks = geometry::build_blocks(lines, page_number);
                        let tables = geometry::extract_tables(&page, page_number, height, &chars);
                        let blocks = geometry::deduplicate_blocks_from_tables(blocks, &tables);
                        (blocks, tables)
                    }
                    None => (Vec::new(), Vec::new()),
                };

                let finished = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                let pct = 0.08 + 0.27 * (finished as f64 / total_pages.max(1) as f64);
                report(progress, pct, &format!("Geometry built for {finished}/{total_pages} pages..."));

                PageResult { page_number, width, height, blocks, tables }
            })
            .collect()
    });
    page_results.sort_by_key(|p| p.page_number);

    if config.use_vision {
        report(progress, 0.40, "Sending pages to Vision API for classification...");
        pool.install(|| {
            let done = std::sync::atomic::AtomicUsize::new(0);
            page_results.par_iter_mut().for_each(|page| {
                let summaries = summarize_blocks(&page.blocks, PDF_TAGGER_TEXT_CHARS);
                let tags = if summaries.is_empty() {
                    Vec::new()
                } else {
                    tagger.tag_page(None, &summaries).unwrap_or_else(|e| {
                        let err = FvError::TaggerFailure { scope: format!("page {}", page.page_number), reason: e.to_string() };
                        tracing::warn!("{err}");
                        Vec::new()
                    })
                };

                if tags.is_empty() {
                    apply_heuristic(&mut page.blocks);
                } else {
                    match_blocks_to_tags(&mut page.blocks, &tags);
                }

                let finished = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                let pct = 0.40 + 0.40 * (finished as f64 / total_pages.max(1) as f64);
                report(progress, pct, "Classifying pages...");
            });
        });
        report(progress, 0.82, "Matching geometry blocks to semantic tags...");
    } else {
        report(progress, 0.50, "Classifying blocks with heuristics (no Vision API)...");
        for page in &mut page_results {
            apply_heuristic(&mut page.blocks);
        }
    }

    report(progress, 0.88, "Normalising styles...");
    let mut all_blocks: Vec<Block> = page_results.iter_mut().flat_map(|p| std::mem::take(&mut p.blocks)).collect();
    let styles = normalize_styles(&mut all_blocks);

    let pages: Vec<PageGeometry> = page_results
        .iter()
        .map(|p| PageGeometry { page_number: p.page_number, width: p.width, height: p.height })
        .collect();
    let tables: Vec<Table> = page_results.into_iter().flat_map(|p| p.tables).collect();

    report(progress, 0.93, "Assembling Schema v3.0 document...");
    let document = assemble_document(doc_id, &pages, all_blocks, tables, styles, SourceType::Pdf)?;

    report(progress, 1.0, "Done!");
    Ok(document)
}

fn process_docx(
    path: &Path,
    config: &PipelineConfig,
    tagger: &dyn VisionTagger,
    progress: Option<&ProgressCallback>,
) -> Result<LayoutDocument> {
    let doc_id = Uuid::new_v4().to_string();

    report(progress, 0.05, "Extracting paragraphs and tables from DOCX...");
    let extraction = geometry::extract_from_docx(path)?;
    let mut blocks = extraction.blocks;
    let tables = extraction.tables;

    if config.use_vision && !blocks.is_empty() {
        report(progress, 0.35, "Sending blocks to Vision API for classification...");
        let summaries = summarize_blocks(&blocks, OFFICE_TAGGER_TEXT_CHARS);
        let batches: Vec<&[_]> = summaries.chunks(OFFICE_TAGGER_BATCH_SIZE).collect();
        let n_batches = batches.len().max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count(n_batches))
            .build()
            .map_err(|e| FvError::IoFailure { path: path.to_path_buf(), source: std::io::Error::other(e.to_string()) })?;

        let done = std::sync::atomic::AtomicUsize::new(0);
        let mut batch_results: Vec<(usize, Vec<crate::vision::TagResult>)> = pool.install(|| {
            batches
                .par_iter()
                .enumerate()
                .map(|(batch_idx, chunk)| {
                    let tags = tagger.tag_batch(chunk).unwrap_or_else(|e| {
                        let err = FvError::TaggerFailure { scope: format!("batch {batch_idx}"), reason: e.to_string() };
                        tracing::warn!("{err}");
                        Vec::new()
                    });
                    let finished = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                    let pct = 0.35 + 0.45 * (finished as f64 / n_batches as f64);
                    report(progress, pct, &format!("Received batch {finished}/{n_batches}"));
                    (batch_idx, tags)
                })
                .collect()
        });
        batch_results.sort_by_key(|(idx, _)| *idx);

        let all_tags: Vec<crate::vision::TagResult> = batch_results
            .into_iter()
            .flat_map(|(batch_idx, tags)| {
                tags.into_iter().map(move |mut t| {
                    t.block_index += batch_idx * OFFICE_TAGGER_BATCH_SIZE;
                    t
                })
            })
            .collect();
        if !all_tags.is_empty() {
            match_blocks_to_tags(&mut blocks, &all_tags);
        }
    } else {
        report(progress, 0.50, "Using DOCX style-based classification (no Vision API)...");
    }

    report(progress, 0.85, "Normalising styles...");
    let styles = normalize_styles(&mut blocks);

    let pages: Vec<PageGeometry> = extraction
        .pages
        .iter()
        .map(|p| PageGeometry { page_number: p.page_number, width: p.width, height: p.height })
        .collect();

    report(progress, 0.92, "Assembling Schema v3.0 document...");
    let document = assemble_document(doc_id, &pages, blocks, tables, styles, SourceType::Docx)?;

    report(progress, 1.0, "Done!");
    Ok(document)
}

/// Applies the heuristic classifier to every block, positionally assigning
/// `reading_order` in the process (mirrors the no-tagger / tagger-failed path).
fn apply_heuristic(blocks: &mut [Block]) {
    for (i, block) in blocks.iter_mut().enumerate() {
        let text = block.text.as_deref().unwrap_or("");
        let (block_type, role) = classify_block(&block.fontname, block.size, text);
        block.block_type = block_type;
        block.role = Some(role);
        block.reading_order = i;
    }
}

/// Parses `"1,3-5,10"` (1-indexed, inclusive ranges) into a page-number set;
/// malformed parts are skipped, and an entirely-unparsable range falls back
/// to every page rather than an empty document.
fn parse_page_range(range: &str, total: usize) -> HashSet<usize> {
    let mut result = HashSet::new();
    for part in range.split(',') {
        let part = part.trim();
        if let Some((a, b)) = part.split_once('-') {
            if let (Ok(a), Ok(b)) = (a.trim().parse::<usize>(), b.trim().parse::<usize>()) {
                for p in a..=b {
                    if p >= 1 && p <= total {
                        result.insert(p);
                    }
                }
            }
        } else if let Ok(p) = part.parse::<usize>() {
            if p >= 1 && p <= total {
                result.insert(p);
            }
        }
    }
    if result.is_empty() {
        (1..=total).collect()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_page_range_expands_comma_and_dash() {
        let pages = parse_page_range("1,3-5,10", 12);
        assert_eq!(pages, HashSet::from([1, 3, 4, 5, 10]));
    }

    #[test]
    fn parse_page_range_drops_out_of_bounds_entries() {
        let pages = parse_page_range("1,99", 5);
        assert_eq!(pages, HashSet::from([1]));
    }

    #[test]
    fn parse_page_range_falls_back_to_all_pages_when_wholly_unparsable() {
        let pages = parse_page_range("abc,xyz", 3);
        assert_eq!(pages, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn parse_page_range_partial_garbage_keeps_valid_parts() {
        let pages = parse_page_range("2,notanumber", 5);
        assert_eq!(pages, HashSet::from([2]));
    }
}
