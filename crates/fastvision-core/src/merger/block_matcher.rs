//! Transfers a tagger's [`TagResult`]s onto geometry blocks. A tagger's
//! `block_index` is trusted when present; anything left over is matched by
//! approximate text similarity so a tagger that reorders or drops an entry
//! doesn't leave blocks untagged.

use crate::geometry::constants::{FUZZY_MATCH_TEXT_CHARS, FUZZY_MATCH_THRESHOLD};
use crate::types::{Block, BlockType, RoleType};
use crate::vision::{TagResult, TaggedRhetoric};

/// Applies `tags` onto `blocks` in place, two passes (exact index, then
/// fuzzy text), and fills every remaining block with the paragraph default.
/// With an empty tag list every block falls straight to the default, same
/// as a block no tag could be matched to.
pub fn match_blocks_to_tags(blocks: &mut [Block], tags: &[TagResult]) {
    let mut tag_for_index = vec![None; blocks.len()];
    let mut consumed = vec![false; tags.len()];

    for (tag_pos, tag) in tags.iter().enumerate() {
        if tag.block_index < blocks.len() && tag_for_index[tag.block_index].is_none() {
            tag_for_index[tag.block_index] = Some(tag_pos);
            consumed[tag_pos] = true;
        }
    }

    let unmatched_indices: Vec<usize> =
        (0..blocks.len()).filter(|&i| tag_for_index[i].is_none()).collect();

    if !unmatched_indices.is_empty() {
        let mut available: Vec<usize> =
            (0..tags.len()).filter(|&t| !consumed[t]).collect();

        for &i in &unmatched_indices {
            let text = blocks[i].text.clone().unwrap_or_default();
            if text.is_empty() || available.is_empty() {
                continue;
            }
            if let Some(pos) = best_match(&text, &available, tags) {
                let tag_pos = available.remove(pos);
                consumed[tag_pos] = true;
                tag_for_index[i] = Some(tag_pos);
            }
        }
    }

    for (i, block) in blocks.iter_mut().enumerate() {
        match tag_for_index[i] {
            Some(tag_pos) => apply_tag(block, &tags[tag_pos], i),
            None => {
                block.block_type = BlockType::Paragraph;
                block.role = Some(RoleType::Paragraph);
                block.reading_order = i;
            }
        }
    }
}

fn apply_tag(block: &mut Block, tag: &TagResult, fallback_order: usize) {
    block.block_type = BlockType::from_str_or_default(&tag.block_type);
    block.role = Some(RoleType::from_str_or_default(&tag.role));
    block.reading_order = tag.reading_order.unwrap_or(fallback_order);
    block.rhetoric = tag.rhetoric.as_ref().map(build_rhetoric);
    block.rhetoric_features = tag.rhetoric_features.clone();
}

fn build_rhetoric(r: &TaggedRhetoric) -> crate::types::Rhetoric {
    crate::types::Rhetoric {
        tone: r.tone,
        voice: r.voice,
        modality: r.modality,
        tense: r.tense,
        domain: r.domain,
    }
}

/// Index into `available` (itself a list of indices into `tags`) of the
/// best-scoring tag for `text`, or `None` if nothing clears the threshold.
fn best_match(text: &str, available: &[usize], tags: &[TagResult]) -> Option<usize> {
    let truncated: String = text.chars().take(FUZZY_MATCH_TEXT_CHARS).collect();
    let mut best_score = FUZZY_MATCH_THRESHOLD;
    let mut best_pos = None;

    for (pos, &tag_idx) in available.iter().enumerate() {
        let Some(tag_text) = tags[tag_idx].text.as_deref() else { continue };
        if tag_text.is_empty() {
            continue;
        }
        let tag_truncated: String = tag_text.chars().take(FUZZY_MATCH_TEXT_CHARS).collect();
        let score = lcs_ratio(&truncated, &tag_truncated);
        if score > best_score {
            best_score = score;
            best_pos = Some(pos);
        }
    }

    best_pos
}

/// `2 * lcs_len / (len_a + len_b)`, the same normalized-similarity shape as
/// `difflib.SequenceMatcher.ratio()` restricted to the longest-common-subsequence
/// term (no corpus crate implements the Ratcliff/Obershelp matcher itself).
fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut dp = vec![vec![0u32; b.len() + 1]; a.len() + 1];
    for i in 0..a.len() {
        for j in 0..b.len() {
            dp[i + 1][j + 1] = if a[i] == b[j] {
                dp[i][j] + 1
            } else {
                dp[i][j + 1].max(dp[i + 1][j])
            };
        }
    }
    let lcs_len = dp[a.len()][b.len()] as f64;
    2.0 * lcs_len / (a.len() + b.len()) as f64
}
