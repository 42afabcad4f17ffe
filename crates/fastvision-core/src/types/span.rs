use serde::{Deserialize, Serialize};

use super::bbox::Bbox;

/// An inline run within a block; the assembler emits exactly one span per
/// block, covering the whole block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub id: String,
    pub block_id: String,
    pub text: String,
    pub bbox: Bbox,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox_norm: Option<Bbox>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style_id: Option<String>,
}
