use serde::{Deserialize, Serialize};

use super::bbox::Bbox;

/// Individual word-level token with bbox, tagged with its owning block and span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub bbox: Bbox,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox_norm: Option<Bbox>,
    pub block_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub span_id: Option<String>,
}
