use serde::{Deserialize, Serialize};

use super::bbox::Bbox;
use super::enums::{BlockType, DomainType, ModalityType, RoleType, TenseType, ToneType, VoiceType};

/// Rhetorical / tone classification per block; only ever populated by a
/// [`crate::vision::VisionTagger`] response, never by the heuristic path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rhetoric {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tone: Option<ToneType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub voice: Option<VoiceType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub modality: Option<ModalityType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tense: Option<TenseType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<DomainType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhetoricFeatures {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avg_sentence_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub modal_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub passive_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub legal_term_density: Option<f64>,
}

/// A document block — the durable unit from the geometry builders through
/// assembly, uniquely identified by a stable UUID that survives tagging and
/// matching unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<RoleType>,
    pub page: usize,
    pub bbox: Bbox,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox_norm: Option<Bbox>,
    pub reading_order: usize,
    #[serde(default)]
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub children: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub html_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rhetoric: Option<Rhetoric>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rhetoric_features: Option<RhetoricFeatures>,

    /// Dominant font name and size, carried from the geometry builders
    /// through to style normalization; not part of the serialized schema.
    #[serde(skip)]
    pub fontname: String,
    #[serde(skip)]
    pub size: f64,
    #[serde(skip)]
    pub color: String,
    #[serde(skip)]
    pub words: Vec<crate::geometry::Word>,
}
