use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::edge::Edge;
use super::enums::SourceType;
use super::page::Page;
use super::span::Span;
use super::style::Style;
use super::table::Table;
use super::token::Token;

pub const SCHEMA_VERSION: &str = "3.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub document_id: String,
    #[serde(default = "schema_version")]
    pub schema_version: String,
    #[serde(default = "default_source")]
    pub source: SourceType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_count: Option<usize>,
}

fn schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_source() -> SourceType {
    SourceType::Pdf
}

/// Root container — Layout and Tone Aware Document Schema v3.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub document: DocumentMeta,
    pub pages: Vec<Page>,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spans: Option<Vec<Span>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tokens: Option<Vec<Token>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tables: Option<Vec<Table>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub styles: Option<BTreeMap<String, Style>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reading_graph: Option<Vec<Edge>>,
}
