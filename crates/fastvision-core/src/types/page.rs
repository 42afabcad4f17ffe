use serde::{Deserialize, Serialize};

use super::enums::PageUnit;

/// Physical page dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default = "default_unit")]
    pub unit: PageUnit,
}

fn default_unit() -> PageUnit {
    PageUnit::Pt
}
