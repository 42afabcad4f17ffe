use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::enums::{AlignType, WeightType};

/// Normalized font/formatting style, deduplicated by [`Style::compute_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weight: Option<WeightType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub align: Option<AlignType>,
}

impl Style {
    /// 12-hex-digit SHA-256 prefix over `"{family}|{size}|{weight}|{italic}|{color}"`.
    pub fn compute_id(&self) -> String {
        let family = self.font_family.as_deref().unwrap_or("None");
        let size = self
            .size
            .map(|v| v.to_string())
            .unwrap_or_else(|| "None".to_string());
        let weight = self
            .weight
            .map(|w| w.as_str().to_string())
            .unwrap_or_else(|| "None".to_string());
        let italic = self
            .italic
            .map(|v| if v { "True" } else { "False" }.to_string())
            .unwrap_or_else(|| "None".to_string());
        let color = self.color.as_deref().unwrap_or("None");

        let input = format!("{family}|{size}|{weight}|{italic}|{color}");
        let digest = Sha256::digest(input.as_bytes());
        hex::encode(digest)[..12].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_id_is_deterministic() {
        let style = Style {
            font_family: Some("Helvetica".into()),
            size: Some(18.0),
            weight: Some(WeightType::Bold),
            italic: Some(false),
            underline: None,
            color: Some("#000000".into()),
            align: None,
        };
        assert_eq!(style.compute_id(), style.clone().compute_id());
        assert_eq!(style.compute_id().len(), 12);
    }

    #[test]
    fn compute_id_differs_on_size_change() {
        let base = Style {
            font_family: Some("Helvetica".into()),
            size: Some(18.0),
            weight: Some(WeightType::Normal),
            italic: Some(false),
            underline: None,
            color: Some("#000000".into()),
            align: None,
        };
        let mut bigger = base.clone();
        bigger.size = Some(20.0);
        assert_ne!(base.compute_id(), bigger.compute_id());
    }
}
