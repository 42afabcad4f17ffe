use serde::{Deserialize, Serialize};

use super::enums::RelationType;

/// Reading-graph edge between two blocks. Serializes its origin field under
/// the JSON key `"from"`; the Rust field is named `from_id` since `from` is
/// a reserved word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "from")]
    pub from_id: String,
    pub to: String,
    pub relation: RelationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_serializes_from_field_under_from_key() {
        let edge = Edge {
            from_id: "b0".into(),
            to: "b1".into(),
            relation: RelationType::Next,
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"from\":\"b0\""));
        assert!(!json.contains("from_id"));
    }
}
