use serde::{Deserialize, Serialize};

use super::bbox::Bbox;

fn default_span() -> usize {
    1
}

/// Single cell in a table grid; bboxes are grid-approximated by uniform
/// division of the table bbox unless the extractor supplies true positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    #[serde(default = "default_span")]
    pub row_span: usize,
    #[serde(default = "default_span")]
    pub col_span: usize,
    #[serde(default)]
    pub text: String,
    pub bbox: Bbox,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox_norm: Option<Bbox>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style_id: Option<String>,
}

/// Structured table with a row/col-positional cell grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub page: usize,
    pub rows: usize,
    pub cols: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bbox: Option<Bbox>,
    pub cells: Vec<TableCell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_cell_spans_default_to_one() {
        let json = r#"{"row":0,"col":0,"text":"A","bbox":[0.0,0.0,10.0,10.0]}"#;
        let cell: TableCell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
    }
}
