//! Axis-aligned bounding boxes in typographic points, `[x0, y0, x1, y1]`,
//! y-axis top-down. Represented as a plain array so it serializes as a bare
//! JSON array of four numbers, matching the schema.

pub type Bbox = [f64; 4];

pub fn width(b: Bbox) -> f64 {
    (b[2] - b[0]).max(0.0)
}

pub fn height(b: Bbox) -> f64 {
    (b[3] - b[1]).max(0.0)
}

pub fn area(b: Bbox) -> f64 {
    width(b) * height(b)
}

/// Union of two boxes; the smallest box containing both.
pub fn union(a: Bbox, b: Bbox) -> Bbox {
    [
        a[0].min(b[0]),
        a[1].min(b[1]),
        a[2].max(b[2]),
        a[3].max(b[3]),
    ]
}

pub fn union_all<I: IntoIterator<Item = Bbox>>(boxes: I) -> Option<Bbox> {
    boxes.into_iter().reduce(union)
}

/// Intersection area over `inner`'s own area, clamped to `[0, 1]`. Used by
/// table de-duplication: a text block whose intersection ratio with a table
/// bbox exceeds a threshold is dropped.
pub fn intersection_ratio(inner: Bbox, outer: Bbox) -> f64 {
    let ix0 = inner[0].max(outer[0]);
    let iy0 = inner[1].max(outer[1]);
    let ix1 = inner[2].min(outer[2]);
    let iy1 = inner[3].min(outer[3]);
    if ix1 <= ix0 || iy1 <= iy0 {
        return 0.0;
    }
    let inter = (ix1 - ix0) * (iy1 - iy0);
    let base = area(inner).max(0.01);
    (inter / base).clamp(0.0, 1.0)
}

/// Normalize by page width/height; `None` when page dimensions are invalid
/// (`<= 0`), since a `bbox_norm` is only ever emitted when present.
pub fn normalize(b: Bbox, page_width: f64, page_height: f64) -> Option<Bbox> {
    if page_width <= 0.0 || page_height <= 0.0 {
        return None;
    }
    let round6 = |v: f64| (v * 1e6).round() / 1e6;
    Some([
        round6(b[0] / page_width),
        round6(b[1] / page_height),
        round6(b[2] / page_width),
        round6(b[3] / page_height),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both_boxes() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 20.0, 20.0];
        assert_eq!(union(a, b), [0.0, 0.0, 20.0, 20.0]);
    }

    #[test]
    fn intersection_ratio_full_containment_is_one() {
        let inner = [10.0, 10.0, 20.0, 20.0];
        let outer = [0.0, 0.0, 100.0, 100.0];
        assert_eq!(intersection_ratio(inner, outer), 1.0);
    }

    #[test]
    fn intersection_ratio_disjoint_is_zero() {
        let inner = [0.0, 0.0, 10.0, 10.0];
        let outer = [20.0, 20.0, 30.0, 30.0];
        assert_eq!(intersection_ratio(inner, outer), 0.0);
    }

    #[test]
    fn normalize_divides_by_page_dims() {
        let b = [36.0, 72.0, 576.0, 144.0];
        let norm = normalize(b, 612.0, 792.0).unwrap();
        assert!((norm[0] - 36.0 / 612.0).abs() < 1e-6);
        assert!((norm[3] - 144.0 / 792.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_is_none_for_invalid_page_dims() {
        assert!(normalize([0.0, 0.0, 1.0, 1.0], 0.0, 792.0).is_none());
    }
}
