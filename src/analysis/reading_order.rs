//! Reading-order sorting
//!
//! Elements are ordered top-to-bottom, then left-to-right. Top edges are
//! snapped to multiples of the tolerance first so that glyphs a fraction of a
//! point apart (mixed fonts on one line) share a row.

use super::types::ExtractedElement;
use crate::config::DEFAULT_Y_TOLERANCE;

#[derive(Debug, Clone, Copy)]
pub struct ReadingOrderSorter {
    tolerance: f32,
}

impl Default for ReadingOrderSorter {
    fn default() -> Self {
        Self::new(DEFAULT_Y_TOLERANCE)
    }
}

impl ReadingOrderSorter {
    /// Non-positive or non-finite tolerances fall back to the default
    pub fn new(tolerance: f32) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_Y_TOLERANCE
        };
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Row bucket of a top edge, rounding half to even
    pub fn row_key(&self, y0: f32) -> f32 {
        (y0 / self.tolerance).round_ties_even() * self.tolerance
    }

    /// Stable sort by (row, x0) and renumber `reading_order` from 0
    pub fn sort(&self, mut elements: Vec<ExtractedElement>) -> Vec<ExtractedElement> {
        elements.sort_by(|a, b| {
            self.row_key(a.bbox.y0)
                .total_cmp(&self.row_key(b.bbox.y0))
                .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        for (i, element) in elements.iter_mut().enumerate() {
            element.reading_order = i;
        }
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::ElementKind;
    use crate::geometry::Rect;

    fn element(text: &str, x0: f32, y0: f32) -> ExtractedElement {
        ExtractedElement::new(
            text,
            ElementKind::NativeText,
            1.0,
            Rect::new(x0, y0, x0 + 10.0, y0 + 12.0),
            "text_layer",
        )
    }

    fn texts(elements: &[ExtractedElement]) -> Vec<&str> {
        elements.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_japanese_date_on_one_line() {
        // Digits and kanji from different fonts sit up to 0.4pt apart
        let shuffled = vec![
            element("16", 160.0, 56.43),
            element("年", 120.0, 56.09),
            element("令和", 80.0, 56.09),
            element("日", 180.0, 56.09),
            element("9", 130.0, 56.43),
            element("月", 140.0, 56.09),
            element("7", 110.0, 56.43),
        ];

        let sorted = ReadingOrderSorter::new(2.0).sort(shuffled);
        assert_eq!(texts(&sorted), vec!["令和", "7", "年", "9", "月", "16", "日"]);
        let orders: Vec<usize> = sorted.iter().map(|e| e.reading_order).collect();
        assert_eq!(orders, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_rows_then_columns() {
        let sorted = ReadingOrderSorter::default().sort(vec![
            element("C", 10.0, 40.0),
            element("B", 50.0, 10.0),
            element("A", 10.0, 10.5),
        ]);
        assert_eq!(texts(&sorted), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_half_to_even_rounding() {
        let sorter = ReadingOrderSorter::new(2.0);
        // 5.0 / 2 = 2.5 -> 2, 7.0 / 2 = 3.5 -> 4
        assert_eq!(sorter.row_key(5.0), 4.0);
        assert_eq!(sorter.row_key(7.0), 8.0);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let sorted = ReadingOrderSorter::default().sort(vec![
            element("first", 10.0, 10.0),
            element("second", 10.0, 10.2),
        ]);
        assert_eq!(texts(&sorted), vec!["first", "second"]);
    }

    #[test]
    fn test_invalid_tolerance_uses_default() {
        assert_eq!(ReadingOrderSorter::new(0.0).tolerance(), 2.0);
        assert_eq!(ReadingOrderSorter::new(-3.0).tolerance(), 2.0);
        assert_eq!(ReadingOrderSorter::new(f32::NAN).tolerance(), 2.0);
    }

    #[test]
    fn test_nan_coordinates_keep_total_order() {
        let sorted = ReadingOrderSorter::default().sort(vec![
            element("C", 10.0, 40.0),
            element("nan-y", 10.0, f32::NAN),
            element("A", 10.0, 10.0),
            element("nan-x", f32::NAN, 10.0),
            element("B", 50.0, 10.0),
        ]);

        assert_eq!(sorted.len(), 5);
        let finite: Vec<_> = texts(&sorted)
            .into_iter()
            .filter(|t| !t.starts_with("nan"))
            .collect();
        assert_eq!(finite, vec!["A", "B", "C"]);
        let orders: Vec<usize> = sorted.iter().map(|e| e.reading_order).collect();
        assert_eq!(orders, (0..5).collect::<Vec<_>>());
    }

    #[test]
    fn test_monotonic_keys() {
        let sorter = ReadingOrderSorter::new(3.0);
        let elements: Vec<_> = (0..40)
            .map(|i| element(&i.to_string(), ((i * 37) % 200) as f32, ((i * 53) % 97) as f32 * 1.3))
            .collect();
        let sorted = sorter.sort(elements);

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (ka, kb) = (sorter.row_key(a.bbox.y0), sorter.row_key(b.bbox.y0));
            assert!(ka < kb || (ka == kb && a.bbox.x0 <= b.bbox.x0));
        }
    }
}
