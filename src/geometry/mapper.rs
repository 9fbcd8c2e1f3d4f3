//! Viewport to document coordinate mapping
//!
//! The preview shows the page aspect-fitted inside the viewport (letterboxed on
//! one axis) and then zoomed. Mapping undoes the zoom, works out which axis
//! constrains the fit, removes the letterbox offset and scales into document
//! units. The result is clamped to the page.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::rect::{PageSize, Rect, ViewportRect, ViewportSize};

/// Rectangle returned when the mapped selection has no usable area
pub const FALLBACK_RECT: Rect = Rect::new(10.0, 10.0, 50.0, 50.0);

/// Result of mapping a selection into document space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedRect {
    pub rect: Rect,
    /// False when `rect` is the fallback rectangle
    pub valid: bool,
}

impl MappedRect {
    fn fallback() -> Self {
        Self {
            rect: FALLBACK_RECT,
            valid: false,
        }
    }
}

/// Converts selections drawn on the preview into document rectangles
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryMapper;

impl GeometryMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(
        &self,
        selection: &ViewportRect,
        page: PageSize,
        zoom_scale: f32,
        viewport: ViewportSize,
    ) -> MappedRect {
        let inputs_usable = zoom_scale.is_finite()
            && zoom_scale > 0.0
            && viewport.width > 0.0
            && viewport.height > 0.0
            && page.width > 0.0
            && page.height > 0.0;
        if !inputs_usable {
            warn!(
                zoom_scale,
                viewport_width = viewport.width,
                viewport_height = viewport.height,
                page_width = page.width,
                page_height = page.height,
                "Cannot map selection, using fallback rectangle"
            );
            return MappedRect::fallback();
        }

        // Undo zoom
        let sel_x = selection.x / zoom_scale;
        let sel_y = selection.y / zoom_scale;
        let sel_w = selection.width / zoom_scale;
        let sel_h = selection.height / zoom_scale;
        let view_w = viewport.width / zoom_scale;
        let view_h = viewport.height / zoom_scale;

        let page_aspect = page.width / page.height;
        let view_aspect = view_w / view_h;

        let (scale, x_offset, y_offset) = if page_aspect > view_aspect {
            // Width-constrained: letterbox top and bottom
            let scale = page.width / view_w;
            let displayed_height = page.height / scale;
            (scale, 0.0, (view_h - displayed_height) / 2.0)
        } else {
            // Height-constrained: letterbox left and right
            let scale = page.height / view_h;
            let displayed_width = page.width / scale;
            (scale, (view_w - displayed_width) / 2.0, 0.0)
        };

        let raw = Rect::new(
            (sel_x - x_offset) * scale,
            (sel_y - y_offset) * scale,
            (sel_x + sel_w - x_offset) * scale,
            (sel_y + sel_h - y_offset) * scale,
        );

        let rect = if raw.within(page) {
            raw
        } else {
            warn!(
                mapped = %raw,
                page_width = page.width,
                page_height = page.height,
                "Selection exceeds page bounds, clamping"
            );
            raw.clamp_to(page)
        };

        if rect.is_degenerate() {
            warn!(mapped = %rect, "Mapped selection is empty, using fallback rectangle");
            return MappedRect::fallback();
        }

        debug!(
            zoom_scale,
            scale,
            x_offset,
            y_offset,
            mapped = %rect,
            "Mapped selection to document space"
        );

        MappedRect { rect, valid: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: PageSize = PageSize::new(595.0, 842.0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_height_constrained_letterbox() {
        // Portrait page in a landscape viewport: scale = 842/600, x offset centres the page
        let mapper = GeometryMapper::new();
        let viewport = ViewportSize::new(800.0, 600.0);
        let scale = 842.0 / 600.0;
        let displayed_width = 595.0 / scale;
        let x_offset = (800.0 - displayed_width) / 2.0;

        let sel = ViewportRect::new(x_offset + 10.0, 20.0, 100.0, 50.0);
        let mapped = mapper.map(&sel, A4, 1.0, viewport);

        assert!(mapped.valid);
        assert!(approx(mapped.rect.x0, 10.0 * scale));
        assert!(approx(mapped.rect.y0, 20.0 * scale));
        assert!(approx(mapped.rect.x1, 110.0 * scale));
        assert!(approx(mapped.rect.y1, 70.0 * scale));
    }

    #[test]
    fn test_width_constrained_letterbox() {
        // Landscape page in a tall viewport: y offset centres the page
        let mapper = GeometryMapper::new();
        let page = PageSize::new(842.0, 595.0);
        let viewport = ViewportSize::new(400.0, 800.0);
        let scale = 842.0 / 400.0;
        let y_offset = (800.0 - 595.0 / scale) / 2.0;

        let sel = ViewportRect::new(0.0, y_offset, 400.0, 595.0 / scale);
        let mapped = mapper.map(&sel, page, 1.0, viewport);

        assert!(mapped.valid);
        assert!(approx(mapped.rect.x0, 0.0));
        assert!(approx(mapped.rect.y0, 0.0));
        assert!(approx(mapped.rect.x1, 842.0));
        assert!(approx(mapped.rect.y1, 595.0));
    }

    #[test]
    fn test_zoom_is_undone() {
        let mapper = GeometryMapper::new();
        let viewport = ViewportSize::new(595.0, 842.0);
        let plain = mapper.map(&ViewportRect::new(100.0, 100.0, 50.0, 50.0), A4, 1.0, viewport);
        let zoomed = mapper.map(
            &ViewportRect::new(200.0, 200.0, 100.0, 100.0),
            A4,
            2.0,
            ViewportSize::new(1190.0, 1684.0),
        );

        assert!(plain.valid && zoomed.valid);
        assert!(approx(plain.rect.x0, zoomed.rect.x0));
        assert!(approx(plain.rect.y1, zoomed.rect.y1));
    }

    #[test]
    fn test_partially_outside_is_clamped() {
        let mapper = GeometryMapper::new();
        let viewport = ViewportSize::new(595.0, 842.0);
        let mapped = mapper.map(&ViewportRect::new(-50.0, 800.0, 200.0, 200.0), A4, 1.0, viewport);

        assert!(mapped.valid);
        assert_eq!(mapped.rect.x0, 0.0);
        assert_eq!(mapped.rect.y1, 842.0);
        assert!(mapped.rect.within(A4));
    }

    #[test]
    fn test_fully_outside_falls_back() {
        let mapper = GeometryMapper::new();
        let viewport = ViewportSize::new(595.0, 842.0);
        let mapped = mapper.map(&ViewportRect::new(2000.0, 2000.0, 50.0, 50.0), A4, 1.0, viewport);

        assert!(!mapped.valid);
        assert_eq!(mapped.rect, FALLBACK_RECT);
    }

    #[test]
    fn test_bad_inputs_fall_back() {
        let mapper = GeometryMapper::new();
        let sel = ViewportRect::new(10.0, 10.0, 10.0, 10.0);

        assert!(!mapper.map(&sel, A4, 0.0, ViewportSize::default()).valid);
        assert!(!mapper.map(&sel, A4, -1.0, ViewportSize::default()).valid);
        assert!(!mapper.map(&sel, A4, 1.0, ViewportSize::new(0.0, 600.0)).valid);
        assert!(!mapper.map(&sel, PageSize::new(0.0, 0.0), 1.0, ViewportSize::default()).valid);
        assert!(!mapper.map(&ViewportRect::new(10.0, 10.0, 0.0, 10.0), A4, 1.0, ViewportSize::default()).valid);
    }

    #[test]
    fn test_output_always_in_bounds_or_fallback() {
        let mapper = GeometryMapper::new();
        let viewports = [
            ViewportSize::new(800.0, 600.0),
            ViewportSize::new(300.0, 900.0),
            ViewportSize::new(1200.0, 1200.0),
        ];
        let zooms = [0.25, 0.5, 1.0, 1.75, 3.0];

        for viewport in viewports {
            for zoom in zooms {
                for i in -3..12 {
                    let sel = ViewportRect::new(i as f32 * 97.0, i as f32 * 61.0, 150.0, 40.0 + i as f32);
                    let mapped = mapper.map(&sel, A4, zoom, viewport);
                    if mapped.valid {
                        assert!(mapped.rect.within(A4), "{} out of page", mapped.rect);
                        assert!(!mapped.rect.is_degenerate());
                    } else {
                        assert_eq!(mapped.rect, FALLBACK_RECT);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let mapper = GeometryMapper::new();
        let sel = ViewportRect::new(123.0, 45.0, 67.0, 89.0);
        let viewport = ViewportSize::new(800.0, 600.0);
        assert_eq!(
            mapper.map(&sel, A4, 1.3, viewport),
            mapper.map(&sel, A4, 1.3, viewport)
        );
    }
}
