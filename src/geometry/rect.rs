//! Rectangle types for the two coordinate spaces
//!
//! Document space uses PDF points with a top-left origin (the same convention
//! MuPDF reports for page bounds and text quads). Viewport space uses the
//! pixel units of the on-screen preview.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in document space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// True when the rectangle has no positive area
    pub fn is_degenerate(&self) -> bool {
        !(self.x1 > self.x0 && self.y1 > self.y0) || !self.is_finite()
    }

    fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Overlapping region, or `None` when the rectangles only touch or are disjoint
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        if r.is_degenerate() {
            None
        } else {
            Some(r)
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Clamp every edge into `[0, page.width] x [0, page.height]`
    pub fn clamp_to(&self, page: PageSize) -> Rect {
        Rect::new(
            self.x0.clamp(0.0, page.width),
            self.y0.clamp(0.0, page.height),
            self.x1.clamp(0.0, page.width),
            self.y1.clamp(0.0, page.height),
        )
    }

    /// True when every edge already lies inside the page
    pub fn within(&self, page: PageSize) -> bool {
        self.x0 >= 0.0 && self.y0 >= 0.0 && self.x1 <= page.width && self.y1 <= page.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({:.2}, {:.2}, {:.2}, {:.2})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

impl From<mupdf::Rect> for Rect {
    fn from(r: mupdf::Rect) -> Self {
        Rect::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Rect> for mupdf::Rect {
    fn from(r: Rect) -> Self {
        mupdf::Rect {
            x0: r.x0,
            y0: r.y0,
            x1: r.x1,
            y1: r.y1,
        }
    }
}

/// Selection rectangle as drawn on the preview, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl std::str::FromStr for ViewportRect {
    type Err = String;

    /// Parse `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid rectangle '{}': {}", s, e))?;

        match parts.as_slice() {
            [x, y, w, h] => Ok(ViewportRect::new(*x, *y, *w, *h)),
            _ => Err(format!("expected x,y,width,height but got '{}'", s)),
        }
    }
}

/// Page size in document units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Size of the preview widget in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl std::str::FromStr for ViewportSize {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT but got '{}'", s))?;
        let width = w
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid width '{}': {}", w, e))?;
        let height = h
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid height '{}': {}", h, e))?;
        Ok(ViewportSize::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert!(!r.is_degenerate());
        assert!(Rect::new(5.0, 5.0, 5.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, f32::NAN, 1.0).is_degenerate());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 60.0, 200.0, 200.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 60.0, 100.0, 100.0)));

        let touching = Rect::new(100.0, 0.0, 150.0, 50.0);
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_rect_clamp() {
        let page = PageSize::new(595.0, 842.0);
        let r = Rect::new(-10.0, 800.0, 700.0, 900.0).clamp_to(page);
        assert_eq!(r, Rect::new(0.0, 800.0, 595.0, 842.0));
        assert!(r.within(page));
    }

    #[test]
    fn test_parse_viewport_rect() {
        let r: ViewportRect = "10, 20,30,40".parse().unwrap();
        assert_eq!(r, ViewportRect::new(10.0, 20.0, 30.0, 40.0));
        assert!("1,2,3".parse::<ViewportRect>().is_err());
        assert!("a,b,c,d".parse::<ViewportRect>().is_err());
    }

    #[test]
    fn test_parse_viewport_size() {
        let s: ViewportSize = "800x600".parse().unwrap();
        assert_eq!(s, ViewportSize::new(800.0, 600.0));
        assert!("800".parse::<ViewportSize>().is_err());
    }
}
