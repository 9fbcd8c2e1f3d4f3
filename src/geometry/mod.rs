//! Coordinate spaces and selection mapping
//!
//! - `rect`: document and viewport rectangle types
//! - `mapper`: viewport selection to document rectangle conversion

mod mapper;
mod rect;

pub use mapper::{GeometryMapper, MappedRect, FALLBACK_RECT};
pub use rect::{PageSize, Rect, ViewportRect, ViewportSize};
