//! Popup placement against an anchor rectangle and the viewport.
//!
//! Placement runs in two passes. [`initial_position`] only knows the anchor
//! and drops the popup below it. Once the popup is laid out and its real
//! rectangle can be measured, [`correct_position`] flips it above the anchor
//! or shifts it left when it overflows the viewport.

use serde::{Deserialize, Serialize};

/// A bounding box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visible area size plus the page scroll offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }
}

/// Page-space placement of the popup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PopupPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupMetrics {
    /// Space between the anchor's bottom edge and the popup.
    pub vertical_offset: f64,
    pub min_width: f64,
    /// Minimum distance kept from every viewport edge.
    pub margin: f64,
    /// Space between the popup and the anchor when flipped above it.
    pub gap: f64,
}

impl Default for PopupMetrics {
    fn default() -> Self {
        Self {
            vertical_offset: 4.0,
            min_width: 220.0,
            margin: 8.0,
            gap: 4.0,
        }
    }
}

/// Elements whose rectangles the positioner may ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementRef {
    Header(String),
    Popup,
}

/// Supplies measurements from whatever surface renders the table.
pub trait GeometryProvider {
    fn viewport(&self) -> Viewport;

    /// `None` while the element is not mounted.
    fn bounding_rect(&self, element: &ElementRef) -> Option<Rect>;
}

/// Measurements captured up front, for hosts that measure asynchronously.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasuredGeometry {
    pub viewport: Viewport,
    pub popup: Option<Rect>,
    pub headers: Vec<(String, Rect)>,
}

impl GeometryProvider for MeasuredGeometry {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounding_rect(&self, element: &ElementRef) -> Option<Rect> {
        match element {
            ElementRef::Popup => self.popup,
            ElementRef::Header(id) => self
                .headers
                .iter()
                .find(|(header, _)| header == id)
                .map(|(_, rect)| *rect),
        }
    }
}

pub fn initial_position(anchor: Rect, viewport: Viewport, metrics: &PopupMetrics) -> PopupPosition {
    PopupPosition {
        top: anchor.bottom() + viewport.scroll_y + metrics.vertical_offset,
        left: anchor.left + viewport.scroll_x,
        width: anchor.width.max(metrics.min_width),
    }
}

/// Returns a corrected position when the measured popup overflows the
/// viewport, or `None` when `current` should be kept. Applying the result
/// and measuring again yields `None`.
pub fn correct_position(
    current: PopupPosition,
    anchor: Rect,
    measured: Rect,
    viewport: Viewport,
    metrics: &PopupMetrics,
) -> Option<PopupPosition> {
    let mut next = current;

    if measured.bottom() > viewport.height - metrics.margin {
        let above = (anchor.top - measured.height - metrics.gap).max(metrics.margin);
        next.top = above + viewport.scroll_y;
    }

    let right_limit = viewport.width - metrics.margin;
    if measured.right() > right_limit {
        let overflow = measured.right() - right_limit;
        let shifted = (measured.left - overflow).max(metrics.margin);
        next.left = shifted + viewport.scroll_x;
    }

    (next != current).then_some(next)
}
