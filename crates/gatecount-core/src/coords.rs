//! Pointer-to-frame coordinate mapping.
//!
//! A canvas element can be displayed at any CSS size while its backing
//! store keeps the reference frame's native resolution. Pointer events
//! report positions in client (viewport) pixels, so every position has
//! to be rescaled into backing-pixel space before it is stored.

use crate::types::{Dimensions, Point};

/// On-screen bounding rectangle of the canvas element, in client pixels.
///
/// Mirrors `Element.getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    /// Distance from the viewport's left edge.
    pub left: f64,
    /// Distance from the viewport's top edge.
    pub top: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}

/// Map a pointer position in client pixels to frame (backing) pixels.
///
/// `x' = (client_x - left) * (backing_width / rect_width)` and likewise
/// for `y`. Returns `None` while the canvas has no displayed area (for
/// example when it is hidden), since no scale factor exists.
#[must_use]
pub fn map_pointer(
    client_x: f64,
    client_y: f64,
    rect: ClientRect,
    backing: Dimensions,
) -> Option<Point> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let scale_x = f64::from(backing.width) / rect.width;
    let scale_y = f64::from(backing.height) / rect.height;
    Some(Point::new(
        (client_x - rect.left) * scale_x,
        (client_y - rect.top) * scale_y,
    ))
}
