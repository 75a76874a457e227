//! Shared types for gatecount.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in reference-frame pixel coordinates.
///
/// Always expressed in the unscaled backing-pixel space of the frame,
/// never in on-screen device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Whether `point` lies inside the image (edges inclusive).
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= f64::from(self.width)
            && point.y <= f64::from(self.height)
    }
}

/// A committed tripline: a virtual counting gate drawn on the frame.
///
/// Both endpoints always exist. Once pushed into an editor's committed
/// sequence a tripline is never modified; the only way to change the
/// set is a wholesale reset.
///
/// Serializes to the wire shape `{"start": {"x", "y"}, "end": {"x", "y"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tripline {
    start: Point,
    end: Point,
}

impl Tripline {
    /// Create a tripline from its two endpoints.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Where the drag began.
    #[must_use]
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Where the drag ended.
    #[must_use]
    pub const fn end(&self) -> Point {
        self.end
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Direction vector `end - start`.
    #[must_use]
    pub fn direction(&self) -> (f64, f64) {
        (self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// Segment length in frame pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// A line whose computed length is zero (or not finite) has no
    /// well-defined orthogonal. Distinct endpoints closer than the
    /// square root of the smallest `f64` count as degenerate too.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let length = self.length();
        length <= 0.0 || !length.is_finite()
    }
}

/// Opaque session identifier issued by the processing service at upload.
///
/// Threaded through every call belonging to one job and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a server-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier exactly as the server issued it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
