//! Index-label placement for triplines.
//!
//! Each committed tripline is labelled with its 1-based index, placed a
//! fixed distance away from the line's midpoint along the unit normal
//! `(dy / L, -dx / L)`. The normal is what keeps the number readable
//! instead of being struck through by the line itself.
//!
//! The same placement is used by the interactive editor, the read-only
//! overlay, and the SVG export so a stored tripline set always renders
//! identically.

use crate::types::{Point, Tripline};

/// Default perpendicular distance between a line and its label, in
/// frame pixels.
pub const DEFAULT_LABEL_OFFSET: f64 = 20.0;

/// A positioned index label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLabel {
    /// 1-based position of the tripline in the committed sequence.
    pub index: usize,
    /// Where the label text is anchored.
    pub anchor: Point,
}

impl LineLabel {
    /// Text drawn at the anchor.
    #[must_use]
    pub fn text(&self) -> String {
        self.index.to_string()
    }
}

/// Label anchor for `line`, or `None` for a zero-length line.
///
/// A degenerate line has no orthogonal direction, so no label is placed
/// rather than dividing by zero.
#[must_use]
pub fn label_anchor(line: &Tripline, offset: f64) -> Option<Point> {
    if line.is_degenerate() {
        return None;
    }
    let length = line.length();
    let (dx, dy) = line.direction();
    let normal = (dy / length, -dx / length);
    let mid = line.midpoint();
    Some(Point::new(
        normal.0.mul_add(offset, mid.x),
        normal.1.mul_add(offset, mid.y),
    ))
}

/// Labels for every non-degenerate line, indexed from 1 in sequence order.
#[must_use]
pub fn place_labels(lines: &[Tripline], offset: f64) -> Vec<LineLabel> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            label_anchor(line, offset).map(|anchor| LineLabel {
                index: i + 1,
                anchor,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn horizontal_line_label_sits_above() {
        // dx > 0, dy = 0 => normal (0, -1): screen "up".
        let line = Tripline::new(Point::new(0.0, 100.0), Point::new(200.0, 100.0));
        let anchor = label_anchor(&line, 20.0).unwrap();
        assert_close(anchor, Point::new(100.0, 80.0));
    }

    #[test]
    fn vertical_line_label_sits_to_the_side() {
        // dx = 0, dy > 0 => normal (1, 0).
        let line = Tripline::new(Point::new(50.0, 0.0), Point::new(50.0, 80.0));
        let anchor = label_anchor(&line, 20.0).unwrap();
        assert_close(anchor, Point::new(70.0, 40.0));
    }

    #[test]
    fn reversed_line_flips_side() {
        let forward = Tripline::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let backward = Tripline::new(Point::new(100.0, 0.0), Point::new(0.0, 0.0));
        let a = label_anchor(&forward, 10.0).unwrap();
        let b = label_anchor(&backward, 10.0).unwrap();
        assert_close(a, Point::new(50.0, -10.0));
        assert_close(b, Point::new(50.0, 10.0));
    }

    #[test]
    fn anchor_is_offset_distance_from_midpoint() {
        let line = Tripline::new(Point::new(13.0, 7.0), Point::new(310.0, 222.0));
        let anchor = label_anchor(&line, DEFAULT_LABEL_OFFSET).unwrap();
        let d = anchor.distance(line.midpoint());
        assert!((d - DEFAULT_LABEL_OFFSET).abs() < 1e-9, "distance was {d}");
    }

    #[test]
    fn degenerate_line_has_no_label() {
        let p = Point::new(42.0, 42.0);
        assert_eq!(label_anchor(&Tripline::new(p, p), 20.0), None);
    }

    #[test]
    fn underflowing_length_has_no_label() {
        // Distinct endpoints whose squared distance underflows to zero.
        let line = Tripline::new(Point::new(0.0, 0.0), Point::new(1e-170, 0.0));
        assert_eq!(label_anchor(&line, 20.0), None);
        assert!(place_labels(&[line], 20.0).is_empty());
    }

    #[test]
    fn place_labels_keeps_original_indices() {
        let p = Point::new(5.0, 5.0);
        let lines = [
            Tripline::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            Tripline::new(p, p),
            Tripline::new(Point::new(0.0, 20.0), Point::new(10.0, 20.0)),
        ];
        let labels = place_labels(&lines, 20.0);
        let indices: Vec<usize> = labels.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(labels[1].text(), "3");
    }
}
