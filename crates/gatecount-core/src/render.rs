//! Drawing-surface abstraction for the tripline editor.
//!
//! The editor decides *what* to draw; a [`Surface`] decides *how*. The
//! browser implementation wraps a 2D canvas context, tests use a
//! recording surface, and the SVG export builds document nodes.

use crate::label::{LineLabel, label_anchor};
use crate::types::{Point, Tripline};

/// Something the editor scene can be painted onto.
///
/// Every scene is painted from scratch: [`clear`](Self::clear), then
/// [`draw_frame`](Self::draw_frame), then lines and labels in sequence
/// order.
pub trait Surface {
    /// Error raised by the backing drawing API.
    type Error;

    /// Erase everything.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Paint the reference frame at the origin.
    fn draw_frame(&mut self) -> Result<(), Self::Error>;

    /// Stroke one segment.
    fn stroke_line(&mut self, from: Point, to: Point) -> Result<(), Self::Error>;

    /// Draw a line's index label.
    fn fill_label(&mut self, label: &LineLabel) -> Result<(), Self::Error>;
}

/// Paint a full scene: frame, committed lines with labels, then the
/// in-progress segment (if any) without a label.
///
/// # Errors
///
/// Propagates the first error returned by `surface`.
pub fn render_scene<S: Surface>(
    surface: &mut S,
    committed: &[Tripline],
    in_progress: Option<(Point, Point)>,
    label_offset: f64,
) -> Result<(), S::Error> {
    surface.clear()?;
    surface.draw_frame()?;
    for (i, line) in committed.iter().enumerate() {
        surface.stroke_line(line.start(), line.end())?;
        if let Some(anchor) = label_anchor(line, label_offset) {
            surface.fill_label(&LineLabel {
                index: i + 1,
                anchor,
            })?;
        }
    }
    if let Some((start, end)) = in_progress {
        surface.stroke_line(start, end)?;
    }
    Ok(())
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::recording::{Op, RecordingSurface};
    use super::*;

    #[test]
    fn scene_starts_with_clear_and_frame() {
        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, &[], None, 20.0).unwrap();
        assert_eq!(surface.ops, vec![Op::Clear, Op::Frame]);
    }

    #[test]
    fn committed_lines_are_labelled_in_order() {
        let lines = [
            Tripline::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
            Tripline::new(Point::new(0.0, 50.0), Point::new(100.0, 50.0)),
        ];
        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, &lines, None, 20.0).unwrap();
        assert_eq!(surface.lines(), 2);
        assert_eq!(surface.labels(), vec!["1", "2"]);
    }

    #[test]
    fn in_progress_line_is_drawn_last_without_label() {
        let lines = [Tripline::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))];
        let drag = (Point::new(5.0, 5.0), Point::new(60.0, 70.0));
        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, &lines, Some(drag), 20.0).unwrap();
        assert_eq!(surface.ops.last(), Some(&Op::Line(drag.0, drag.1)));
        assert_eq!(surface.labels(), vec!["1"]);
    }

    #[test]
    fn degenerate_committed_line_renders_without_label() {
        let p = Point::new(3.0, 3.0);
        let lines = [Tripline::new(p, p)];
        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, &lines, None, 20.0).unwrap();
        assert_eq!(surface.lines(), 1);
        assert!(surface.labels().is_empty());
    }
}
