//! Interactive tripline editor.
//!
//! The editor owns the ordered sequence of committed triplines and the
//! line currently being dragged. Pointer handlers feed it frame-space
//! points (see [`crate::coords::map_pointer`]); every mutation returns an
//! [`EditorUpdate`] telling the caller whether to repaint and whether the
//! tripline count changed.
//!
//! ```text
//!            begin              extend (redraw)
//!   Idle ───────────────▶ Drawing ◀────────┐
//!    ▲                       │  └──────────┘
//!    │   finish: commit if   │
//!    └─── end is set, else ──┘
//!         discard silently
//! ```
//!
//! [`reset`](TriplineEditor::reset) returns to `Idle` with an empty
//! sequence from any state.

use crate::render::{Surface, render_scene};
use crate::types::{Point, Tripline};

/// A line being dragged. `end` is absent until the pointer first moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InProgressTripline {
    /// Fixed at drag start.
    pub start: Point,
    /// Tracks the pointer.
    pub end: Option<Point>,
}

impl InProgressTripline {
    /// The complete line, once both endpoints exist.
    #[must_use]
    pub fn to_tripline(self) -> Option<Tripline> {
        self.end.map(|end| Tripline::new(self.start, end))
    }
}

/// Drag state of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Drag in progress.
    Drawing(InProgressTripline),
}

/// What the caller has to do after an editor mutation.
#[must_use = "the caller must repaint and/or rebuild dependent UI"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorUpdate {
    /// Nothing visible changed.
    Unchanged,
    /// Repaint; the committed sequence is unchanged.
    Redraw,
    /// Repaint; the committed sequence now has `count` triplines.
    CountChanged {
        /// New number of committed triplines.
        count: usize,
    },
}

/// Owns the committed tripline sequence and the active drag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriplineEditor {
    committed: Vec<Tripline>,
    state: DrawState,
}

impl TriplineEditor {
    /// An empty editor, as created when a reference frame loads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An editor pre-populated with stored triplines.
    #[must_use]
    pub const fn with_triplines(triplines: Vec<Tripline>) -> Self {
        Self {
            committed: triplines,
            state: DrawState::Idle,
        }
    }

    /// The committed sequence, in drawing order.
    #[must_use]
    pub fn triplines(&self) -> &[Tripline] {
        &self.committed
    }

    /// Number of committed triplines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Whether no tripline has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Current drag state.
    #[must_use]
    pub const fn state(&self) -> DrawState {
        self.state
    }

    /// The segment to draw for the active drag, once it has an end.
    #[must_use]
    pub const fn preview_segment(&self) -> Option<(Point, Point)> {
        match self.state {
            DrawState::Drawing(InProgressTripline {
                start,
                end: Some(end),
            }) => Some((start, end)),
            _ => None,
        }
    }

    /// Pointer pressed: start a new drag at `start`.
    ///
    /// A press while already drawing (a release missed outside the
    /// canvas) restarts the drag. The committed sequence is untouched.
    pub fn begin(&mut self, start: Point) -> EditorUpdate {
        let had_preview = self.preview_segment().is_some();
        self.state = DrawState::Drawing(InProgressTripline { start, end: None });
        tracing::trace!(?start, "tripline drag started");
        if had_preview {
            EditorUpdate::Redraw
        } else {
            EditorUpdate::Unchanged
        }
    }

    /// Pointer moved: track the drag's end. Ignored while idle.
    pub fn extend(&mut self, end: Point) -> EditorUpdate {
        match &mut self.state {
            DrawState::Idle => EditorUpdate::Unchanged,
            DrawState::Drawing(line) => {
                line.end = Some(end);
                EditorUpdate::Redraw
            }
        }
    }

    /// Pointer released: commit the drag if both endpoints exist.
    ///
    /// A press-release without movement has no end point and is
    /// discarded without any visible change.
    pub fn finish(&mut self) -> EditorUpdate {
        let DrawState::Drawing(line) = std::mem::take(&mut self.state) else {
            return EditorUpdate::Unchanged;
        };
        match line.to_tripline() {
            Some(tripline) => {
                self.committed.push(tripline);
                let count = self.committed.len();
                tracing::debug!(count, "tripline committed");
                EditorUpdate::CountChanged { count }
            }
            None => {
                tracing::trace!("drag ended without an end point; discarded");
                EditorUpdate::Unchanged
            }
        }
    }

    /// Drop every committed tripline and any active drag.
    pub fn reset(&mut self) -> EditorUpdate {
        self.committed.clear();
        self.state = DrawState::Idle;
        tracing::debug!("triplines reset");
        EditorUpdate::CountChanged { count: 0 }
    }

    /// Paint the frame, every committed line with its label, and the
    /// active drag.
    ///
    /// Coordinates live in frame space, so the same call serves viewport
    /// resizes without touching stored state.
    ///
    /// # Errors
    ///
    /// Propagates the first drawing error from `surface`.
    pub fn render<S: Surface>(&self, surface: &mut S, label_offset: f64) -> Result<(), S::Error> {
        render_scene(
            surface,
            &self.committed,
            self.preview_segment(),
            label_offset,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::render::recording::{Op, RecordingSurface};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn drag(editor: &mut TriplineEditor, from: Point, to: Point) -> EditorUpdate {
        let _ = editor.begin(from);
        let _ = editor.extend(to);
        editor.finish()
    }

    #[test]
    fn begin_does_not_touch_committed_sequence() {
        let mut editor = TriplineEditor::new();
        assert_eq!(editor.begin(p(1.0, 1.0)), EditorUpdate::Unchanged);
        assert!(editor.is_empty());
        assert!(matches!(editor.state(), DrawState::Drawing(_)));
    }

    #[test]
    fn full_drag_commits_one_line() {
        let mut editor = TriplineEditor::new();
        let update = drag(&mut editor, p(10.0, 10.0), p(50.0, 60.0));
        assert_eq!(update, EditorUpdate::CountChanged { count: 1 });
        assert_eq!(
            editor.triplines(),
            &[Tripline::new(p(10.0, 10.0), p(50.0, 60.0))]
        );
        assert_eq!(editor.state(), DrawState::Idle);
    }

    #[test]
    fn click_without_movement_is_discarded() {
        let mut editor = TriplineEditor::new();
        let _ = editor.begin(p(10.0, 10.0));
        assert_eq!(editor.finish(), EditorUpdate::Unchanged);
        assert!(editor.is_empty());
        assert_eq!(editor.state(), DrawState::Idle);
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut editor = TriplineEditor::new();
        assert_eq!(editor.extend(p(3.0, 4.0)), EditorUpdate::Unchanged);
        assert_eq!(editor.finish(), EditorUpdate::Unchanged);
        assert!(editor.is_empty());
    }

    #[test]
    fn end_tracks_latest_pointer_position() {
        let mut editor = TriplineEditor::new();
        let _ = editor.begin(p(0.0, 0.0));
        assert_eq!(editor.extend(p(5.0, 5.0)), EditorUpdate::Redraw);
        assert_eq!(editor.extend(p(9.0, 2.0)), EditorUpdate::Redraw);
        let _ = editor.finish();
        assert_eq!(editor.triplines()[0].end(), p(9.0, 2.0));
    }

    #[test]
    fn commit_count_matches_valid_drags_only() {
        // Interleave valid drags with clicks and stray moves; the
        // sequence grows by exactly one per drag that had an end point.
        let mut editor = TriplineEditor::new();
        let mut expected = 0;
        for i in 0..12 {
            let x = f64::from(i);
            match i % 3 {
                0 => {
                    let _ = drag(&mut editor, p(x, 0.0), p(x, 10.0));
                    expected += 1;
                }
                1 => {
                    let _ = editor.begin(p(x, 0.0));
                    let _ = editor.finish();
                }
                _ => {
                    let _ = editor.extend(p(x, x));
                    let _ = editor.finish();
                }
            }
            assert_eq!(editor.len(), expected);
        }
    }

    #[test]
    fn press_while_drawing_restarts_drag() {
        let mut editor = TriplineEditor::new();
        let _ = editor.begin(p(0.0, 0.0));
        let _ = editor.extend(p(10.0, 10.0));
        assert_eq!(editor.begin(p(20.0, 20.0)), EditorUpdate::Redraw);
        let _ = editor.extend(p(30.0, 30.0));
        let _ = editor.finish();
        assert_eq!(editor.triplines()[0].start(), p(20.0, 20.0));
    }

    #[test]
    fn committed_lines_are_frozen_copies() {
        let mut editor = TriplineEditor::new();
        let _ = drag(&mut editor, p(0.0, 0.0), p(10.0, 0.0));
        // Start a new drag; the first line must not follow it.
        let _ = editor.begin(p(100.0, 100.0));
        let _ = editor.extend(p(200.0, 200.0));
        assert_eq!(editor.triplines()[0], Tripline::new(p(0.0, 0.0), p(10.0, 0.0)));
    }

    #[test]
    fn reset_clears_everything() {
        let mut editor = TriplineEditor::new();
        for i in 0..3 {
            let y = f64::from(i) * 10.0;
            let _ = drag(&mut editor, p(0.0, y), p(100.0, y));
        }
        let _ = editor.begin(p(1.0, 1.0));
        let _ = editor.extend(p(2.0, 2.0));
        assert_eq!(editor.reset(), EditorUpdate::CountChanged { count: 0 });
        assert_eq!(editor.len(), 0);
        assert_eq!(editor.state(), DrawState::Idle);

        let mut surface = RecordingSurface::default();
        editor.render(&mut surface, 20.0).unwrap();
        assert_eq!(surface.ops, vec![Op::Clear, Op::Frame]);
    }

    #[test]
    fn render_during_drag_shows_preview_without_label() {
        let mut editor = TriplineEditor::new();
        let _ = drag(&mut editor, p(0.0, 0.0), p(100.0, 0.0));
        let _ = editor.begin(p(0.0, 50.0));
        let _ = editor.extend(p(100.0, 50.0));

        let mut surface = RecordingSurface::default();
        editor.render(&mut surface, 20.0).unwrap();
        assert_eq!(surface.lines(), 2);
        assert_eq!(surface.labels(), vec!["1"]);
    }

    #[test]
    fn rerender_is_stable_across_repeated_calls() {
        // A viewport resize re-renders the same state; nothing is dropped.
        let mut editor = TriplineEditor::new();
        let _ = drag(&mut editor, p(0.0, 0.0), p(100.0, 0.0));
        let _ = drag(&mut editor, p(0.0, 40.0), p(100.0, 90.0));

        let mut first = RecordingSurface::default();
        editor.render(&mut first, 20.0).unwrap();
        let mut second = RecordingSurface::default();
        editor.render(&mut second, 20.0).unwrap();
        assert_eq!(first.ops, second.ops);
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn zero_length_drag_commits_and_renders_safely() {
        let mut editor = TriplineEditor::new();
        let update = drag(&mut editor, p(5.0, 5.0), p(5.0, 5.0));
        assert_eq!(update, EditorUpdate::CountChanged { count: 1 });

        let mut surface = RecordingSurface::default();
        editor.render(&mut surface, 20.0).unwrap();
        assert!(surface.labels().is_empty());
    }
}
