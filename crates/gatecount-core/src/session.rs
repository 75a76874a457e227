//! Per-upload editing session.
//!
//! A [`SessionController`] is created when the service accepts a video
//! upload and dropped when the operator leaves or uploads again. It owns
//! the session identifier, the tripline editor and the direction form,
//! and keeps the two in step: every change of the tripline count
//! rebuilds the direction fields.

use crate::coords::{ClientRect, map_pointer};
use crate::directions::DirectionForm;
use crate::editor::{EditorUpdate, TriplineEditor};
use crate::error::{JobError, ValidationError};
use crate::render::Surface;
use crate::submit::{JobForm, PreProcess, Submission};
use crate::types::{Dimensions, Point, SessionId};
use crate::wire::JobPayload;

/// Owned state of one upload-to-download session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionController {
    session: SessionId,
    frame_url: String,
    frame: Option<Dimensions>,
    editor: TriplineEditor,
    directions: DirectionForm,
}

impl SessionController {
    /// A session with an empty editor. Pointer input is ignored until
    /// [`frame_loaded`](Self::frame_loaded) reports the frame size.
    #[must_use]
    pub fn new(session: SessionId, frame_url: impl Into<String>) -> Self {
        Self {
            session,
            frame_url: frame_url.into(),
            frame: None,
            editor: TriplineEditor::new(),
            directions: DirectionForm::default(),
        }
    }

    /// Identifier issued at upload.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Reference frame URL.
    #[must_use]
    pub fn frame_url(&self) -> &str {
        &self.frame_url
    }

    /// Natural size of the reference frame, once loaded.
    #[must_use]
    pub const fn frame(&self) -> Option<Dimensions> {
        self.frame
    }

    /// The reference frame finished loading. The canvas backing store
    /// takes the frame's natural size.
    pub fn frame_loaded(&mut self, size: Dimensions) {
        tracing::debug!(width = size.width, height = size.height, "reference frame loaded");
        self.frame = Some(size);
    }

    /// The editor.
    #[must_use]
    pub const fn editor(&self) -> &TriplineEditor {
        &self.editor
    }

    /// The direction form.
    #[must_use]
    pub const fn directions(&self) -> &DirectionForm {
        &self.directions
    }

    /// Number of committed triplines, as shown by the counter.
    #[must_use]
    pub fn tripline_count(&self) -> usize {
        self.editor.len()
    }

    /// Reset control, direction card and processing section are shown
    /// only once a tripline exists.
    #[must_use]
    pub fn has_triplines(&self) -> bool {
        !self.editor.is_empty()
    }

    /// Pointer pressed on the canvas.
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64, rect: ClientRect) -> EditorUpdate {
        match self.map(client_x, client_y, rect) {
            Some(point) => self.editor.begin(point),
            None => EditorUpdate::Unchanged,
        }
    }

    /// Pointer moved over the canvas.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, rect: ClientRect) -> EditorUpdate {
        match self.map(client_x, client_y, rect) {
            Some(point) => self.editor.extend(point),
            None => EditorUpdate::Unchanged,
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> EditorUpdate {
        let update = self.editor.finish();
        self.follow(update)
    }

    /// Clear every tripline and hide the dependent sections.
    pub fn reset(&mut self) -> EditorUpdate {
        let update = self.editor.reset();
        self.follow(update)
    }

    /// Store a typed direction label.
    pub fn set_direction(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.directions.set_value(id, value)
    }

    /// Repaint the whole scene, e.g. after a viewport resize.
    ///
    /// # Errors
    ///
    /// Propagates the first drawing error from `surface`.
    pub fn redraw<S: Surface>(&self, surface: &mut S, label_offset: f64) -> Result<(), S::Error> {
        self.editor.render(surface, label_offset)
    }

    /// Validate and build the first submission step.
    ///
    /// # Errors
    ///
    /// See [`Submission::prepare`]; an empty editor is reported before
    /// direction problems.
    pub fn prepare_submission(&self, form: JobForm) -> Result<PreProcess, JobError> {
        if self.editor.is_empty() {
            return Err(ValidationError::NoTriplines.into());
        }
        let directions = self.directions.assignment()?;
        Submission::prepare(
            self.session.clone(),
            self.editor.triplines(),
            directions,
            form,
        )
    }

    /// The current triplines and entered directions as a saved document.
    #[must_use]
    pub fn document(&self) -> JobPayload {
        JobPayload {
            triplines: self.editor.triplines().to_vec(),
            directions: self.directions.draft(),
        }
    }

    fn map(&self, client_x: f64, client_y: f64, rect: ClientRect) -> Option<Point> {
        map_pointer(client_x, client_y, rect, self.frame?)
    }

    fn follow(&mut self, update: EditorUpdate) -> EditorUpdate {
        if let EditorUpdate::CountChanged { count } = update {
            let _ = self.directions.sync(count);
        }
        update
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect() -> ClientRect {
        // Displayed at half the backing size.
        ClientRect {
            left: 10.0,
            top: 20.0,
            width: 320.0,
            height: 240.0,
        }
    }

    fn loaded() -> SessionController {
        let mut controller = SessionController::new(SessionId::new("s"), "/download/s/f.jpg");
        controller.frame_loaded(Dimensions {
            width: 640,
            height: 480,
        });
        controller
    }

    fn drag(c: &mut SessionController, from: (f64, f64), to: (f64, f64)) -> EditorUpdate {
        let _ = c.pointer_down(from.0, from.1, rect());
        let _ = c.pointer_move(to.0, to.1, rect());
        c.pointer_up()
    }

    #[test]
    fn input_ignored_before_frame_loads() {
        let mut controller = SessionController::new(SessionId::new("s"), "f.jpg");
        assert_eq!(controller.pointer_down(50.0, 50.0, rect()), EditorUpdate::Unchanged);
        assert_eq!(controller.pointer_up(), EditorUpdate::Unchanged);
        assert_eq!(controller.tripline_count(), 0);
    }

    #[test]
    fn pointer_is_mapped_to_frame_space() {
        let mut controller = loaded();
        let _ = drag(&mut controller, (10.0, 20.0), (170.0, 140.0));
        let line = controller.editor().triplines()[0];
        assert_eq!(line.start(), Point::new(0.0, 0.0));
        assert_eq!(line.end(), Point::new(320.0, 240.0));
    }

    #[test]
    fn count_change_rebuilds_directions() {
        let mut controller = loaded();
        assert!(!controller.directions().is_visible());

        let _ = drag(&mut controller, (20.0, 30.0), (100.0, 30.0));
        assert_eq!(controller.directions().fields().len(), 2);
        assert!(controller.set_direction("direction1", "east"));

        let _ = drag(&mut controller, (20.0, 60.0), (100.0, 90.0));
        assert_eq!(controller.directions().fields().len(), 2);
        assert_eq!(controller.directions().value("direction1"), Some(""));
    }

    #[test]
    fn direction_edit_leaves_drawn_state_unchanged() {
        let mut controller = loaded();
        let _ = drag(&mut controller, (20.0, 30.0), (100.0, 30.0));
        let before = (controller.frame(), controller.editor().clone());

        assert!(controller.set_direction("direction1", "north"));
        assert_eq!((controller.frame(), controller.editor().clone()), before);
        assert_eq!(controller.directions().value("direction1"), Some("north"));
    }

    #[test]
    fn reset_after_three_lines_hides_everything() {
        let mut controller = loaded();
        for y in [30.0, 60.0, 90.0] {
            let _ = drag(&mut controller, (20.0, y), (200.0, y));
        }
        assert_eq!(controller.directions().fields().len(), 3);

        assert_eq!(controller.reset(), EditorUpdate::CountChanged { count: 0 });
        assert_eq!(controller.tripline_count(), 0);
        assert!(controller.directions().fields().is_empty());
        assert!(!controller.has_triplines());
    }

    #[test]
    fn submit_without_lines_is_blocked() {
        let controller = loaded();
        let err = controller.prepare_submission(JobForm::default()).unwrap_err();
        assert_eq!(err, JobError::Validation(ValidationError::NoTriplines));
    }

    #[test]
    fn submit_with_blank_direction_is_blocked() {
        let mut controller = loaded();
        let _ = drag(&mut controller, (20.0, 30.0), (100.0, 30.0));
        controller.set_direction("direction1", "in");
        let err = controller.prepare_submission(JobForm::default()).unwrap_err();
        assert_eq!(
            err,
            JobError::Validation(ValidationError::MissingDirection { key: 2 })
        );
    }

    #[test]
    fn complete_session_prepares_submission() {
        let mut controller = loaded();
        let _ = drag(&mut controller, (20.0, 30.0), (100.0, 30.0));
        controller.set_direction("direction1", "in");
        controller.set_direction("direction2", "out");
        let pre = controller.prepare_submission(JobForm::default()).unwrap();
        assert_eq!(pre.session().as_str(), "s");

        let doc = controller.document();
        assert_eq!(doc.triplines.len(), 1);
        assert_eq!(doc.directions.get(2), Some("out"));
    }
}
