//! Dioxus UI components for gatecount.
//!
//! Provides the video upload zone, the tripline editor canvas, the
//! direction inputs, the processing form, progress bars, the result
//! area and a read-only overlay of the submitted triplines.

mod directions;
mod editor;
mod form;
mod overlay;
mod progress;
mod results;
mod upload;

pub use directions::DirectionsCard;
pub use editor::TriplineCanvas;
pub use form::JobFormPanel;
pub use overlay::TriplineOverlay;
pub use progress::ProgressBars;
pub use results::ResultPanel;
pub use upload::VideoUpload;
