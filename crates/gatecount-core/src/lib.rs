//! gatecount-core: Tripline annotation and job tracking logic (sans-IO).
//!
//! An operator draws directional triplines on a reference frame taken
//! from an uploaded video, labels the directions of travel, and submits
//! the job to a processing service:
//!
//! pointer -> coordinate mapping -> tripline editor -> direction form ->
//! two-step submission -> progress polling -> result presentation.
//!
//! This crate has **no I/O dependencies** -- it works on plain values
//! and returns structured data and state transitions. All
//! browser/network interaction lives in `gatecount-io`.

pub mod config;
pub mod coords;
pub mod directions;
pub mod editor;
pub mod error;
pub mod job;
pub mod label;
pub mod progress;
pub mod render;
pub mod results;
pub mod session;
pub mod stage;
pub mod submit;
pub mod types;
pub mod wire;

pub use config::ClientConfig;
pub use coords::{ClientRect, map_pointer};
pub use directions::{DirectionAssignment, DirectionField, DirectionForm, direction_fields};
pub use editor::{DrawState, EditorUpdate, InProgressTripline, TriplineEditor};
pub use error::{JobError, ValidationError};
pub use job::JobMonitor;
pub use label::{DEFAULT_LABEL_OFFSET, LineLabel, label_anchor, place_labels};
pub use progress::{Indicator, PollEvent, PollState, PollStep, ProgressTracker, Tone};
pub use render::{Surface, render_scene};
pub use results::{CopyFeedback, DownloadLink, ResultView, download_links};
pub use session::SessionController;
pub use stage::{Stage, StageProgress};
pub use submit::{JobForm, PreProcess, StartProcessing, Started, Submission};
pub use types::{Dimensions, Point, SessionId, Tripline};
pub use wire::{
    Endpoints, InitializeResponse, JobPayload, OutputPaths, PreProcessResponse, ResultsResponse,
    StartProcessingResponse,
};
