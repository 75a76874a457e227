//! gatecount-io: Browser I/O and Dioxus component library.
//!
//! Talks to the processing service over `fetch`, paints the tripline
//! editor onto a 2D canvas, handles clipboard and Blob downloads, and
//! provides the UI components for the gatecount web application.

pub mod api;
pub mod canvas;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod download;
pub mod job;

pub use api::{FetchError, ServiceClient, Upload};
pub use components::{
    DirectionsCard, JobFormPanel, ProgressBars, ResultPanel, TriplineCanvas, TriplineOverlay,
    VideoUpload,
};
pub use config::load_page_config;
pub use job::JobRun;
