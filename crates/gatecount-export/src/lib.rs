//! gatecount-export: Pure serializers (sans-IO)
//!
//! Read-only renderings of a tripline set: an SVG overlay with index
//! labels, and the JSON tripline document used for saving and
//! inspecting annotations.

pub mod document;
pub mod svg;

pub use document::{ExportError, frame_violations, parse_document, to_document_json};
pub use crate::svg::{OverlayStyle, SvgMetadata, to_overlay_svg};
