//! Read-only rendering of a submitted tripline set.

use dioxus::prelude::*;
use gatecount_core::{ClientConfig, Dimensions, JobPayload, SessionId};
use gatecount_export::{OverlayStyle, SvgMetadata, to_overlay_svg};

use crate::download;

/// Props for the [`TriplineOverlay`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TriplineOverlayProps {
    /// The submitted triplines and directions.
    document: JobPayload,
    /// Session the document was submitted under.
    session: SessionId,
    /// Reference frame size.
    frame: Dimensions,
    /// Reference frame URL, drawn underneath.
    frame_url: String,
    /// Stroke and label appearance.
    config: ClientConfig,
}

/// The submitted triplines over the reference frame, with their
/// direction labels listed below and an SVG download.
#[component]
pub fn TriplineOverlay(props: TriplineOverlayProps) -> Element {
    let mut error = use_signal(|| Option::<String>::None);
    let style = OverlayStyle::from_config(&props.config);
    let session = props.session.to_string();
    let svg = to_overlay_svg(
        &props.document.triplines,
        props.frame,
        Some(&props.frame_url),
        &style,
        &SvgMetadata {
            title: Some(&session),
            description: None,
        },
    );
    let directions: Vec<(u32, String)> = props
        .document
        .directions
        .keys()
        .filter_map(|k| Some((k, props.document.directions.get(k)?.to_owned())))
        .collect();

    let on_download = {
        let svg = svg.clone();
        let filename = format!("triplines_{session}.svg");
        move |_| match download::trigger_download(&svg, &filename, "image/svg+xml") {
            Ok(()) => error.set(None),
            Err(e) => error.set(Some(format!("Download failed: {e}"))),
        }
    };

    rsx! {
        div { class: "gc-card gc-overlay",
            h3 { class: "gc-heading", "Submitted Triplines" }
            div { class: "gc-overlay-image", dangerous_inner_html: "{svg}" }
            ul { class: "gc-direction-list",
                for (key, label) in directions {
                    li { key: "{key}", "Direction {key}: {label}" }
                }
            }
            button { class: "gc-button gc-secondary", onclick: on_download, "Download SVG" }
            if let Some(ref err) = error() {
                p { class: "gc-error", "{err}" }
            }
        }
    }
}
