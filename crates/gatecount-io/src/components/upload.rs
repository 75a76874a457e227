//! Video upload with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use gatecount_core::ClientConfig;

use crate::api::Upload;

/// Props for the [`VideoUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct VideoUploadProps {
    /// Supplies the accepted extensions.
    config: ClientConfig,
    /// Upload in flight; input is ignored meanwhile.
    busy: bool,
    /// Failure text from the initialize call, shown under the picker.
    error: Option<String>,
    /// Called with the file after the extension check passes.
    on_upload: EventHandler<Upload>,
}

/// A drop zone with a file picker for the source video.
///
/// Files with an extension outside the configured list are rejected
/// here, before any network call.
#[component]
pub fn VideoUpload(props: VideoUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut filename = use_signal(|| Option::<String>::None);
    let mut local_error = use_signal(|| Option::<String>::None);
    let accept = props.config.video_accept_attr();
    let config = props.config.clone();
    let busy = props.busy;

    let mut process_files = move |files: Vec<FileData>| {
        if busy {
            return;
        }
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if !config.accepts_video(&name) {
            local_error.set(Some(format!("Unsupported file type: {name}")));
            return;
        }
        let Some(upload) = Upload::from_file_data(file) else {
            tracing::warn!(file = %name, "picked file has no browser File handle");
            local_error.set(Some(format!("Unsupported file source: {name}")));
            return;
        };
        filename.set(Some(name));
        local_error.set(None);
        props.on_upload.call(upload);
    };

    let mut pick = process_files.clone();
    let handle_files = move |evt: FormEvent| pick(evt.files());

    let handle_drop = move |evt: DragEvent| {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files())
    };

    let zone_class = if dragging() {
        "gc-dropzone gc-dragging"
    } else {
        "gc-dropzone"
    };
    let error = local_error().or(props.error);

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| dragging.set(false),
            ondrop: handle_drop,

            if busy {
                p { class: "gc-muted", "Uploading..." }
            } else if let Some(ref name) = filename() {
                p { class: "gc-success", "Loaded: {name}" }
            }

            if let Some(ref err) = error {
                p { class: "gc-error", "{err}" }
            }

            p { class: "gc-muted", "Drop a video here or " }

            label { class: "gc-button",
                input {
                    r#type: "file",
                    accept: "{accept}",
                    class: "gc-hidden",
                    disabled: busy,
                    onchange: handle_files,
                }
                "Choose Video"
            }
        }
    }
}
