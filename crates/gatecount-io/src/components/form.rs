//! Processing form: site details, tracker, model upload and submit.

use dioxus::prelude::*;
use gatecount_core::JobForm;

use crate::api::Upload;

/// Tracker configurations offered by the service.
const TRACKERS: &[&str] = &["bytetrack.yaml", "botsort.yaml"];

/// Props for the [`JobFormPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct JobFormPanelProps {
    /// Disables the submit button while a submission is in flight.
    busy: bool,
    /// Called with the form values and the chosen model file.
    on_submit: EventHandler<(JobForm, Option<Upload>)>,
}

/// The processing section shown once at least one tripline exists.
#[component]
pub fn JobFormPanel(props: JobFormPanelProps) -> Element {
    let mut form = use_signal(|| JobForm {
        inference_tracker: TRACKERS[0].to_owned(),
        ..JobForm::default()
    });
    let mut model = use_signal(|| Option::<Upload>::None);
    let mut model_error = use_signal(|| Option::<String>::None);

    let on_model = move |evt: FormEvent| {
        let Some(file) = evt.files().into_iter().next() else {
            model.set(None);
            return;
        };
        match Upload::from_file_data(&file) {
            Some(upload) => {
                model_error.set(None);
                model.set(Some(upload));
            }
            None => {
                tracing::warn!(file = %file.name(), "picked model has no browser File handle");
                model.set(None);
                model_error.set(Some(format!("Unsupported file source: {}", file.name())));
            }
        }
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        props.on_submit.call((form(), model()));
    };

    let current = form();

    rsx! {
        form { class: "gc-card gc-form", onsubmit: on_submit,
            h3 { class: "gc-heading", "Processing" }

            div { class: "gc-field",
                label { r#for: "siteLocation", "Site location" }
                input {
                    id: "siteLocation",
                    r#type: "text",
                    value: "{current.site_location}",
                    oninput: move |evt: FormEvent| form.write().site_location = evt.value(),
                }
            }

            div { class: "gc-field",
                label { r#for: "inferenceTracker", "Tracker" }
                select {
                    id: "inferenceTracker",
                    value: "{current.inference_tracker}",
                    onchange: move |evt: FormEvent| form.write().inference_tracker = evt.value(),
                    for tracker in TRACKERS {
                        option { key: "{tracker}", value: "{tracker}", "{tracker}" }
                    }
                }
            }

            div { class: "gc-field",
                label { r#for: "startDate", "Start date" }
                input {
                    id: "startDate",
                    r#type: "date",
                    value: "{current.start_date}",
                    oninput: move |evt: FormEvent| form.write().start_date = evt.value(),
                }
            }

            div { class: "gc-field",
                label { r#for: "startTime", "Start time" }
                input {
                    id: "startTime",
                    r#type: "time",
                    value: "{current.start_time}",
                    oninput: move |evt: FormEvent| form.write().start_time = evt.value(),
                }
            }

            div { class: "gc-field",
                label { r#for: "modelFile", "Detection model" }
                input {
                    id: "modelFile",
                    r#type: "file",
                    accept: ".pt",
                    onchange: on_model,
                }
                if let Some(ref err) = model_error() {
                    p { class: "gc-error", "{err}" }
                }
            }

            div { class: "gc-field gc-inline",
                input {
                    id: "exportVideo",
                    r#type: "checkbox",
                    checked: current.export_video,
                    onchange: move |evt: FormEvent| form.write().export_video = evt.checked(),
                }
                label { r#for: "exportVideo", "Export annotated video" }
            }

            button {
                class: "gc-button",
                r#type: "submit",
                disabled: props.busy,
                "Start Processing"
            }
        }
    }
}
