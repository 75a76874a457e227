//! Direction label inputs, one per expected assignment key.

use dioxus::prelude::*;
use gatecount_core::SessionController;

/// Props for the [`DirectionsCard`] component.
#[derive(Props, Clone, PartialEq)]
pub struct DirectionsCardProps {
    /// The active session.
    controller: Signal<Option<SessionController>>,
}

/// Text inputs for the direction labels.
///
/// The field set follows the tripline count: two fields for a single
/// tripline, one per tripline otherwise. Hidden while no tripline exists.
#[component]
pub fn DirectionsCard(props: DirectionsCardProps) -> Element {
    let mut controller = props.controller;

    let fields: Vec<(String, String, String)> = match controller.read().as_ref() {
        Some(ctrl) if ctrl.directions().is_visible() => ctrl
            .directions()
            .fields()
            .iter()
            .map(|f| {
                let value = ctrl.directions().value(&f.id).unwrap_or_default().to_owned();
                (f.id.clone(), f.label.clone(), value)
            })
            .collect(),
        _ => return rsx! {},
    };

    rsx! {
        div { class: "gc-card",
            h3 { class: "gc-heading", "Directions" }
            for (id, label, value) in fields {
                div { key: "{id}", class: "gc-field",
                    label { r#for: "{id}", "{label}" }
                    input {
                        id: "{id}",
                        name: "{id}",
                        r#type: "text",
                        required: true,
                        value: "{value}",
                        oninput: {
                            let id = id.clone();
                            move |evt: FormEvent| {
                                if let Some(ctrl) = controller.write().as_mut() {
                                    ctrl.set_direction(&id, evt.value());
                                }
                            }
                        },
                    }
                }
            }
        }
    }
}
