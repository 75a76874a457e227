//! Tripline editor: reference frame canvas, counter, reset and save.

use std::rc::Rc;

use dioxus::prelude::*;
use gatecount_core::{ClientConfig, DrawState, EditorUpdate, SessionController};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::canvas::{self, CANVAS_ID, CanvasSurface, FRAME_ID};
use crate::download;

/// Props for the [`TriplineCanvas`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TriplineCanvasProps {
    /// The active session. Nothing is rendered while `None`.
    controller: Signal<Option<SessionController>>,
    /// Stroke and label appearance.
    config: ClientConfig,
}

fn repaint(controller: &SessionController, config: &ClientConfig) {
    if controller.frame().is_none() {
        return;
    }
    let painted = CanvasSurface::from_document(config)
        .and_then(|mut surface| controller.redraw(&mut surface, config.label_offset));
    if let Err(e) = painted {
        tracing::warn!(error = %e, "canvas repaint failed");
    }
}

fn log_update(update: EditorUpdate) {
    if let EditorUpdate::CountChanged { count } = update {
        tracing::debug!(count, "tripline count changed");
    }
}

/// Canvas over the reference frame on which triplines are dragged out.
///
/// The frame is loaded into a hidden `<img>`; once it reports its
/// natural size the canvas backing store takes that size and pointer
/// input is accepted. The canvas is scaled by CSS, so pointer positions
/// go through [`gatecount_core::map_pointer`].
#[component]
pub fn TriplineCanvas(props: TriplineCanvasProps) -> Element {
    let mut controller = props.controller;
    let config = props.config;
    let mut save_error = use_signal(|| Option::<String>::None);

    // Only the frame and the editor are drawn. Direction edits write the
    // same signal but leave this value equal, so they skip the repaint.
    let scene = use_memo(move || {
        controller
            .read()
            .as_ref()
            .map(|ctrl| (ctrl.frame(), ctrl.editor().clone()))
    });
    let effect_config = config.clone();
    use_effect(move || {
        if scene.read().is_none() {
            return;
        }
        if let Some(ctrl) = controller.peek().as_ref() {
            repaint(ctrl, &effect_config);
        }
    });

    // Repaint on viewport resize. The stored triplines are in frame
    // pixels, so only the picture is redrawn.
    let resize_config = config.clone();
    let listener = use_hook(move || {
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Some(ctrl) = controller.peek().as_ref() {
                repaint(ctrl, &resize_config);
            }
        });
        if let Some(window) = web_sys::window() {
            let callback: &js_sys::Function = AsRef::<JsValue>::as_ref(&on_resize).unchecked_ref();
            if let Err(e) = window.add_event_listener_with_callback("resize", callback) {
                tracing::warn!(error = ?e, "failed to register resize listener");
            }
        }
        Rc::new(on_resize)
    });
    use_drop(move || {
        if let Some(window) = web_sys::window() {
            let callback: &js_sys::Function = AsRef::<JsValue>::as_ref(&*listener).unchecked_ref();
            let _ = window.remove_event_listener_with_callback("resize", callback);
        }
    });

    let on_frame_load = move |_| match canvas::frame_size() {
        Ok(size) => {
            if let Some(ctrl) = controller.write().as_mut() {
                ctrl.frame_loaded(size);
            }
        }
        Err(e) => tracing::warn!(error = %e, "reference frame size unavailable"),
    };

    let on_down = move |evt: MouseEvent| {
        let rect = match canvas::canvas_rect() {
            Ok(rect) => rect,
            Err(e) => {
                tracing::warn!(error = %e, "canvas position unavailable");
                return;
            }
        };
        let at = evt.client_coordinates();
        if let Some(ctrl) = controller.write().as_mut() {
            log_update(ctrl.pointer_down(at.x, at.y, rect));
        }
    };

    let on_move = move |evt: MouseEvent| {
        let drawing = controller
            .peek()
            .as_ref()
            .is_some_and(|c| matches!(c.editor().state(), DrawState::Drawing(_)));
        if !drawing {
            return;
        }
        let Ok(rect) = canvas::canvas_rect() else {
            return;
        };
        let at = evt.client_coordinates();
        if let Some(ctrl) = controller.write().as_mut() {
            log_update(ctrl.pointer_move(at.x, at.y, rect));
        }
    };

    let on_up = move |_| {
        if let Some(ctrl) = controller.write().as_mut() {
            log_update(ctrl.pointer_up());
        }
    };

    let on_reset = move |_| {
        if let Some(ctrl) = controller.write().as_mut() {
            log_update(ctrl.reset());
        }
    };

    let on_save = move |_| {
        let saved = controller
            .peek()
            .as_ref()
            .map(|c| download::download_document(&c.document(), c.session()));
        match saved {
            Some(Err(e)) => save_error.set(Some(format!("Download failed: {e}"))),
            _ => save_error.set(None),
        }
    };

    let (frame_url, frame, count) = match controller.read().as_ref() {
        Some(ctrl) => (
            ctrl.frame_url().to_owned(),
            ctrl.frame(),
            ctrl.tripline_count(),
        ),
        None => return rsx! {},
    };
    let (width, height) = frame.map_or((0, 0), |f| (f.width, f.height));

    rsx! {
        div { class: "gc-card gc-editor",
            img {
                id: FRAME_ID,
                class: "gc-hidden",
                src: "{frame_url}",
                alt: "Reference frame",
                onload: on_frame_load,
            }

            if frame.is_none() {
                p { class: "gc-muted", "Loading reference frame..." }
            }

            canvas {
                id: CANVAS_ID,
                class: "gc-canvas",
                width: "{width}",
                height: "{height}",
                onmousedown: on_down,
                onmousemove: on_move,
                onmouseup: on_up,
            }

            div { class: "gc-toolbar",
                span { class: "gc-counter", "Triplines: {count}" }
                if count > 0 {
                    button { class: "gc-button gc-secondary", onclick: on_reset, "Reset Triplines" }
                    button { class: "gc-button gc-secondary", onclick: on_save, "Save Triplines" }
                }
            }

            if let Some(ref err) = save_error() {
                p { class: "gc-error", "{err}" }
            }
        }
    }
}
