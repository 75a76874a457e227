//! 2D canvas drawing surface for the tripline editor.
//!
//! All functions require a browser environment
//! (`wasm32-unknown-unknown` target).

use gatecount_core::{ClientConfig, ClientRect, LineLabel, Point, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// DOM id of the editor canvas.
pub const CANVAS_ID: &str = "gatecount-canvas";

/// DOM id of the hidden reference-frame image.
pub const FRAME_ID: &str = "gatecount-frame";

/// Errors from canvas access or drawing.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// A browser API call failed or a required element was missing.
    #[error("canvas error: {0}")]
    JsError(String),
}

impl From<JsValue> for CanvasError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Paints the editor scene onto a canvas.
///
/// The canvas backing store is expected to match the frame's natural
/// size, so frame coordinates are used as canvas coordinates directly.
pub struct CanvasSurface<'a> {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    frame: HtmlImageElement,
    config: &'a ClientConfig,
}

impl<'a> CanvasSurface<'a> {
    /// Look up the editor canvas and frame image by id.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::JsError`] if either element is missing or
    /// the 2D context is unavailable.
    pub fn from_document(config: &'a ClientConfig) -> Result<Self, CanvasError> {
        let canvas: HtmlCanvasElement = element_by_id(CANVAS_ID)?;
        let frame: HtmlImageElement = element_by_id(FRAME_ID)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| CanvasError::JsError("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| CanvasError::JsError(format!("failed to cast context: {e:?}")))?;
        Ok(Self {
            canvas,
            ctx,
            frame,
            config,
        })
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = CanvasError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), Self::Error> {
        self.ctx
            .draw_image_with_html_image_element(&self.frame, 0.0, 0.0)?;
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point) -> Result<(), Self::Error> {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&self.config.line_color);
        self.ctx.set_line_width(self.config.line_width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_label(&mut self, label: &LineLabel) -> Result<(), Self::Error> {
        self.ctx.set_font(&self.config.label_font);
        self.ctx.set_fill_style_str(&self.config.line_color);
        self.ctx
            .fill_text(&label.text(), label.anchor.x, label.anchor.y)?;
        Ok(())
    }
}

/// On-screen rectangle of the editor canvas, in client pixels.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the canvas is not in the document.
pub fn canvas_rect() -> Result<ClientRect, CanvasError> {
    let canvas: HtmlCanvasElement = element_by_id(CANVAS_ID)?;
    let rect = canvas.get_bounding_client_rect();
    Ok(ClientRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    })
}

/// Natural size of the loaded frame image.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the image is not in the document.
pub fn frame_size() -> Result<gatecount_core::Dimensions, CanvasError> {
    let frame: HtmlImageElement = element_by_id(FRAME_ID)?;
    Ok(gatecount_core::Dimensions {
        width: frame.natural_width(),
        height: frame.natural_height(),
    })
}

fn element_by_id<T: JsCast>(id: &str) -> Result<T, CanvasError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| CanvasError::JsError(format!("no element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| CanvasError::JsError(format!("#{id} has the wrong element type")))
}
