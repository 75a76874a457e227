//! SVG overlay export.
//!
//! Renders a stored tripline set without interaction: each line as a
//! `<line>` element and its 1-based index as a `<text>` element placed
//! with the same perpendicular offset the interactive editor uses. The
//! reference frame can be embedded as an `<image>` underneath.
//!
//! The document is produced by painting the editor scene onto an
//! [`SvgSurface`], so the overlay and the canvas share one drawing order.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::convert::Infallible;

use svg::Document;
use svg::node::element::{Description, Group, Image, Line, Text, Title};
use svg::node::Node;

use gatecount_core::{
    ClientConfig, DEFAULT_LABEL_OFFSET, Dimensions, LineLabel, Point, Surface, Tripline,
    render_scene,
};

/// Metadata to embed in the SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Emitted as `<title>`; typically the session id or site name.
    pub title: Option<&'a str>,

    /// Emitted as `<desc>`.
    pub description: Option<&'a str>,
}

/// Stroke and label appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Colour for lines and labels.
    pub color: String,
    /// Stroke width in frame pixels.
    pub line_width: f64,
    /// Label font size in frame pixels.
    pub font_size: f64,
    /// Perpendicular label offset in frame pixels.
    pub label_offset: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "red".to_owned(),
            line_width: 2.0,
            font_size: 24.0,
            label_offset: DEFAULT_LABEL_OFFSET,
        }
    }
}

impl OverlayStyle {
    /// Style matching the interactive canvas for `config`.
    ///
    /// The font size is read from the leading `<n>px` of
    /// [`ClientConfig::label_font`]; other font forms keep the default.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let default = Self::default();
        Self {
            color: config.line_color.clone(),
            line_width: config.line_width,
            font_size: font_size_px(&config.label_font).unwrap_or(default.font_size),
            label_offset: config.label_offset,
        }
    }
}

fn font_size_px(font: &str) -> Option<f64> {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px"))
        .and_then(|n| n.parse().ok())
}

/// A [`Surface`] that collects SVG nodes.
struct SvgSurface<'a> {
    style: &'a OverlayStyle,
    frame_href: Option<&'a str>,
    dimensions: Dimensions,
    group: Group,
}

impl<'a> SvgSurface<'a> {
    fn new(style: &'a OverlayStyle, frame_href: Option<&'a str>, dimensions: Dimensions) -> Self {
        Self {
            style,
            frame_href,
            dimensions,
            group: Group::new(),
        }
    }
}

impl Surface for SvgSurface<'_> {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.group = Group::new().set("id", "triplines");
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), Self::Error> {
        if let Some(href) = self.frame_href {
            self.group.append(
                Image::new()
                    .set("href", href)
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", self.dimensions.width)
                    .set("height", self.dimensions.height),
            );
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point) -> Result<(), Self::Error> {
        self.group.append(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y)
                .set("stroke", self.style.color.as_str())
                .set("stroke-width", self.style.line_width),
        );
        Ok(())
    }

    fn fill_label(&mut self, label: &LineLabel) -> Result<(), Self::Error> {
        self.group.append(
            Text::new(label.text())
                .set("x", label.anchor.x)
                .set("y", label.anchor.y)
                .set("fill", self.style.color.as_str())
                .set("font-family", "sans-serif")
                .set("font-size", self.style.font_size),
        );
        Ok(())
    }
}

/// Serialize `triplines` as an SVG overlay sized to the reference frame.
///
/// The `viewBox` is the frame's pixel space, so the overlay can be laid
/// over the frame at any display size. When `frame_href` is given, the
/// frame itself is embedded as the bottom layer.
#[must_use]
pub fn to_overlay_svg(
    triplines: &[Tripline],
    dimensions: Dimensions,
    frame_href: Option<&str>,
    style: &OverlayStyle,
    metadata: &SvgMetadata<'_>,
) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(svg::node::Text::new(description)));
    }

    let mut surface = SvgSurface::new(style, frame_href, dimensions);
    match render_scene(&mut surface, triplines, None, style.label_offset) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    doc = doc.add(surface.group);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
