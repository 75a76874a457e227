//! gatecount-inspect: check a saved tripline document against its frame.
//!
//! Reads a tripline document (as saved from the editor) or a processing
//! service session log, then reports for each tripline its endpoints,
//! length and label anchor, the direction fields the editor would show,
//! whether the stored directions match them, and which triplines leave
//! the reference frame. Optionally writes the same SVG overlay the web
//! app shows after submission.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin gatecount-inspect -- [OPTIONS] <DOCUMENT>
//! ```
//!
//! Exits with a failure status if the document cannot be read or any
//! check fails.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gatecount_core::{ClientConfig, Dimensions, JobPayload, Point, direction_fields, label_anchor};
use gatecount_export::{
    OverlayStyle, SvgMetadata, frame_violations, parse_document, to_overlay_svg,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "gatecount-inspect", version)]
struct Cli {
    /// Tripline document or session log (JSON).
    document: PathBuf,

    /// Session to read from a multi-session log.
    #[arg(long)]
    session: Option<String>,

    /// Reference frame image; its size bounds the triplines.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    frame: Option<PathBuf>,

    /// Frame width in pixels, when no frame image is given.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Frame height in pixels, when no frame image is given.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Perpendicular label offset in frame pixels.
    #[arg(long)]
    label_offset: Option<f64>,

    /// Client configuration as a JSON string (same shape the web app
    /// reads from its page).
    #[arg(long)]
    config_json: Option<String>,

    /// Write an SVG overlay to this file. Requires a frame size.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Embed this frame URL in the SVG overlay.
    #[arg(long, requires = "svg")]
    frame_href: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Build a [`ClientConfig`] from `--config-json`, then apply
/// `--label-offset` on top.
fn config_from_cli(cli: &Cli) -> Result<ClientConfig, String> {
    let mut config = match cli.config_json {
        Some(ref json) => ClientConfig::from_json(json)
            .map_err(|e| format!("Error parsing --config-json: {e}"))?,
        None => ClientConfig::default(),
    };
    if let Some(offset) = cli.label_offset {
        config.label_offset = offset;
    }
    Ok(config)
}

fn frame_from_cli(cli: &Cli) -> Result<Option<Dimensions>, String> {
    if let Some(ref path) = cli.frame {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| format!("Error reading frame {}: {e}", path.display()))?;
        return Ok(Some(Dimensions { width, height }));
    }
    Ok(cli
        .width
        .zip(cli.height)
        .map(|(width, height)| Dimensions { width, height }))
}

#[derive(Debug, Serialize)]
struct LineReport {
    index: usize,
    start: Point,
    end: Point,
    length: f64,
    label: Option<Point>,
    in_frame: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Report {
    triplines: Vec<LineReport>,
    direction_fields: Vec<String>,
    directions: Vec<(u32, String)>,
    direction_problem: Option<String>,
    frame: Option<Dimensions>,
    outside_frame: Vec<usize>,
}

impl Report {
    fn build(document: &JobPayload, frame: Option<Dimensions>, label_offset: f64) -> Self {
        let outside_frame = frame
            .map(|f| frame_violations(&document.triplines, f))
            .unwrap_or_default();
        let triplines = document
            .triplines
            .iter()
            .enumerate()
            .map(|(i, line)| LineReport {
                index: i + 1,
                start: line.start(),
                end: line.end(),
                length: line.length(),
                label: label_anchor(line, label_offset),
                in_frame: frame.map(|_| !outside_frame.contains(&(i + 1))),
            })
            .collect();
        let direction_problem = if document.triplines.is_empty() {
            Some("document has no triplines".to_owned())
        } else {
            document
                .directions
                .validate_for(document.triplines.len())
                .err()
                .map(|e| e.to_string())
        };
        Self {
            triplines,
            direction_fields: direction_fields(document.triplines.len())
                .into_iter()
                .map(|f| f.label)
                .collect(),
            directions: document
                .directions
                .keys()
                .filter_map(|k| Some((k, document.directions.get(k)?.to_owned())))
                .collect(),
            direction_problem,
            frame,
            outside_frame,
        }
    }

    fn is_ok(&self) -> bool {
        self.direction_problem.is_none() && self.outside_frame.is_empty()
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = match self.frame {
            Some(f) => writeln!(out, "Frame: {}x{}", f.width, f.height),
            None => writeln!(out, "Frame: unknown (bounds not checked)"),
        };
        let _ = writeln!(out, "Triplines: {}", self.triplines.len());
        for line in &self.triplines {
            let label = line.label.map_or_else(
                || "none (zero length)".to_owned(),
                |p| format!("({:.1}, {:.1})", p.x, p.y),
            );
            let bounds = if line.in_frame == Some(false) {
                "  OUTSIDE FRAME"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  {}: ({:.1}, {:.1}) -> ({:.1}, {:.1})  length {:.1}  label {label}{bounds}",
                line.index, line.start.x, line.start.y, line.end.x, line.end.y, line.length,
            );
        }
        let _ = writeln!(out, "Direction fields:");
        for field in &self.direction_fields {
            let _ = writeln!(out, "  {field}");
        }
        let _ = writeln!(out, "Directions:");
        for (key, value) in &self.directions {
            let _ = writeln!(out, "  {key}: {value}");
        }
        let _ = match self.direction_problem {
            Some(ref problem) => writeln!(out, "Problem: {problem}"),
            None => writeln!(out, "Directions match the triplines."),
        };
        out
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let frame = match frame_from_cli(&cli) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let text = match std::fs::read_to_string(&cli.document) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.document.display());
            return ExitCode::FAILURE;
        }
    };

    let document = match parse_document(&text, cli.session.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error in {}: {e}", cli.document.display());
            return ExitCode::FAILURE;
        }
    };

    let report = Report::build(&document, frame, config.label_offset);
    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report.render_text());
    }

    if let Some(ref svg_path) = cli.svg {
        let Some(frame) = frame else {
            eprintln!("--svg needs --frame or --width/--height");
            return ExitCode::FAILURE;
        };
        let svg = to_overlay_svg(
            &document.triplines,
            frame,
            cli.frame_href.as_deref(),
            &OverlayStyle::from_config(&config),
            &SvgMetadata {
                title: cli.session.as_deref(),
                description: Some("tripline overlay"),
            },
        );
        if let Err(e) = std::fs::write(svg_path, svg) {
            eprintln!("Error writing SVG to {}: {e}", svg_path.display());
            return ExitCode::FAILURE;
        }
        eprintln!("SVG written to {}", svg_path.display());
    }

    if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
