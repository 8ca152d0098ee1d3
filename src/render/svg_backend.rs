use std::fmt::Write as _;

use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer, TextHAlign};

/// Serializes validated frames into standalone SVG documents.
///
/// This is the whole static-export backend: no file, network, or raster I/O
/// happens here; callers persist or rasterize the markup themselves.
#[derive(Debug, Default)]
pub struct SvgBackend {
    markup: String,
}

impl SvgBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last rendered frame.
    #[must_use]
    pub fn take_markup(&mut self) -> String {
        std::mem::take(&mut self.markup)
    }
}

impl Renderer for SvgBackend {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.markup = frame_to_svg(frame)?;
        Ok(())
    }
}

/// One-shot helper: validate and serialize a frame.
pub fn frame_to_svg(frame: &RenderFrame) -> ChartResult<String> {
    frame.validate()?;

    let mut svg = String::with_capacity(1024);
    let write_err =
        |e: std::fmt::Error| ChartError::InvalidData(format!("failed to write svg markup: {e}"));

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = frame.bounds.width,
        h = frame.bounds.height
    )
    .map_err(write_err)?;

    for rect in &frame.rects {
        writeln!(
            svg,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.3}"/>"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            rect.fill.to_hex(),
            rect.fill.alpha
        )
        .map_err(write_err)?;
    }

    for polygon in &frame.polygons {
        writeln!(
            svg,
            r#"  <polygon points="{}" fill="{}" fill-opacity="{:.3}"/>"#,
            points_attr(&polygon.points),
            polygon.fill.to_hex(),
            polygon.fill.alpha
        )
        .map_err(write_err)?;
    }

    for polyline in &frame.polylines {
        writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.2}"/>"#,
            points_attr(&polyline.points),
            polyline.color.to_hex(),
            polyline.color.alpha,
            polyline.stroke_width
        )
        .map_err(write_err)?;
    }

    for text in &frame.texts {
        let anchor = match text.h_align {
            TextHAlign::Left => "start",
            TextHAlign::Center => "middle",
            TextHAlign::Right => "end",
        };
        writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" font-size="{:.1}" fill="{}" text-anchor="{anchor}">{}</text>"#,
            text.x,
            text.y,
            text.font_size_px,
            text.color.to_hex(),
            escape_xml(&text.text)
        )
        .map_err(write_err)?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn points_attr(points: &[(f64, f64)]) -> String {
    let mut attr = String::with_capacity(points.len() * 12);
    for (index, (x, y)) in points.iter().enumerate() {
        if index > 0 {
            attr.push(' ');
        }
        let _ = write!(attr, "{x:.2},{y:.2}");
    }
    attr
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
