//! SVG backend: direct markup emission, no DOM.
//!
//! Geometry is written in device pixels with the physical size carried on
//! the root element, so the document opens at the intended print size. Text
//! is emitted as `<text>` elements referencing font families by name; the
//! viewer resolves the fonts. The opaque box behind the small footer runs is
//! approximated from the character count since no shaping happens here.

use std::fmt::Write as _;

use kurbo::{Affine, Point};

use crate::color::Color;
use crate::error::PeaklineResult;
use crate::fonts::FontLibrary;
use crate::render::{PixelMap, RenderBackend, marker_path, marker_radius_pt, pt_to_px};
use crate::scene::{HAlign, PaintStyle, PrimShape, Primitive, Scene, TextRun};

/// Heuristic glyph advance as a fraction of the font size, used to size the
/// text backing box without shaping.
const APPROX_ADVANCE_FRAC: f64 = 0.55;
const APPROX_LINE_FRAC: f64 = 1.3;

pub struct SvgBackend;

impl SvgBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SvgBackend {
    fn render(&mut self, scene: &Scene, dpi: u32) -> PeaklineResult<Vec<u8>> {
        let map = PixelMap::new(scene, dpi)?;
        let (w_in, h_in) = scene.size_in;
        let mut svg = String::new();

        let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w_in}in" height="{h_in}in" viewBox="0 0 {:.2} {:.2}">"#,
            map.width_px, map.height_px
        );

        if !scene.transparent_background {
            let _ = writeln!(
                svg,
                r##"  <rect width="{:.2}" height="{:.2}" fill="#ffffff"/>"##,
                map.width_px, map.height_px
            );
        }

        let data_affine = map.affine(crate::scene::Space::Data);
        if !scene.regions().is_empty() {
            let _ = writeln!(svg, "  <defs>");
            for (i, region) in scene.regions().iter().enumerate() {
                let d = (data_affine * region.path.clone()).to_svg();
                let _ = writeln!(svg, r#"    <clipPath id="region{i}"><path d="{d}"/></clipPath>"#);
            }
            let _ = writeln!(svg, "  </defs>");
        }

        for prim in scene.draw_order() {
            emit_prim(&mut svg, &map, prim, dpi);
        }

        let _ = writeln!(svg, "</svg>");
        Ok(svg.into_bytes())
    }
}

fn clip_attr(prim: &Primitive) -> String {
    match prim.clip {
        Some(id) => format!(r#" clip-path="url(#region{})""#, id.0),
        None => String::new(),
    }
}

fn fill_attrs(color: Color) -> String {
    let alpha = color.alpha();
    if (alpha - 1.0).abs() < f64::EPSILON {
        format!(r#"fill="{}""#, color.to_hex_rgb())
    } else {
        format!(r#"fill="{}" fill-opacity="{alpha:.3}""#, color.to_hex_rgb())
    }
}

fn stroke_attrs(color: Color, width_px: f64) -> String {
    let alpha = color.alpha();
    let mut s = format!(
        r#"fill="none" stroke="{}" stroke-width="{width_px:.2}""#,
        color.to_hex_rgb()
    );
    if (alpha - 1.0).abs() >= f64::EPSILON {
        let _ = write!(s, r#" stroke-opacity="{alpha:.3}""#);
    }
    s
}

fn emit_prim(svg: &mut String, map: &PixelMap, prim: &Primitive, dpi: u32) {
    let affine = map.affine(prim.space);
    let clip = clip_attr(prim);
    match &prim.shape {
        PrimShape::Path { path, style } => {
            let d = (affine * path.clone()).to_svg();
            match style {
                PaintStyle::Fill => {
                    let _ = writeln!(
                        svg,
                        r#"  <path d="{d}" {}{clip}/>"#,
                        fill_attrs(prim.color)
                    );
                }
                PaintStyle::Stroke { width_pt } => {
                    let _ = writeln!(
                        svg,
                        r#"  <path d="{d}" {}{clip}/>"#,
                        stroke_attrs(prim.color, pt_to_px(*width_pt, dpi))
                    );
                }
            }
        }
        PrimShape::Points {
            points,
            marker,
            size_pt,
        } => {
            let radius = pt_to_px(marker_radius_pt(*size_pt), dpi);
            let _ = writeln!(svg, r#"  <g {}{clip}>"#, fill_attrs(prim.color));
            for &p in points {
                let center = affine * p;
                match marker {
                    crate::config::Marker::Circle => {
                        let _ = writeln!(
                            svg,
                            r#"    <circle cx="{:.2}" cy="{:.2}" r="{radius:.2}"/>"#,
                            center.x, center.y
                        );
                    }
                    crate::config::Marker::Star => {
                        let d = marker_path(*marker, center, radius).to_svg();
                        let _ = writeln!(svg, r#"    <path d="{d}"/>"#);
                    }
                }
            }
            let _ = writeln!(svg, "  </g>");
        }
        PrimShape::Text(run) => emit_text(svg, affine, prim, run, dpi),
    }
}

fn emit_text(svg: &mut String, affine: Affine, prim: &Primitive, run: &TextRun, dpi: u32) {
    let anchor = affine * run.pos;
    let size_px = pt_to_px(run.size_pt, dpi);
    let family = FontLibrary::family_name(run.font);
    let text_anchor = match run.halign {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    };
    // Positive rotation tilts the text up; SVG rotate() is clockwise.
    let rotate = if run.rotation_deg != 0.0 {
        format!(
            r#" transform="rotate({:.2} {:.2} {:.2})""#,
            -run.rotation_deg, anchor.x, anchor.y
        )
    } else {
        String::new()
    };

    if let Some(fill) = run.bbox_fill {
        emit_bbox(svg, anchor, run, size_px, fill, &rotate);
    }

    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" font-family="{family}" font-size="{size_px:.2}" text-anchor="{text_anchor}" dominant-baseline="central" {}{rotate}>{}</text>"#,
        anchor.x,
        anchor.y,
        fill_attrs(prim.color),
        escape_xml(&run.content)
    );
}

fn emit_bbox(
    svg: &mut String,
    anchor: Point,
    run: &TextRun,
    size_px: f64,
    fill: Color,
    rotate: &str,
) {
    let w = APPROX_ADVANCE_FRAC * size_px * run.content.chars().count() as f64;
    let h = APPROX_LINE_FRAC * size_px;
    let x0 = match run.halign {
        HAlign::Left => anchor.x,
        HAlign::Center => anchor.x - w / 2.0,
        HAlign::Right => anchor.x - w,
    };
    let _ = writeln!(
        svg,
        r#"  <rect x="{:.2}" y="{:.2}" width="{w:.2}" height="{h:.2}" {}{rotate}/>"#,
        x0,
        anchor.y - h / 2.0,
        fill_attrs(fill)
    );
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
