//! EPS backend: hand-written Level 2 PostScript.
//!
//! EPS carries no alpha channel, so fully transparent primitives are dropped
//! and partial opacity flattens to the plain color. Coordinates are document
//! points with y growing upward, which matches the scene's data space, so no
//! axis flip happens here. Quadratic segments are elevated to cubics because
//! PostScript only has `curveto`.

use std::fmt::Write as _;

use kurbo::{Affine, BezPath, PathEl, Point};

use crate::color::Color;
use crate::error::{PeaklineError, PeaklineResult};
use crate::fonts::FontLibrary;
use crate::render::{RenderBackend, marker_path, marker_radius_pt};
use crate::scene::{HAlign, PaintStyle, PrimShape, Primitive, Scene, Space, TextRun};

/// Heuristic glyph advance as a fraction of the font size, shared with the
/// SVG backend for the text backing box.
const APPROX_ADVANCE_FRAC: f64 = 0.55;
const APPROX_LINE_FRAC: f64 = 1.3;

/// Shift from the vertical center down to the baseline, as a fraction of
/// the font size.
const BASELINE_FRAC: f64 = 0.36;

pub struct EpsBackend;

impl EpsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EpsBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from the scene's authoring spaces into document points (y up).
struct PointMap {
    width_pt: f64,
    height_pt: f64,
    data: Affine,
    canvas: Affine,
}

impl PointMap {
    fn new(scene: &Scene) -> PeaklineResult<Self> {
        let (w_in, h_in) = scene.size_in;
        let width_pt = w_in * 72.0;
        let height_pt = h_in * 72.0;
        if width_pt <= 0.0 || height_pt <= 0.0 {
            return Err(PeaklineError::render(format!(
                "document size {w_in}x{h_in}in has no area"
            )));
        }
        let e = scene.extent;
        let sx = width_pt / e.width();
        let sy = height_pt / e.height();
        let data = Affine::new([sx, 0.0, 0.0, sy, -e.x0 * sx, -e.y0 * sy]);
        let canvas = Affine::new([width_pt, 0.0, 0.0, height_pt, 0.0, 0.0]);
        Ok(Self {
            width_pt,
            height_pt,
            data,
            canvas,
        })
    }

    fn affine(&self, space: Space) -> Affine {
        match space {
            Space::Data => self.data,
            Space::Canvas => self.canvas,
        }
    }
}

impl RenderBackend for EpsBackend {
    fn render(&mut self, scene: &Scene, _dpi: u32) -> PeaklineResult<Vec<u8>> {
        let map = PointMap::new(scene)?;
        let mut ps = String::new();

        let _ = writeln!(ps, "%!PS-Adobe-3.0 EPSF-3.0");
        let _ = writeln!(
            ps,
            "%%BoundingBox: 0 0 {} {}",
            map.width_pt.ceil() as i64,
            map.height_pt.ceil() as i64
        );
        let _ = writeln!(ps, "%%LanguageLevel: 2");
        let _ = writeln!(ps, "%%EndComments");

        let data_affine = map.affine(Space::Data);
        for prim in scene.draw_order() {
            if prim.color.alpha() == 0.0 && !carries_opaque_bbox(prim) {
                continue;
            }
            let clipped = prim.clip.is_some();
            if let Some(id) = prim.clip {
                let _ = writeln!(ps, "gsave");
                emit_path(&mut ps, &(data_affine * scene.region(id).path.clone()));
                let _ = writeln!(ps, "clip newpath");
            }
            emit_prim(&mut ps, &map, prim);
            if clipped {
                let _ = writeln!(ps, "grestore");
            }
        }

        let _ = writeln!(ps, "showpage");
        let _ = writeln!(ps, "%%EOF");
        Ok(ps.into_bytes())
    }
}

fn carries_opaque_bbox(prim: &Primitive) -> bool {
    match &prim.shape {
        PrimShape::Text(run) => run.bbox_fill.is_some_and(|c| c.alpha() > 0.0),
        _ => false,
    }
}

fn set_color(ps: &mut String, color: Color) {
    match color {
        Color::Rgba { r, g, b, .. } => {
            let _ = writeln!(ps, "{r:.4} {g:.4} {b:.4} setrgbcolor");
        }
        Color::Transparent => {
            let _ = writeln!(ps, "1 1 1 setrgbcolor");
        }
    }
}

fn emit_path(ps: &mut String, path: &BezPath) {
    let _ = writeln!(ps, "newpath");
    let mut last = Point::ZERO;
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => {
                let _ = writeln!(ps, "{:.2} {:.2} moveto", p.x, p.y);
                last = p;
            }
            PathEl::LineTo(p) => {
                let _ = writeln!(ps, "{:.2} {:.2} lineto", p.x, p.y);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                // Degree elevation keeps the curve exact.
                let c1 = last + (p1 - last) * (2.0 / 3.0);
                let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
                let _ = writeln!(
                    ps,
                    "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} curveto",
                    c1.x, c1.y, c2.x, c2.y, p2.x, p2.y
                );
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let _ = writeln!(
                    ps,
                    "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} curveto",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                );
                last = p3;
            }
            PathEl::ClosePath => {
                let _ = writeln!(ps, "closepath");
            }
        }
    }
}

fn emit_prim(ps: &mut String, map: &PointMap, prim: &Primitive) {
    let affine = map.affine(prim.space);
    match &prim.shape {
        PrimShape::Path { path, style } => {
            set_color(ps, prim.color);
            emit_path(ps, &(affine * path.clone()));
            match style {
                PaintStyle::Fill => {
                    let _ = writeln!(ps, "fill");
                }
                PaintStyle::Stroke { width_pt } => {
                    let _ = writeln!(ps, "{width_pt:.2} setlinewidth stroke");
                }
            }
        }
        PrimShape::Points {
            points,
            marker,
            size_pt,
        } => {
            set_color(ps, prim.color);
            let radius = marker_radius_pt(*size_pt);
            for &p in points {
                let center = affine * p;
                match marker {
                    crate::config::Marker::Circle => {
                        let _ = writeln!(
                            ps,
                            "newpath {:.2} {:.2} {radius:.2} 0 360 arc fill",
                            center.x, center.y
                        );
                    }
                    crate::config::Marker::Star => {
                        // The star path helper assumes y down.
                        let flipped = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, 2.0 * center.y])
                            * marker_path(*marker, center, radius);
                        emit_path(ps, &flipped);
                        let _ = writeln!(ps, "fill");
                    }
                }
            }
        }
        PrimShape::Text(run) => emit_text(ps, affine, prim, run),
    }
}

fn emit_text(ps: &mut String, affine: Affine, prim: &Primitive, run: &TextRun) {
    let anchor = affine * run.pos;
    let size = run.size_pt;

    let _ = writeln!(ps, "gsave");
    let _ = writeln!(ps, "{:.2} {:.2} translate", anchor.x, anchor.y);
    if run.rotation_deg != 0.0 {
        let _ = writeln!(ps, "{:.2} rotate", run.rotation_deg);
    }

    if let Some(fill) = run.bbox_fill
        && fill.alpha() > 0.0
    {
        let w = APPROX_ADVANCE_FRAC * size * run.content.chars().count() as f64;
        let h = APPROX_LINE_FRAC * size;
        let x0 = match run.halign {
            HAlign::Left => 0.0,
            HAlign::Center => -w / 2.0,
            HAlign::Right => -w,
        };
        set_color(ps, fill);
        let _ = writeln!(
            ps,
            "newpath {x0:.2} {:.2} moveto {w:.2} 0 rlineto 0 {h:.2} rlineto {:.2} 0 rlineto closepath fill",
            -h / 2.0,
            -w
        );
    }

    if prim.color.alpha() > 0.0 {
        set_color(ps, prim.color);
        let _ = writeln!(
            ps,
            "/{} findfont {size:.2} scalefont setfont",
            ps_font_name(run.font)
        );
        let text = escape_ps(&run.content);
        let _ = writeln!(ps, "0 {:.2} moveto", -BASELINE_FRAC * size);
        match run.halign {
            HAlign::Left => {}
            HAlign::Center => {
                let _ = writeln!(ps, "({text}) stringwidth pop 2 div neg 0 rmoveto");
            }
            HAlign::Right => {
                let _ = writeln!(ps, "({text}) stringwidth pop neg 0 rmoveto");
            }
        }
        let _ = writeln!(ps, "({text}) show");
    }

    let _ = writeln!(ps, "grestore");
}

/// PostScript font names have no spaces.
fn ps_font_name(role: crate::scene::FontRole) -> String {
    FontLibrary::family_name(role).replace(' ', "-")
}

fn escape_ps(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}
