//! PNG backend: rasterizes the scene with `vello_cpu` and encodes with
//! `image`.
//!
//! All geometry is pre-transformed into device pixels so clip layers and
//! fills share one coordinate space. Strokes are expanded into fill outlines
//! with `kurbo::stroke`; text is shaped with `parley` and drawn as glyph
//! runs. Text runs whose font file is unavailable are skipped.

use std::collections::HashMap;
use std::io::Cursor;

use kurbo::{Affine, BezPath, Point, Rect, Shape as _};

use crate::color::Color;
use crate::error::{PeaklineError, PeaklineResult};
use crate::fonts::FontLibrary;
use crate::render::{PixelMap, RenderBackend, marker_path, marker_radius_pt, pt_to_px};
use crate::scene::{FontRole, HAlign, PaintStyle, PrimShape, Primitive, Scene, TextRun};

/// Padding of the text backing box, as a fraction of the font size.
const BBOX_PAD_FRAC: f64 = 0.3;

// Clone + PartialEq + Default + Debug is all `parley::Brush` asks for.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub(crate) struct GlyphBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper building Parley layouts from raw font bytes.
struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

impl TextShaper {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: GlyphBrush,
    ) -> PeaklineResult<parley::Layout<GlyphBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PeaklineError::render("text size must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PeaklineError::render("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PeaklineError::render("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

pub struct CpuBackend {
    fonts: FontLibrary,
    shaper: TextShaper,
    font_cache: HashMap<FontRole, vello_cpu::peniko::FontData>,
}

impl CpuBackend {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            shaper: TextShaper::new(),
            font_cache: HashMap::new(),
        }
    }

    fn vello_font(&mut self, role: FontRole) -> Option<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_cache.get(&role) {
            return Some(font.clone());
        }
        let bytes = self.fonts.load(role)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        self.font_cache.insert(role, font.clone());
        Some(font)
    }
}

impl RenderBackend for CpuBackend {
    fn render(&mut self, scene: &Scene, dpi: u32) -> PeaklineResult<Vec<u8>> {
        let map = PixelMap::new(scene, dpi)?;
        let width: u16 = (map.width_px.round() as u64)
            .try_into()
            .map_err(|_| PeaklineError::render("canvas width exceeds u16 pixels"))?;
        let height: u16 = (map.height_px.round() as u64)
            .try_into()
            .map_err(|_| PeaklineError::render("canvas height exceeds u16 pixels"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if !scene.transparent_background {
            set_paint(&mut ctx, Color::rgb(1.0, 1.0, 1.0));
            ctx.fill_path(&bezpath_to_cpu(
                &Rect::new(0.0, 0.0, map.width_px, map.height_px).to_path(1e-9),
            ));
        }

        let data_affine = map.affine(crate::scene::Space::Data);
        for prim in scene.draw_order() {
            // Regions are authored in data space.
            let clip_path = prim
                .clip
                .map(|id| bezpath_to_cpu(&(data_affine * scene.region(id).path.clone())));
            if let Some(clip) = &clip_path {
                ctx.push_clip_layer(clip);
            }
            self.draw_prim(&mut ctx, &map, prim, dpi)?;
            if clip_path.is_some() {
                ctx.pop_layer();
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply(&mut data);

        let img = image::RgbaImage::from_raw(u32::from(width), u32::from(height), data)
            .ok_or_else(|| PeaklineError::render("pixmap byte length mismatch"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| PeaklineError::render(format!("png encode failed: {e}")))?;
        Ok(out)
    }
}

impl CpuBackend {
    fn draw_prim(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        map: &PixelMap,
        prim: &Primitive,
        dpi: u32,
    ) -> PeaklineResult<()> {
        let affine = map.affine(prim.space);
        match &prim.shape {
            PrimShape::Path { path, style } => {
                set_paint(ctx, prim.color);
                let device = affine * path.clone();
                match style {
                    PaintStyle::Fill => {
                        ctx.fill_path(&bezpath_to_cpu(&device));
                    }
                    PaintStyle::Stroke { width_pt } => {
                        let width_px = pt_to_px(*width_pt, dpi);
                        let outline = kurbo::stroke(
                            device,
                            &kurbo::Stroke::new(width_px),
                            &kurbo::StrokeOpts::default(),
                            0.1,
                        );
                        ctx.fill_path(&bezpath_to_cpu(&outline));
                    }
                }
            }
            PrimShape::Points {
                points,
                marker,
                size_pt,
            } => {
                set_paint(ctx, prim.color);
                let radius = pt_to_px(marker_radius_pt(*size_pt), dpi);
                for &p in points {
                    let center = affine * p;
                    ctx.fill_path(&bezpath_to_cpu(&marker_path(*marker, center, radius)));
                }
            }
            PrimShape::Text(run) => {
                self.draw_text(ctx, map, prim, run, dpi)?;
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        map: &PixelMap,
        prim: &Primitive,
        run: &TextRun,
        dpi: u32,
    ) -> PeaklineResult<()> {
        let Some(font) = self.vello_font(run.font) else {
            return Ok(());
        };
        let Some(bytes) = self.fonts.load(run.font) else {
            return Ok(());
        };

        let size_px = pt_to_px(run.size_pt, dpi) as f32;
        let [r, g, b, a] = prim.color.to_rgba8();
        let layout = self
            .shaper
            .layout(&run.content, &bytes, size_px, GlyphBrush { r, g, b, a })?;
        let w = f64::from(layout.full_width());
        let h = f64::from(layout.height());

        let anchor = map.affine(prim.space) * run.pos;
        let x0 = match run.halign {
            HAlign::Left => anchor.x,
            HAlign::Center => anchor.x - w / 2.0,
            HAlign::Right => anchor.x - w,
        };
        let y0 = anchor.y - h / 2.0;

        // Positive rotation tilts the text up; pixel space has y down.
        let total = Affine::rotate_about(-run.rotation_deg.to_radians(), anchor)
            * Affine::translate((x0, y0));

        if let Some(fill) = run.bbox_fill {
            let pad = BBOX_PAD_FRAC * f64::from(size_px);
            let rect = Rect::new(-pad, -pad, w + pad, h + pad);
            set_paint(ctx, fill);
            ctx.fill_path(&bezpath_to_cpu(&(total * rect.to_path(1e-9))));
        }

        ctx.set_transform(affine_to_cpu(total));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let brush = glyph_run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = glyph_run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, color: Color) {
    let [r, g, b, a] = color.to_rgba8();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn unpremultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 || a == 255 {
            continue;
        }
        let af = u16::from(a);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + af / 2) / af).min(255) as u8;
        }
    }
}
