//! Rendering backends behind one narrow trait.
//!
//! A backend receives the fully resolved scene and produces the complete
//! output file as bytes; callers decide where those bytes go. Backends are
//! selected by output format.

use kurbo::{Affine, BezPath, Circle, Point, Shape as _};

use crate::config::{Marker, OutputFormat};
use crate::error::{PeaklineError, PeaklineResult};
use crate::fonts::FontLibrary;
use crate::scene::{Scene, Space};

pub trait RenderBackend {
    /// Render the scene at the given resolution into a complete file image.
    fn render(&mut self, scene: &Scene, dpi: u32) -> PeaklineResult<Vec<u8>>;
}

pub fn create_backend(format: OutputFormat, fonts: FontLibrary) -> Box<dyn RenderBackend> {
    match format {
        OutputFormat::Png => Box::new(crate::render_cpu::CpuBackend::new(fonts)),
        OutputFormat::Svg => Box::new(crate::render_svg::SvgBackend::new()),
        OutputFormat::Eps => Box::new(crate::render_eps::EpsBackend::new()),
    }
}

/// Mapping from the scene's two authoring spaces into device pixels
/// (y down, origin top-left).
pub(crate) struct PixelMap {
    pub width_px: f64,
    pub height_px: f64,
    data: Affine,
    canvas: Affine,
}

impl PixelMap {
    pub(crate) fn new(scene: &Scene, dpi: u32) -> PeaklineResult<Self> {
        let (w_in, h_in) = scene.size_in;
        let width_px = w_in * f64::from(dpi);
        let height_px = h_in * f64::from(dpi);
        if width_px < 1.0 || height_px < 1.0 {
            return Err(PeaklineError::render(format!(
                "output raster {w_in}x{h_in}in at {dpi} dpi collapses to zero pixels"
            )));
        }

        let e = scene.extent;
        let sx = width_px / e.width();
        let sy = height_px / e.height();
        // Data y grows upward; pixels grow downward.
        let data = Affine::new([sx, 0.0, 0.0, -sy, -e.x0 * sx, e.y1 * sy]);
        let canvas = Affine::new([width_px, 0.0, 0.0, -height_px, 0.0, height_px]);

        Ok(Self {
            width_px,
            height_px,
            data,
            canvas,
        })
    }

    pub(crate) fn affine(&self, space: Space) -> Affine {
        match space {
            Space::Data => self.data,
            Space::Canvas => self.canvas,
        }
    }
}

pub(crate) fn pt_to_px(pt: f64, dpi: u32) -> f64 {
    pt * f64::from(dpi) / 72.0
}

/// Marker radius for a scatter area given in square points.
pub(crate) fn marker_radius_pt(area_pt2: f64) -> f64 {
    (area_pt2 / std::f64::consts::PI).sqrt()
}

/// Inner/outer radius ratio of the five-point star glyph.
const STAR_INNER_RATIO: f64 = 0.381_966;

pub(crate) fn marker_path(marker: Marker, center: Point, radius: f64) -> BezPath {
    match marker {
        Marker::Circle => Circle::new(center, radius).to_path(1e-9),
        Marker::Star => {
            let mut path = BezPath::new();
            for k in 0..10 {
                // Vertex 0 points straight up (y down in device space).
                let angle = std::f64::consts::PI * (0.5 + f64::from(k) / 5.0);
                let r = if k % 2 == 0 {
                    radius
                } else {
                    radius * STAR_INNER_RATIO
                };
                let p = Point::new(center.x + r * angle.cos(), center.y - r * angle.sin());
                if k == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            path.close_path();
            path
        }
    }
}
