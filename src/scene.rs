//! Resolved scene model handed to a rendering backend.
//!
//! A [`Scene`] is a write-once, ordered list of z-tagged primitives plus the
//! clip regions they reference and the canvas metadata (logical extent,
//! physical size). Layering is decided by the explicit z index, never by
//! insertion order: the sky is composed after the mountains but sits beneath
//! them, and backends must stable-sort by z before drawing.

use kurbo::{BezPath, Point};
use serde::Serialize;

use crate::color::Color;
use crate::config::Marker;

/// Coordinate space a primitive is authored in.
///
/// `Data` is the canonical drawing frame (x in [0,1], y in [-0.2,0.5], plus
/// border overhang). `Canvas` is the 0..1 fraction of the full canvas extent
/// (borders included); the header tag, sky stripes and text use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    Data,
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintStyle {
    Fill,
    Stroke { width_pt: f64 },
}

/// Handle to a clip region registered on the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionId(pub usize);

/// An opaque closed shape usable as a clip mask. Always in data space.
#[derive(Debug, Clone, Serialize)]
pub struct ClipRegion {
    pub path: BezPath,
}

/// Font slot referenced by text runs; resolution to a file happens in the
/// font library, not in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Workhorse face used by the classic variant (headers and footers).
    Heading,
    /// Display face for the banded variant's main footer line.
    Display,
    /// Script face for the banded variant's header and small footer runs.
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextRun {
    pub content: String,
    pub font: FontRole,
    pub size_pt: f64,
    pub halign: HAlign,
    pub rotation_deg: f64,
    /// Anchor point, in the primitive's `space`. Vertical alignment is
    /// always centered on this point.
    pub pos: Point,
    /// Optional opaque box painted behind the run, sized to the run. The
    /// footer's small texts use it to mask the divider line beneath them.
    pub bbox_fill: Option<Color>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimShape {
    Path { path: BezPath, style: PaintStyle },
    Points { points: Vec<Point>, marker: Marker, size_pt: f64 },
    Text(TextRun),
}

#[derive(Debug, Clone, Serialize)]
pub struct Primitive {
    pub shape: PrimShape,
    pub color: Color,
    pub z: i32,
    pub clip: Option<RegionId>,
    pub space: Space,
}

/// Logical canvas extent in data coordinates: the frame expanded by the
/// total border width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasExtent {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl CanvasExtent {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    regions: Vec<ClipRegion>,
    prims: Vec<Primitive>,
    pub extent: CanvasExtent,
    /// Physical output size in inches (width, height).
    pub size_in: (f64, f64),
    pub transparent_background: bool,
}

impl Scene {
    pub fn new(extent: CanvasExtent, size_in: (f64, f64)) -> Self {
        Self {
            regions: Vec::new(),
            prims: Vec::new(),
            extent,
            size_in,
            transparent_background: true,
        }
    }

    pub fn add_region(&mut self, path: BezPath) -> RegionId {
        self.regions.push(ClipRegion { path });
        RegionId(self.regions.len() - 1)
    }

    pub fn region(&self, id: RegionId) -> &ClipRegion {
        &self.regions[id.0]
    }

    pub fn regions(&self) -> &[ClipRegion] {
        &self.regions
    }

    pub fn push(&mut self, prim: Primitive) {
        self.prims.push(prim);
    }

    pub fn prims(&self) -> &[Primitive] {
        &self.prims
    }

    /// Primitives in draw order: stable-sorted by z so equal-z layers keep
    /// their composition order (the inner border precedes the sky at z=0).
    pub fn draw_order(&self) -> Vec<&Primitive> {
        let mut order: Vec<&Primitive> = self.prims.iter().collect();
        order.sort_by_key(|p| p.z);
        order
    }
}
