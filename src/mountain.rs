//! Twin-mountain silhouette builder.
//!
//! The vertices are literal fractions of the canonical frame, each one
//! sitting on a point of the popcorn cloud. The left mountain's y values are
//! compressed by the shrink factor, giving a shorter, flatter peak at x=1/3;
//! the right peak sits at x=2/3. Snow layers accept the transparent sentinel
//! so a theme can hollow the mountains out without changing geometry.

use kurbo::{BezPath, Point};

use crate::color::Color;
use crate::frame::scalex;
use crate::scene::{PaintStyle, PrimShape, Primitive, RegionId, Scene, Space};

/// Stroke width of the ridge lines, in points.
const RIDGE_STROKE_PT: f64 = 3.0;

pub struct MountainParams {
    pub shift_up: f64,
    pub shrink: f64,
    /// Horizontal compression about the frame center (banner ratio only).
    pub scale_x: f64,
    pub edge: Color,
    pub snow: Color,
    pub clip: RegionId,
}

pub fn build(scene: &mut Scene, p: &MountainParams) {
    let v = |x: f64, y: f64| Point::new(scalex(x, p.scale_x), y + p.shift_up);
    // Left-mountain vertex: y carries the shrink factor.
    let vs = |x: f64, y: f64| v(x, y * p.shrink);

    let mut push = |points: &[Point], style: PaintStyle, color: Color, z: i32| {
        let mut path = BezPath::new();
        path.move_to(points[0]);
        for &pt in &points[1..] {
            path.line_to(pt);
        }
        if matches!(style, PaintStyle::Fill) {
            path.close_path();
        }
        scene.push(Primitive {
            shape: PrimShape::Path { path, style },
            color,
            z,
            clip: Some(p.clip),
            space: Space::Data,
        });
    };
    let ridge = PaintStyle::Stroke {
        width_pt: RIDGE_STROKE_PT,
    };

    // Right mountain: one ridge line, three edge triangles, one snow face.
    push(&[v(0.5, 0.0), v(2.0 / 3.0, 1.0 / 3.0)], ridge, p.edge, 4);
    push(
        &[
            v(2.0 / 3.0, 1.0 / 3.0),
            v(4.0 / 6.0, 1.0 / 6.0),
            v(1.0, 0.0),
        ],
        PaintStyle::Fill,
        p.edge,
        4,
    );
    push(
        &[
            v(5.0 / 8.0, 1.0 / 8.0),
            v(4.0 / 6.0, 1.0 / 6.0),
            v(2.0 / 3.0, 1.0 / 3.0),
        ],
        PaintStyle::Fill,
        p.edge,
        4,
    );
    push(
        &[
            v(0.5, 0.0),
            v(21.0 / 40.0, 1.0 / 40.0),
            v(2.0 / 3.0, 1.0 / 3.0),
        ],
        PaintStyle::Fill,
        p.edge,
        4,
    );
    push(
        &[v(0.5, 0.0), v(2.0 / 3.0, 1.0 / 3.0), v(1.0, 0.0)],
        PaintStyle::Fill,
        p.snow,
        3,
    );

    // Left mountain: two ridge lines, four edge faces, one snow face.
    push(&[v(0.0, 0.0), vs(1.0 / 3.0, 1.0 / 3.0)], ridge, p.edge, 2);
    push(
        &[vs(1.0 / 3.0, 1.0 / 3.0), vs(3.0 / 5.0, 1.0 / 5.0)],
        ridge,
        p.edge,
        2,
    );
    push(
        &[
            vs(1.0 / 3.0, 1.0 / 3.0),
            v(0.5, 0.0),
            vs(3.0 / 5.0, 1.0 / 5.0),
        ],
        PaintStyle::Fill,
        p.edge,
        2,
    );
    push(
        &[
            vs(1.0 / 3.0, 1.0 / 3.0),
            vs(2.0 / 7.0, 1.0 / 7.0),
            vs(2.0 / 5.0, 1.0 / 5.0),
        ],
        PaintStyle::Fill,
        p.edge,
        2,
    );
    push(
        &[
            vs(2.0 / 6.0, 1.0 / 6.0),
            vs(5.0 / 15.0, 1.0 / 15.0),
            vs(4.0 / 9.0, 1.0 / 9.0),
            vs(2.0 / 5.0, 1.0 / 5.0),
        ],
        PaintStyle::Fill,
        p.edge,
        2,
    );
    push(
        &[
            vs(1.0 / 3.0, 1.0 / 3.0),
            v(0.0, 0.0),
            vs(2.0 / 30.0, 1.0 / 30.0),
        ],
        PaintStyle::Fill,
        p.edge,
        2,
    );
    push(
        &[v(0.0, 0.0), vs(1.0 / 3.0, 1.0 / 3.0), v(0.5, 0.0)],
        PaintStyle::Fill,
        p.snow,
        1,
    );
}
