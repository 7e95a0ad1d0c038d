//! Outline builder: draw region, footer region and the three concentric
//! border layers, per shape family.
//!
//! Every family produces the same structure from its own primitive kind: an
//! invisible footer clip, the draw-region clip with a stroked outline on top
//! (z 10), and inner/contrast/outer border fills at z 0/-1/-2. The parabolic
//! family cannot clip its band directly, so the border fills are drawn once
//! per rectangular complement mask covering the area outside the frame.

use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as _};

use crate::color::Color;
use crate::config::{Ratio, Resolved, ShapeFamily};
use crate::frame::{BorderMetrics, Frame, scalex};
use crate::scene::{PaintStyle, PrimShape, Primitive, RegionId, Scene, Space};

/// Corner radius shared by every layer of the rounded family.
const ROUND_PAD: f64 = 0.09;

/// Overhang of the parabolic complement masks beyond the frame.
const COMPLEMENT_OVERHANG: f64 = 0.2;

/// Stroke width of the draw-region outline, in points.
const OUTLINE_STROKE_PT: f64 = 2.0;

/// Region handles produced by the builder. Later components clip mountains,
/// popcorn and sky to `draw`, and footer text to `footer`.
#[derive(Debug, Clone)]
pub struct Outline {
    pub draw: RegionId,
    pub footer: RegionId,
    pub complements: Vec<RegionId>,
}

pub fn build(
    scene: &mut Scene,
    frame: &Frame,
    resolved: &Resolved,
    border: Color,
    contrast: Color,
) -> Outline {
    let m = frame.border_metrics(resolved.ratio);
    match resolved.shape.family() {
        ShapeFamily::Ellipse => build_ellipse(scene, frame, &m, border, contrast),
        ShapeFamily::Rectangle => build_rect(scene, frame, &m, resolved.ratio, border, contrast),
        ShapeFamily::Rounded => build_rounded(scene, frame, &m, border, contrast),
        ShapeFamily::Parabolic => {
            build_parabolic(scene, frame, &m, resolved.ratio, border, contrast)
        }
    }
}

fn push_fill(scene: &mut Scene, path: BezPath, color: Color, z: i32, clip: Option<RegionId>) {
    scene.push(Primitive {
        shape: PrimShape::Path {
            path,
            style: PaintStyle::Fill,
        },
        color,
        z,
        clip,
        space: Space::Data,
    });
}

fn push_outline_stroke(scene: &mut Scene, path: BezPath, color: Color) {
    scene.push(Primitive {
        shape: PrimShape::Path {
            path,
            style: PaintStyle::Stroke {
                width_pt: OUTLINE_STROKE_PT,
            },
        },
        color,
        z: 10,
        clip: None,
        space: Space::Data,
    });
}

fn ellipse_path(frame: &Frame, width: f64, height: f64) -> BezPath {
    Ellipse::new(
        Point::new(frame.x_mid(), frame.y_mid()),
        (width / 2.0, height / 2.0),
        0.0,
    )
    .to_path(1e-9)
}

fn build_ellipse(
    scene: &mut Scene,
    frame: &Frame,
    m: &BorderMetrics,
    border: Color,
    contrast: Color,
) -> Outline {
    let footer = scene.add_region(ellipse_path(
        frame,
        frame.x_len() - 4.0 * m.swidth_x,
        frame.y_len() - 2.0 * m.width_y,
    ));

    let draw_path = ellipse_path(frame, frame.x_len(), frame.y_len());
    let draw = scene.add_region(draw_path.clone());
    push_outline_stroke(scene, draw_path, border);

    push_fill(
        scene,
        ellipse_path(
            frame,
            frame.x_len() + 2.0 * m.swidth_x,
            frame.y_len() + 2.0 * m.width_y,
        ),
        border,
        0,
        None,
    );
    push_fill(
        scene,
        ellipse_path(
            frame,
            frame.x_len() + 2.0 * m.swidth_x + 2.0 * m.sinn_border_width_x,
            frame.y_len() + 2.0 * m.width_y + 2.0 * m.inn_border_width_y,
        ),
        contrast,
        -1,
        None,
    );
    push_fill(
        scene,
        ellipse_path(
            frame,
            frame.x_len() + 2.0 * m.sborder_width_x,
            frame.y_len() + 2.0 * m.border_width_y,
        ),
        border,
        -2,
        None,
    );

    Outline {
        draw,
        footer,
        complements: Vec::new(),
    }
}

fn build_rect(
    scene: &mut Scene,
    frame: &Frame,
    m: &BorderMetrics,
    ratio: Ratio,
    border: Color,
    contrast: Color,
) -> Outline {
    // The banner compresses the footer clip horizontally so footer text
    // stays out of the narrow side margins.
    let fsx = ratio.footer_clip_scale_x();
    let footer_x0 = scalex(frame.x_min + 2.0 * m.swidth_x, fsx);
    let footer_x1 = scalex(frame.x_min + 2.0 * m.swidth_x + frame.x_len() - 4.0 * m.swidth_x, fsx);
    let footer = scene.add_region(
        Rect::new(
            footer_x0,
            frame.y_min + m.width_y,
            footer_x1,
            frame.y_min + m.width_y + frame.y_len() - 2.0 * m.width_y,
        )
        .to_path(1e-9),
    );

    let draw_rect = Rect::new(frame.x_min, frame.y_min, frame.x_max, frame.y_max);
    let draw = scene.add_region(draw_rect.to_path(1e-9));
    push_outline_stroke(scene, draw_rect.to_path(1e-9), border);

    push_fill(
        scene,
        draw_rect.inflate(m.swidth_x, m.width_y).to_path(1e-9),
        border,
        0,
        None,
    );
    push_fill(
        scene,
        draw_rect
            .inflate(
                m.swidth_x + m.sinn_border_width_x,
                m.width_y + m.inn_border_width_y,
            )
            .to_path(1e-9),
        contrast,
        -1,
        None,
    );
    push_fill(
        scene,
        draw_rect
            .inflate(m.sborder_width_x, m.border_width_y)
            .to_path(1e-9),
        border,
        -2,
        None,
    );

    Outline {
        draw,
        footer,
        complements: Vec::new(),
    }
}

fn rounded_path(rect: Rect) -> BezPath {
    RoundedRect::from_rect(rect, ROUND_PAD).to_path(1e-9)
}

fn build_rounded(
    scene: &mut Scene,
    frame: &Frame,
    m: &BorderMetrics,
    border: Color,
    contrast: Color,
) -> Outline {
    let base = Rect::new(frame.x_min, frame.y_min, frame.x_max, frame.y_max);

    let footer = scene.add_region(rounded_path(base.inflate(-2.0 * m.swidth_x, -m.width_y)));

    let draw_path = rounded_path(base);
    let draw = scene.add_region(draw_path.clone());
    push_outline_stroke(scene, draw_path, border);

    push_fill(
        scene,
        rounded_path(base.inflate(m.swidth_x, m.width_y)),
        border,
        0,
        None,
    );
    push_fill(
        scene,
        rounded_path(base.inflate(
            m.swidth_x + m.sinn_border_width_x,
            m.width_y + m.inn_border_width_y,
        )),
        contrast,
        -1,
        None,
    );
    push_fill(
        scene,
        rounded_path(base.inflate(m.sborder_width_x, m.border_width_y)),
        border,
        -2,
        None,
    );

    Outline {
        draw,
        footer,
        complements: Vec::new(),
    }
}

/// Append an exact quadratic segment of the parabola
/// y = a*(x - h)^2 + k from x0 to x1. The control point of a quad Bezier
/// tracing a parabola sits at the intersection of the endpoint tangents:
/// px = (x0 + x1) / 2, py = f(x0) + a*(x0 - h)*(x1 - x0).
fn parabola_to(path: &mut BezPath, a: f64, h: f64, k: f64, x0: f64, x1: f64) {
    let f = |x: f64| a * (x - h) * (x - h) + k;
    let px = (x0 + x1) / 2.0;
    let py = f(x0) + a * (x0 - h) * (x1 - x0);
    path.quad_to(Point::new(px, py), Point::new(x1, f(x1)));
}

/// Closed band between the bottom parabola (opening up, vertex at y `k_bot`)
/// and the top parabola (opening down, vertex at y `k_top`), with straight
/// vertical edges at `x0`/`x1`.
fn parabolic_band(slope: f64, x0: f64, x1: f64, k_bot: f64, k_top: f64) -> BezPath {
    let f_bot = |x: f64| slope * (x - 0.5) * (x - 0.5) + k_bot;
    let mut path = BezPath::new();
    path.move_to(Point::new(x0, f_bot(x0)));
    parabola_to(&mut path, slope, 0.5, k_bot, x0, x1);
    let f_top = |x: f64| -slope * (x - 0.5) * (x - 0.5) + k_top;
    path.line_to(Point::new(x1, f_top(x1)));
    parabola_to(&mut path, -slope, 0.5, k_top, x1, x0);
    path.close_path();
    path
}

fn build_parabolic(
    scene: &mut Scene,
    frame: &Frame,
    m: &BorderMetrics,
    ratio: Ratio,
    border: Color,
    contrast: Color,
) -> Outline {
    let slope = ratio.parabola_slope();

    let footer = scene.add_region(parabolic_band(
        slope,
        frame.x_min + 2.0 * m.swidth_x,
        frame.x_max - 2.0 * m.swidth_x,
        frame.y_min + m.width_y,
        frame.y_max - m.width_y,
    ));

    let draw_path = parabolic_band(slope, frame.x_min, frame.x_max, frame.y_min, frame.y_max);
    let draw = scene.add_region(draw_path.clone());
    push_outline_stroke(scene, draw_path, border);

    // Complement masks: the regions strictly outside the frame on each side,
    // with a generous overhang. The border band would otherwise paint inside
    // the canvas where the parabola pinches narrower than the frame.
    let f_bot = |x: f64| slope * (x - 0.5) * (x - 0.5) + frame.y_min;
    let f_top = |x: f64| -slope * (x - 0.5) * (x - 0.5) + frame.y_max;

    let mut below = BezPath::new();
    below.move_to(Point::new(frame.x_min, f_bot(frame.x_min)));
    parabola_to(&mut below, slope, 0.5, frame.y_min, frame.x_min, frame.x_max);
    below.line_to(Point::new(frame.x_max, frame.y_min - COMPLEMENT_OVERHANG));
    below.line_to(Point::new(frame.x_min, frame.y_min - COMPLEMENT_OVERHANG));
    below.close_path();

    let mut above = BezPath::new();
    above.move_to(Point::new(frame.x_min, f_top(frame.x_min)));
    parabola_to(&mut above, -slope, 0.5, frame.y_max, frame.x_min, frame.x_max);
    above.line_to(Point::new(frame.x_max, frame.y_max + COMPLEMENT_OVERHANG));
    above.line_to(Point::new(frame.x_min, frame.y_max + COMPLEMENT_OVERHANG));
    above.close_path();

    let side = |x0: f64, x1: f64| {
        Rect::new(
            x0,
            frame.y_min - COMPLEMENT_OVERHANG,
            x1,
            frame.y_max + COMPLEMENT_OVERHANG,
        )
        .to_path(1e-9)
    };
    let left = side(frame.x_min - COMPLEMENT_OVERHANG, frame.x_min);
    let right = side(frame.x_max, frame.x_max + COMPLEMENT_OVERHANG);

    let complements = vec![
        scene.add_region(below),
        scene.add_region(above),
        scene.add_region(left),
        scene.add_region(right),
    ];

    // Each border layer is a wider parabolic band, drawn once per mask.
    let layers = [
        (
            m.swidth_x,
            m.width_y,
            border,
            0,
        ),
        (
            m.swidth_x + m.sinn_border_width_x,
            m.width_y + m.inn_border_width_y,
            contrast,
            -1,
        ),
        (m.sborder_width_x, m.border_width_y, border, -2),
    ];
    for (dx, dy, color, z) in layers {
        let band = parabolic_band(
            slope,
            frame.x_min - dx,
            frame.x_max + dx,
            frame.y_min - dy,
            frame.y_max + dy,
        );
        for &mask in &complements {
            push_fill(scene, band.clone(), color, z, Some(mask));
        }
    }

    Outline {
        draw,
        footer,
        complements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Shape;
    use crate::scene::CanvasExtent;

    fn test_scene() -> Scene {
        Scene::new(
            CanvasExtent {
                x0: -0.1,
                x1: 1.1,
                y0: -0.3,
                y1: 0.6,
            },
            (7.5, 6.0),
        )
    }

    fn resolved(shape: Shape, ratio: Ratio) -> Resolved {
        Resolved {
            shape,
            ratio,
            shift_up: 0.0,
        }
    }

    fn border_zs(scene: &Scene) -> Vec<i32> {
        scene
            .prims()
            .iter()
            .filter(|p| matches!(p.shape, PrimShape::Path { style: PaintStyle::Fill, .. }))
            .map(|p| p.z)
            .collect()
    }

    #[test]
    fn every_family_emits_three_border_layers_and_a_stroke() {
        for (shape, ratio) in [
            (Shape::Oval, Ratio::R5x4),
            (Shape::Rectangle, Ratio::R3x2),
            (Shape::RoundedRectangle, Ratio::R5x4),
        ] {
            let mut scene = test_scene();
            let out = build(
                &mut scene,
                &Frame::CANONICAL,
                &resolved(shape, ratio),
                Color::rgb(0.0, 0.0, 0.0),
                Color::rgb(1.0, 1.0, 1.0),
            );
            assert_eq!(border_zs(&scene), vec![0, -1, -2], "{shape}");
            let strokes: Vec<_> = scene
                .prims()
                .iter()
                .filter(|p| matches!(p.shape, PrimShape::Path { style: PaintStyle::Stroke { .. }, .. }))
                .collect();
            assert_eq!(strokes.len(), 1);
            assert_eq!(strokes[0].z, 10);
            assert!(out.complements.is_empty());
        }
    }

    #[test]
    fn parabolic_family_draws_each_layer_once_per_mask() {
        let mut scene = test_scene();
        let out = build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Default, Ratio::R5x4),
            Color::rgb(0.0, 0.0, 0.0),
            Color::rgb(1.0, 1.0, 1.0),
        );
        assert_eq!(out.complements.len(), 4);
        // 3 layers x 4 masks.
        let fills = border_zs(&scene);
        assert_eq!(fills.len(), 12);
        for p in scene.prims() {
            if matches!(p.shape, PrimShape::Path { style: PaintStyle::Fill, .. }) {
                assert!(p.clip.is_some());
            }
        }
    }

    #[test]
    fn quad_segment_matches_analytic_parabola_at_midpoint() {
        // Quad Bezier at t=0.5: (p0 + 2*p1 + p2) / 4 must equal f(mid).
        let slope = 0.2;
        let (x0, x1) = (0.0, 1.0);
        let k = -0.2;
        let f = |x: f64| slope * (x - 0.5) * (x - 0.5) + k;

        let mut path = BezPath::new();
        path.move_to(Point::new(x0, f(x0)));
        parabola_to(&mut path, slope, 0.5, k, x0, x1);
        let kurbo::PathEl::QuadTo(p1, p2) = path.elements()[1] else {
            panic!("expected a quad segment");
        };
        let mid_y = (f(x0) + 2.0 * p1.y + p2.y) / 4.0;
        let mid_x = (x0 + 2.0 * p1.x + p2.x) / 4.0;
        assert!((mid_x - 0.5).abs() < 1e-12);
        assert!((mid_y - f(0.5)).abs() < 1e-12);
    }

    #[test]
    fn banner_footer_clip_is_compressed() {
        let mut banner = test_scene();
        let out = build(
            &mut banner,
            &Frame::CANONICAL,
            &resolved(Shape::Rectangle, Ratio::R3x1),
            Color::rgb(0.0, 0.0, 0.0),
            Color::rgb(1.0, 1.0, 1.0),
        );
        let bbox = banner.region(out.footer).path.bounding_box();

        let mut plain = test_scene();
        let out = build(
            &mut plain,
            &Frame::CANONICAL,
            &resolved(Shape::Rectangle, Ratio::R3x2),
            Color::rgb(0.0, 0.0, 0.0),
            Color::rgb(1.0, 1.0, 1.0),
        );
        let plain_bbox = plain.region(out.footer).path.bounding_box();

        // Width is reduced by the 0.85 mapper on top of the narrower banner
        // border scale; both clips stay centered.
        assert!(bbox.width() < plain_bbox.width() + 1e-12);
        assert!(((bbox.x0 + bbox.x1) / 2.0 - 0.5).abs() < 1e-12);
    }
}
