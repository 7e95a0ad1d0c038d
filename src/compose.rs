//! Logo composer: validated configuration in, fully resolved scene out.
//!
//! The build phases run in a fixed order (outline, mountains, popcorn, sky,
//! text) but layering is decided entirely by the explicit z indices the
//! builders assign. The sky in particular is composed after the mountains
//! yet sits beneath them.

use kurbo::{Point, Rect, Shape as _};

use crate::config::LogoConfig;
use crate::error::PeaklineResult;
use crate::frame::Frame;
use crate::mountain::{self, MountainParams};
use crate::outline;
use crate::popcorn::{self, LOGO_DEPTH};
use crate::scene::{CanvasExtent, PaintStyle, PrimShape, Primitive, Scene, Space};
use crate::sky;
use crate::text_layout::{self, TextParams};

/// Marker size, matching a scatter area of 50 pt^2.
const MARKER_AREA_PT2: f64 = 50.0;

/// Extra ground height closing the gap between the lowest dots and the
/// frame bottom.
const GROUND_GAP: f64 = 0.01;

pub fn compose(config: &LogoConfig) -> PeaklineResult<Scene> {
    let resolved = config.resolve()?;
    let frame = Frame::CANONICAL;
    let m = frame.border_metrics(resolved.ratio);

    let extent = CanvasExtent {
        x0: frame.x_min - m.sborder_width_x - m.sinn_border_width_x,
        x1: frame.x_max + m.sborder_width_x + m.sinn_border_width_x,
        y0: frame.y_min - m.border_width_y - m.inn_border_width_y,
        y1: frame.y_max + m.border_width_y + m.inn_border_width_y,
    };
    let (mut w_in, mut h_in) = resolved.ratio.base_size_in();
    if config.variant == crate::config::Variant::Classic {
        w_in *= 2.0;
        h_in *= 2.0;
    }
    let mut scene = Scene::new(extent, (w_in, h_in));

    let regions = outline::build(
        &mut scene,
        &frame,
        &resolved,
        config.colors.border,
        config.colors.border_contrast,
    );

    let scale_x = resolved.ratio.silhouette_scale_x();
    mountain::build(
        &mut scene,
        &MountainParams {
            shift_up: resolved.shift_up,
            shrink: frame.shrink,
            scale_x,
            edge: config.colors.mountain_edge,
            snow: config.colors.mountain_snow,
            clip: regions.draw,
        },
    );

    // Popcorn dots. The first emitted point is the apex dot belonging to
    // neither mountain; it is dropped. The left half is compressed by the
    // shrink factor like the left mountain.
    let raw = popcorn::popcorn(LOGO_DEPTH)?;
    let points: Vec<Point> = raw[1..]
        .iter()
        .map(|&(x, y)| {
            let y = if x <= 0.5 { y * frame.shrink } else { y };
            Point::new(crate::frame::scalex(x, scale_x), y + resolved.shift_up)
        })
        .collect();
    scene.push(Primitive {
        shape: PrimShape::Points {
            points,
            marker: config.marker,
            size_pt: MARKER_AREA_PT2,
        },
        color: config.colors.popcorn,
        z: 5,
        clip: Some(regions.draw),
        space: Space::Data,
    });

    // Ground fill under the dots.
    scene.push(Primitive {
        shape: PrimShape::Path {
            path: Rect::new(
                frame.x_min,
                frame.y_min,
                frame.x_max,
                frame.y_min + frame.y_min.abs() + GROUND_GAP + resolved.shift_up,
            )
            .to_path(1e-9),
            style: PaintStyle::Fill,
        },
        color: config.colors.popcorn,
        z: 5,
        clip: Some(regions.draw),
        space: Space::Data,
    });

    sky::build(
        &mut scene,
        &config.colors.sky,
        resolved.shift_up,
        regions.draw,
    );

    text_layout::build(
        &mut scene,
        &frame,
        &resolved,
        &TextParams {
            variant: config.variant,
            content: &config.text,
            popcorn: config.colors.popcorn,
            header_text: config.colors.header_text,
            header_tag: config.colors.header_tag,
            footer_text: config.colors.footer_text,
            footer_lines: config.colors.footer_lines,
            footer_small_text: config.colors.footer_small_text,
            draw: regions.draw,
            footer: regions.footer,
        },
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::{Palette, Ratio, Shape, Sky};

    fn palette() -> Palette {
        Palette {
            popcorn: Color::from_hex("#D4B773").unwrap(),
            mountain_edge: Color::from_hex("#636363").unwrap(),
            mountain_snow: Color::from_hex("#FFFFFF").unwrap(),
            border: Color::from_hex("#636363").unwrap(),
            border_contrast: Color::from_hex("#FFFFFF").unwrap(),
            header_tag: Color::from_hex("#636363").unwrap(),
            header_text: Color::from_hex("#FFFFFF").unwrap(),
            footer_lines: Color::from_hex("#636363").unwrap(),
            footer_text: Color::from_hex("#FFFFFF").unwrap(),
            footer_small_text: None,
            sky: Sky::Solid(Color::from_hex("#ADF7FF").unwrap()),
        }
    }

    fn config(shape: Shape, ratio: Ratio) -> LogoConfig {
        let mut c = LogoConfig::new(palette());
        c.shape = shape;
        c.ratio = ratio;
        c
    }

    #[test]
    fn identical_configs_compose_identical_scenes() {
        let c = config(Shape::Default, Ratio::R5x4);
        let a = serde_json::to_string(&compose(&c).unwrap()).unwrap();
        // Interleave an unrelated composition to rule out hidden state.
        let _ = compose(&config(Shape::Circle, Ratio::R1x1)).unwrap();
        let b = serde_json::to_string(&compose(&c).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canvas_extent_includes_the_full_border() {
        let scene = compose(&config(Shape::Square, Ratio::R1x1)).unwrap();
        let e = scene.extent;
        assert!((e.x0 - (0.0 - 0.05 - 0.008)).abs() < 1e-12);
        assert!((e.x1 - (1.0 + 0.05 + 0.008)).abs() < 1e-12);
        assert!((e.y0 - (-0.2 - 0.035 - 0.0056)).abs() < 1e-12);
        assert!((e.y1 - (0.5 + 0.035 + 0.0056)).abs() < 1e-12);
    }

    #[test]
    fn physical_size_is_doubled_for_the_classic_variant() {
        let classic = compose(&config(Shape::Default, Ratio::R5x4)).unwrap();
        assert_eq!(classic.size_in, (15.0, 12.0));

        let mut c = config(Shape::Default, Ratio::R5x4);
        c.variant = crate::config::Variant::Banded;
        c.colors.footer_small_text = Some(Color::rgb(0.0, 0.0, 0.0));
        let banded = compose(&c).unwrap();
        assert_eq!(banded.size_in, (7.5, 6.0));
    }

    #[test]
    fn apex_dot_is_dropped() {
        let scene = compose(&config(Shape::Default, Ratio::R5x4)).unwrap();
        let dots = scene
            .prims()
            .iter()
            .find_map(|p| match &p.shape {
                PrimShape::Points { points, .. } => Some(points),
                _ => None,
            })
            .expect("popcorn points");
        let expected: usize = (2..=110u32).map(|i| (i - 1) as usize).sum();
        assert_eq!(dots.len(), expected - 1);
        assert!(!dots.iter().any(|p| p.x == 0.5 && p.y == 0.5));
    }

    #[test]
    fn sky_sits_below_mountains_in_draw_order() {
        let scene = compose(&config(Shape::Default, Ratio::R5x4)).unwrap();
        let order = scene.draw_order();
        let sky_idx = order
            .iter()
            .position(|p| p.z == 0 && p.space == Space::Canvas)
            .expect("sky primitive");
        let first_mountain = order.iter().position(|p| p.z == 1).expect("snow layer");
        assert!(sky_idx < first_mountain);
    }

    #[test]
    fn invalid_combination_composes_nothing() {
        assert!(compose(&config(Shape::Oval, Ratio::R3x1)).is_err());
    }

    #[test]
    fn banner_squeezes_dots_about_the_center() {
        let mut c = config(Shape::Rectangle, Ratio::R3x1);
        c.variant = crate::config::Variant::Banded;
        c.colors.footer_small_text = Some(Color::rgb(0.0, 0.0, 0.0));
        let scene = compose(&c).unwrap();
        let dots = scene
            .prims()
            .iter()
            .find_map(|p| match &p.shape {
                PrimShape::Points { points, .. } => Some(points),
                _ => None,
            })
            .unwrap();
        // x = 1/2 stays fixed; everything else moves toward the center.
        for p in dots {
            assert!(p.x > 0.125 && p.x < 0.875);
        }
    }
}
