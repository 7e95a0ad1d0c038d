//! Text layout resolver: header tag, header text, footer texts and divider
//! lines.
//!
//! The positions and font sizes are empirical layout data keyed by
//! (ratio, shape), kept as explicit lookup tables so they can be audited
//! and tested without a renderer. Text anchors are in canvas space; the
//! divider lines are in data space so they can clip against the footer
//! region like the rest of the geometry.

use kurbo::{BezPath, Point, Rect, Shape as _};

use crate::color::Color;
use crate::config::{Ratio, Resolved, Shape, TextContent, Variant};
use crate::frame::Frame;
use crate::scene::{
    FontRole, HAlign, PaintStyle, PrimShape, Primitive, RegionId, Scene, Space, TextRun,
};

const TAG_HEIGHT: f64 = 0.125;
const TAG_X0: f64 = 0.0;

/// Horizontal nudge keeping the header text off the border on round shapes.
const ROUND_HEADER_SHIFT: f64 = 0.07;

/// Footer font-size reduction on round shapes.
const ROUND_FOOTER_SHIFT: f64 = 4.0;

pub struct TextParams<'a> {
    pub variant: Variant,
    pub content: &'a TextContent,
    pub popcorn: Color,
    pub header_text: Color,
    pub header_tag: Color,
    pub footer_text: Color,
    pub footer_lines: Color,
    pub footer_small_text: Option<Color>,
    pub draw: RegionId,
    pub footer: RegionId,
}

struct HeaderLayout {
    tag_y0: f64,
    font_size: f64,
    tag_width: f64,
}

fn classic_header(ratio: Ratio, shape: Shape, hshift: f64) -> HeaderLayout {
    match ratio {
        Ratio::R3x2 => HeaderLayout {
            tag_y0: 0.72,
            font_size: 52.0,
            tag_width: 2.5 / 5.0 + hshift,
        },
        Ratio::R5x4 => HeaderLayout {
            tag_y0: if shape == Shape::Oval { 0.75 } else { 0.725 },
            font_size: 50.0,
            tag_width: 2.75 / 5.0 + hshift / 2.0,
        },
        Ratio::R3x1 => HeaderLayout {
            tag_y0: 0.725,
            font_size: 52.0,
            tag_width: 2.25 / 5.0 + hshift / 2.0,
        },
        Ratio::R1x1 => HeaderLayout {
            tag_y0: 0.75,
            font_size: if shape == Shape::Circle { 42.0 } else { 46.0 },
            tag_width: 0.55 + hshift / 1.5,
        },
    }
}

fn banded_header(ratio: Ratio, shape: Shape, hshift: f64) -> HeaderLayout {
    match ratio {
        Ratio::R3x2 => HeaderLayout {
            tag_y0: 0.72,
            font_size: 56.0,
            tag_width: 2.5 / 5.0 + hshift,
        },
        Ratio::R5x4 => HeaderLayout {
            tag_y0: if shape == Shape::Oval { 0.75 } else { 0.725 },
            font_size: 54.0,
            tag_width: 2.75 / 5.0 + hshift / 2.0,
        },
        Ratio::R3x1 => HeaderLayout {
            tag_y0: 0.725,
            font_size: 56.0,
            tag_width: 2.25 / 5.0 + hshift / 2.0,
        },
        Ratio::R1x1 => HeaderLayout {
            tag_y0: 0.75,
            font_size: if shape == Shape::Circle { 46.0 } else { 48.0 },
            tag_width: 0.55 + hshift / 1.5,
        },
    }
}

fn classic_footer_size(ratio: Ratio, shape: Shape) -> f64 {
    match ratio {
        Ratio::R1x1 => 34.0,
        Ratio::R5x4 => {
            if shape == Shape::Oval {
                38.0
            } else {
                34.0
            }
        }
        Ratio::R3x2 | Ratio::R3x1 => {
            if shape == Shape::Oval {
                34.0
            } else {
                40.0
            }
        }
    }
}

fn banded_footer_size(ratio: Ratio, shape: Shape) -> f64 {
    match ratio {
        Ratio::R5x4 => {
            if shape == Shape::Oval {
                36.0
            } else {
                38.0
            }
        }
        Ratio::R1x1 => {
            if shape == Shape::Circle {
                30.0
            } else {
                36.0
            }
        }
        Ratio::R3x2 => {
            if shape == Shape::Oval {
                38.0
            } else {
                46.0
            }
        }
        Ratio::R3x1 => 48.0,
    }
}

/// Fraction where the small-footer runs start/end on the banded variant.
fn banded_end_line_frac(ratio: Ratio) -> f64 {
    match ratio {
        Ratio::R3x1 => 0.3,
        Ratio::R5x4 | Ratio::R3x2 => 0.15,
        Ratio::R1x1 => 0.2,
    }
}

fn banded_lower_line_scale(ratio: Ratio, shape: Shape) -> f64 {
    if shape.is_round() {
        match ratio {
            Ratio::R1x1 => 1.5,
            Ratio::R5x4 => 1.75,
            _ => 2.0,
        }
    } else {
        1.0
    }
}

/// Convert a canvas-space y fraction to data-space, spanning the frame plus
/// the full vertical border.
fn frac_to_data_y(frame: &Frame, frac: f64) -> f64 {
    frac * (frame.y_len() + 2.0 * frame.border_width_y()) + frame.y_min
        - frame.border_width_y()
}

pub fn build(scene: &mut Scene, frame: &Frame, resolved: &Resolved, p: &TextParams<'_>) {
    let hshift = if resolved.shape.is_round() {
        ROUND_HEADER_SHIFT
    } else {
        0.0
    };
    match p.variant {
        Variant::Classic => {
            let header = classic_header(resolved.ratio, resolved.shape, hshift);
            build_classic_header(scene, &header, hshift, p);
            build_classic_footer(scene, frame, resolved, p);
        }
        Variant::Banded => {
            let header = banded_header(resolved.ratio, resolved.shape, hshift);
            build_banded_header(scene, &header, hshift, p);
            build_banded_footer(scene, frame, resolved, p);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn push_text(
    scene: &mut Scene,
    content: &str,
    font: FontRole,
    size_pt: f64,
    halign: HAlign,
    rotation_deg: f64,
    pos: Point,
    color: Color,
    z: i32,
    bbox_fill: Option<Color>,
) {
    scene.push(Primitive {
        shape: PrimShape::Text(TextRun {
            content: content.to_owned(),
            font,
            size_pt,
            halign,
            rotation_deg,
            pos,
            bbox_fill,
        }),
        color,
        z,
        clip: None,
        space: Space::Canvas,
    });
}

fn push_tag_bar(scene: &mut Scene, y0: f64, width: f64, height: f64, p: &TextParams<'_>) {
    scene.push(Primitive {
        shape: PrimShape::Path {
            path: Rect::new(TAG_X0, y0, TAG_X0 + width, y0 + height).to_path(1e-9),
            style: PaintStyle::Fill,
        },
        color: p.header_tag,
        z: 6,
        clip: Some(p.draw),
        space: Space::Canvas,
    });
}

fn push_divider(scene: &mut Scene, y_data: f64, width_pt: f64, z: i32, p: &TextParams<'_>) {
    let mut path = BezPath::new();
    path.move_to(Point::new(0.0, y_data));
    path.line_to(Point::new(1.0, y_data));
    scene.push(Primitive {
        shape: PrimShape::Path {
            path,
            style: PaintStyle::Stroke { width_pt },
        },
        color: p.footer_lines,
        z,
        clip: Some(p.footer),
        space: Space::Data,
    });
}

fn header_text_pos(header: &HeaderLayout, hshift: f64) -> Point {
    Point::new(1.0 / 3.0 + hshift, header.tag_y0 + TAG_HEIGHT / 2.0 - 0.01)
}

fn build_classic_header(scene: &mut Scene, header: &HeaderLayout, hshift: f64, p: &TextParams<'_>) {
    push_tag_bar(scene, header.tag_y0, header.tag_width, TAG_HEIGHT, p);
    push_text(
        scene,
        &p.content.header,
        FontRole::Heading,
        header.font_size,
        HAlign::Center,
        0.0,
        header_text_pos(header, hshift),
        p.header_text,
        8,
        None,
    );
}

fn build_classic_footer(scene: &mut Scene, frame: &Frame, resolved: &Resolved, p: &TextParams<'_>) {
    let ft_shift = if resolved.shape.is_round() {
        ROUND_FOOTER_SHIFT
    } else {
        0.0
    };
    let main_size = classic_footer_size(resolved.ratio, resolved.shape) - ft_shift;

    let small = |scene: &mut Scene, content: &str, size: f64, vdist: f64| {
        push_text(
            scene,
            content,
            FontRole::Heading,
            size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_lines,
            8,
            Some(p.popcorn),
        );
        let y = frac_to_data_y(frame, vdist);
        push_divider(scene, y, 2.0, 8, p);
    };

    if resolved.shift_up != 0.0 {
        // Shifted compositions split the title across two lines.
        let mut vdist = 0.35;
        small(scene, &p.content.footer_top, 20.0, vdist);
        vdist -= 0.075;
        push_text(
            scene,
            &p.content.footer_main_split.0,
            FontRole::Heading,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            8,
            None,
        );
        vdist -= 0.08;
        push_text(
            scene,
            &p.content.footer_main_split.1,
            FontRole::Heading,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            8,
            None,
        );
        vdist -= 0.075;
        small(scene, &p.content.footer_bottom, 18.0, vdist);
    } else {
        let mut vdist = 0.29;
        small(scene, &p.content.footer_top, 20.0, vdist);
        vdist -= 0.078;
        push_text(
            scene,
            &p.content.footer_main,
            FontRole::Heading,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            8,
            None,
        );
        vdist -= 0.075;
        small(scene, &p.content.footer_bottom, 18.0, vdist);
    }
}

fn build_banded_header(scene: &mut Scene, header: &HeaderLayout, hshift: f64, p: &TextParams<'_>) {
    // Main bar on top, then three thin bars descending with a fixed gap.
    let gap = 0.0075;
    let main_h = TAG_HEIGHT / 2.25;
    let thin_h = TAG_HEIGHT / 8.0;

    let mut start = header.tag_y0 + 1.25 * main_h;
    push_tag_bar(scene, start, header.tag_width, main_h, p);
    for _ in 0..3 {
        start = start - gap - thin_h;
        push_tag_bar(scene, start, header.tag_width, thin_h, p);
    }

    push_text(
        scene,
        &p.content.header,
        FontRole::Script,
        header.font_size,
        HAlign::Center,
        15.0,
        header_text_pos(header, hshift),
        p.header_text,
        8,
        None,
    );
}

fn build_banded_footer(scene: &mut Scene, frame: &Frame, resolved: &Resolved, p: &TextParams<'_>) {
    let ft_shift = if resolved.shape.is_round() {
        ROUND_FOOTER_SHIFT
    } else {
        0.0
    };
    let main_size = banded_footer_size(resolved.ratio, resolved.shape) - ft_shift;
    let small_size = 16.0;
    let small_color = p.footer_small_text.unwrap_or(p.footer_lines);
    let end_frac = banded_end_line_frac(resolved.ratio);
    let lower_scale = banded_lower_line_scale(resolved.ratio, resolved.shape);

    // Shifted compositions move the whole footer block down a little.
    let vshift = if resolved.shift_up != 0.0 { 0.05 } else { 0.0 };
    let mut vdist = 0.3 + vshift;

    push_text(
        scene,
        &p.content.footer_top,
        FontRole::Script,
        small_size,
        HAlign::Left,
        0.0,
        Point::new(end_frac, vdist),
        small_color,
        8,
        Some(p.popcorn),
    );
    push_divider(scene, frac_to_data_y(frame, vdist) - 0.02, 3.0, 9, p);

    vdist -= 0.075;
    if resolved.ratio != Ratio::R1x1 || resolved.shape == Shape::Circle {
        push_text(
            scene,
            &p.content.footer_main,
            FontRole::Display,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            9,
            None,
        );
    } else {
        // The square family does not fit the title on one line.
        push_text(
            scene,
            &p.content.footer_main_split.0,
            FontRole::Display,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            9,
            None,
        );
        vdist -= 0.08;
        push_text(
            scene,
            &p.content.footer_main_split.1,
            FontRole::Display,
            main_size,
            HAlign::Center,
            0.0,
            Point::new(0.5, vdist),
            p.footer_text,
            8,
            None,
        );
    }

    vdist -= 0.082;
    push_divider(scene, frac_to_data_y(frame, vdist) + 0.02, 3.0, 9, p);
    push_text(
        scene,
        &p.content.footer_bottom,
        FontRole::Script,
        small_size,
        HAlign::Right,
        0.0,
        Point::new(1.0 - end_frac * lower_scale, vdist),
        small_color,
        8,
        Some(p.popcorn),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CanvasExtent;

    fn params<'a>(variant: Variant, content: &'a TextContent) -> (Scene, TextParams<'a>) {
        let mut scene = Scene::new(
            CanvasExtent {
                x0: 0.0,
                x1: 1.0,
                y0: -0.2,
                y1: 0.5,
            },
            (7.5, 6.0),
        );
        let draw = scene.add_region(BezPath::new());
        let footer = scene.add_region(BezPath::new());
        let p = TextParams {
            variant,
            content,
            popcorn: Color::rgb(0.8, 0.7, 0.4),
            header_text: Color::rgb(1.0, 1.0, 1.0),
            header_tag: Color::rgb(0.4, 0.4, 0.4),
            footer_text: Color::rgb(1.0, 1.0, 1.0),
            footer_lines: Color::rgb(0.4, 0.4, 0.4),
            footer_small_text: Some(Color::rgb(0.1, 0.1, 0.1)),
            draw,
            footer,
        };
        (scene, p)
    }

    fn resolved(shape: Shape, ratio: Ratio, shift_up: f64) -> Resolved {
        Resolved {
            shape,
            ratio,
            shift_up,
        }
    }

    fn texts(scene: &Scene) -> Vec<&TextRun> {
        scene
            .prims()
            .iter()
            .filter_map(|p| match &p.shape {
                PrimShape::Text(run) => Some(run),
                _ => None,
            })
            .collect()
    }

    fn tag_bars(scene: &Scene) -> Vec<kurbo::Rect> {
        scene
            .prims()
            .iter()
            .filter(|p| p.z == 6)
            .map(|p| {
                let PrimShape::Path { path, .. } = &p.shape else {
                    panic!("tag must be a path");
                };
                path.bounding_box()
            })
            .collect()
    }

    #[test]
    fn classic_unshifted_has_single_title_line_and_two_dividers() {
        let content = TextContent::default();
        let (mut scene, p) = params(Variant::Classic, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Default, Ratio::R5x4, 0.0),
            &p,
        );
        let runs = texts(&scene);
        // header + top + main + bottom
        assert_eq!(runs.len(), 4);
        assert!(runs.iter().any(|r| r.content == content.footer_main));
        assert!(!runs.iter().any(|r| r.content == content.footer_main_split.0));
        let dividers = scene
            .prims()
            .iter()
            .filter(|pr| {
                matches!(pr.shape, PrimShape::Path { style: PaintStyle::Stroke { .. }, .. })
            })
            .count();
        assert_eq!(dividers, 2);
        assert_eq!(tag_bars(&scene).len(), 1);
    }

    #[test]
    fn classic_shifted_splits_the_title() {
        let content = TextContent::default();
        let (mut scene, p) = params(Variant::Classic, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Square, Ratio::R1x1, 0.04),
            &p,
        );
        let runs = texts(&scene);
        assert_eq!(runs.len(), 5);
        assert!(runs.iter().any(|r| r.content == content.footer_main_split.0));
        assert!(runs.iter().any(|r| r.content == content.footer_main_split.1));
    }

    #[test]
    fn banded_tag_has_four_bars_with_documented_heights() {
        let content = TextContent::club();
        let (mut scene, p) = params(Variant::Banded, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Default, Ratio::R5x4, 0.0),
            &p,
        );
        let bars = tag_bars(&scene);
        assert_eq!(bars.len(), 4);
        assert!((bars[0].height() - TAG_HEIGHT / 2.25).abs() < 1e-12);
        for bar in &bars[1..] {
            assert!((bar.height() - TAG_HEIGHT / 8.0).abs() < 1e-12);
        }
        // Descending, separated by the fixed gap.
        for w in bars.windows(2) {
            assert!((w[0].y0 - w[1].y1 - 0.0075).abs() < 1e-12);
        }
    }

    #[test]
    fn banded_header_is_rotated_script() {
        let content = TextContent::club();
        let (mut scene, p) = params(Variant::Banded, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Default, Ratio::R3x2, 0.0),
            &p,
        );
        let header = texts(&scene)
            .into_iter()
            .find(|r| r.content == content.header)
            .expect("header run");
        assert_eq!(header.font, FontRole::Script);
        assert!((header.rotation_deg - 15.0).abs() < 1e-12);
    }

    #[test]
    fn banded_square_splits_title_but_circle_does_not() {
        let content = TextContent::club();
        let (mut scene, p) = params(Variant::Banded, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Square, Ratio::R1x1, 0.04),
            &p,
        );
        assert!(
            texts(&scene)
                .iter()
                .any(|r| r.content == content.footer_main_split.1)
        );

        let (mut scene, p) = params(Variant::Banded, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Circle, Ratio::R1x1, 0.04),
            &p,
        );
        assert!(
            texts(&scene)
                .iter()
                .any(|r| r.content == content.footer_main)
        );
    }

    #[test]
    fn banded_small_runs_are_edge_aligned() {
        let content = TextContent::club();
        let (mut scene, p) = params(Variant::Banded, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Rectangle, Ratio::R3x1, 0.0),
            &p,
        );
        let runs = texts(&scene);
        let top = runs
            .iter()
            .find(|r| r.content == content.footer_top)
            .unwrap();
        assert_eq!(top.halign, HAlign::Left);
        assert!((top.pos.x - 0.3).abs() < 1e-12);
        let bottom = runs
            .iter()
            .find(|r| r.content == content.footer_bottom)
            .unwrap();
        assert_eq!(bottom.halign, HAlign::Right);
        assert!((bottom.pos.x - (1.0 - 0.3)).abs() < 1e-12);
        assert_eq!(bottom.bbox_fill, Some(p.popcorn));
    }

    #[test]
    fn round_shapes_nudge_the_header_and_shrink_the_footer() {
        let content = TextContent::default();
        let (mut scene, p) = params(Variant::Classic, &content);
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Oval, Ratio::R5x4, 0.04),
            &p,
        );
        let runs = texts(&scene);
        let header = runs.iter().find(|r| r.content == content.header).unwrap();
        assert!((header.pos.x - (1.0 / 3.0 + 0.07)).abs() < 1e-12);
        let main = runs
            .iter()
            .find(|r| r.content == content.footer_main_split.0)
            .unwrap();
        assert!((main.size_pt - 34.0).abs() < 1e-12); // 38 - 4
    }

    #[test]
    fn divider_lines_live_in_data_space_and_clip_to_footer() {
        let content = TextContent::default();
        let (mut scene, p) = params(Variant::Classic, &content);
        let footer = p.footer;
        build(
            &mut scene,
            &Frame::CANONICAL,
            &resolved(Shape::Default, Ratio::R5x4, 0.0),
            &p,
        );
        let first = scene
            .prims()
            .iter()
            .find(|pr| {
                matches!(pr.shape, PrimShape::Path { style: PaintStyle::Stroke { .. }, .. })
            })
            .unwrap();
        assert_eq!(first.space, Space::Data);
        assert_eq!(first.clip, Some(footer));
        let PrimShape::Path { path, .. } = &first.shape else {
            unreachable!();
        };
        let y = path.bounding_box().y0;
        let expected = 0.29 * (0.7 + 2.0 * 0.035) + (-0.2) - 0.035;
        assert!((y - expected).abs() < 1e-12);
    }
}
