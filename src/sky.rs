//! Sky builder: a solid background or top-down horizontal stripes.
//!
//! Stripes are laid out in canvas space. Their height depends on the stripe
//! count through empirical denominators chosen so the stripes visually fill
//! the frame even though the silhouette does not reach y=0 exactly; the
//! breakpoints at 4 and 6 colors are layout data, not a formula to derive.

use kurbo::{Rect, Shape as _};

use crate::config::Sky;
use crate::scene::{PaintStyle, PrimShape, Primitive, RegionId, Scene, Space};

fn stripe_denom(count: usize) -> f64 {
    let n = count as f64;
    if count < 4 {
        n + 0.9
    } else if count < 6 {
        n + 1.9
    } else {
        n + 2.5
    }
}

pub fn build(scene: &mut Scene, sky: &Sky, shift_up: f64, clip: RegionId) {
    let colors = sky.colors();
    let mut push = |rect: Rect, color| {
        scene.push(Primitive {
            shape: PrimShape::Path {
                path: rect.to_path(1e-9),
                style: PaintStyle::Fill,
            },
            color,
            z: 0,
            clip: Some(clip),
            space: Space::Canvas,
        });
    };

    if let [color] = colors {
        push(Rect::new(0.0, 0.0, 1.0, 1.0), *color);
        return;
    }

    let height = (1.0 - shift_up) / stripe_denom(colors.len());
    for (count, color) in colors.iter().enumerate() {
        let y0 = 1.0 - (count as f64 + 1.0) * height;
        push(Rect::new(0.0, y0, 1.0, y0 + height), *color);
    }
}
