//! Logo configuration: shapes, ratios, color palette, validation and the
//! two sanctioned canonicalizations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{PeaklineError, PeaklineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Default,
    Rectangle,
    Square,
    Oval,
    Circle,
    RoundedRectangle,
    RoundedSquare,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Default,
        Shape::Rectangle,
        Shape::Square,
        Shape::Oval,
        Shape::Circle,
        Shape::RoundedRectangle,
        Shape::RoundedSquare,
    ];

    pub fn parse(s: &str) -> PeaklineResult<Self> {
        match s {
            "default" => Ok(Self::Default),
            "rectangle" => Ok(Self::Rectangle),
            "square" => Ok(Self::Square),
            "oval" => Ok(Self::Oval),
            "circle" => Ok(Self::Circle),
            "rounded_rectangle" => Ok(Self::RoundedRectangle),
            "rounded_square" => Ok(Self::RoundedSquare),
            other => Err(PeaklineError::configuration(format!(
                "shape '{other}' is not valid; use one of default, rectangle, square, oval, \
                 circle, rounded_rectangle, rounded_square"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Rectangle => "rectangle",
            Self::Square => "square",
            Self::Oval => "oval",
            Self::Circle => "circle",
            Self::RoundedRectangle => "rounded_rectangle",
            Self::RoundedSquare => "rounded_square",
        }
    }

    /// Circular shapes shift header text and shrink footer font sizes.
    pub fn is_round(self) -> bool {
        matches!(self, Self::Circle | Self::Oval)
    }

    pub fn family(self) -> ShapeFamily {
        match self {
            Self::Oval | Self::Circle => ShapeFamily::Ellipse,
            Self::Rectangle | Self::Square => ShapeFamily::Rectangle,
            Self::RoundedRectangle | Self::RoundedSquare => ShapeFamily::Rounded,
            Self::Default => ShapeFamily::Parabolic,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outline shape family; each family produces the same four-layer region
/// structure (footer clip, draw outline, inner/contrast/outer borders) from
/// its own primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFamily {
    Ellipse,
    Rectangle,
    Rounded,
    Parabolic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ratio {
    #[serde(rename = "3:2")]
    R3x2,
    #[serde(rename = "5:4")]
    R5x4,
    #[serde(rename = "1:1")]
    R1x1,
    #[serde(rename = "3:1")]
    R3x1,
}

impl Ratio {
    pub fn parse(s: &str) -> PeaklineResult<Self> {
        match s {
            "3:2" => Ok(Self::R3x2),
            "5:4" => Ok(Self::R5x4),
            "1:1" => Ok(Self::R1x1),
            "3:1" => Ok(Self::R3x1),
            other => Err(PeaklineError::configuration(format!(
                "ratio '{other}' is not valid; use one of 3:2, 5:4, 1:1, 3:1"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::R3x2 => "3:2",
            Self::R5x4 => "5:4",
            Self::R1x1 => "1:1",
            Self::R3x1 => "3:1",
        }
    }

    /// Horizontal border-width scale keeping border proportions even across
    /// non-square frames.
    pub fn border_scale_x(self) -> f64 {
        match self {
            Self::R3x2 => 2.0 / 3.0,
            Self::R5x4 => 4.0 / 5.0,
            Self::R3x1 => 1.0 / 3.0,
            Self::R1x1 => 1.0,
        }
    }

    /// Slope of the parabolic top/bottom edges of the default shape.
    pub fn parabola_slope(self) -> f64 {
        match self {
            Self::R3x2 => 0.3,
            Self::R5x4 => 0.2,
            Self::R1x1 | Self::R3x1 => 0.15,
        }
    }

    /// Horizontal compression applied to mountains and popcorn points so the
    /// banner does not stretch the silhouette.
    pub fn silhouette_scale_x(self) -> f64 {
        match self {
            Self::R3x1 => 0.75,
            _ => 1.0,
        }
    }

    /// Horizontal compression applied to the rectangle-family footer clip at
    /// banner ratio so footer text stays out of the narrow margins.
    pub fn footer_clip_scale_x(self) -> f64 {
        match self {
            Self::R3x1 => 0.85,
            _ => 1.0,
        }
    }

    /// Physical output size in inches for the banded variant; the classic
    /// variant doubles it.
    pub fn base_size_in(self) -> (f64, f64) {
        match self {
            Self::R3x2 => (9.0, 6.0),
            Self::R5x4 => (7.5, 6.0),
            Self::R1x1 => (6.0, 6.0),
            Self::R3x1 => (18.0, 6.0),
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Png,
    Svg,
    Eps,
}

impl OutputFormat {
    pub fn parse(s: &str) -> PeaklineResult<Self> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "eps" => Ok(Self::Eps),
            other => Err(PeaklineError::configuration(format!(
                "output format '{other}' is not valid; only png, svg and eps are accepted"
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Eps => "eps",
        }
    }
}

/// Glyph used for the popcorn point markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Star,
}

impl Marker {
    /// Parse a marker glyph name. Unrecognized glyphs are a compatibility
    /// warning, not an error: generation proceeds with circles.
    pub fn from_name(name: &str) -> Self {
        match name {
            "o" | "circle" => Self::Circle,
            "*" | "star" => Self::Star,
            other => {
                tracing::warn!(marker = other, "unrecognized marker glyph, using circles");
                Self::Circle
            }
        }
    }
}

/// Which text treatment the logo carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Single header bar, centered footer with divider lines.
    #[default]
    Classic,
    /// Four-stripe header tag, rotated script header, left/right aligned
    /// small footer runs. Requires the `footer_small_text` color role.
    Banded,
}

/// Sky background: a single fill or ordered top-to-bottom stripes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sky {
    Solid(Color),
    Stripes(Vec<Color>),
}

impl Sky {
    pub fn colors(&self) -> &[Color] {
        match self {
            Self::Solid(c) => std::slice::from_ref(c),
            Self::Stripes(v) => v.as_slice(),
        }
    }
}

/// Named color roles of the logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub popcorn: Color,
    pub mountain_edge: Color,
    pub mountain_snow: Color,
    pub border: Color,
    pub border_contrast: Color,
    pub header_tag: Color,
    pub header_text: Color,
    pub footer_lines: Color,
    pub footer_text: Color,
    /// Only required by the banded variant.
    #[serde(default)]
    pub footer_small_text: Option<Color>,
    pub sky: Sky,
}

const PALETTE_ROLES: [&str; 10] = [
    "popcorn",
    "mountain_edge",
    "mountain_snow",
    "border",
    "border_contrast",
    "header_tag",
    "header_text",
    "footer_lines",
    "footer_text",
    "sky",
];

impl Palette {
    /// Build a palette from a role-name map (the scripting-style entry
    /// point). Every role except `footer_small_text` is required.
    pub fn from_map(map: &BTreeMap<String, serde_json::Value>) -> PeaklineResult<Self> {
        for role in PALETTE_ROLES {
            if !map.contains_key(role) {
                return Err(PeaklineError::configuration(format!(
                    "missing required color role '{role}'"
                )));
            }
        }
        for key in map.keys() {
            if !PALETTE_ROLES.contains(&key.as_str()) && key != "footer_small_text" {
                tracing::warn!(role = %key, "unknown color role ignored");
            }
        }
        let value = serde_json::Value::Object(map.clone().into_iter().collect());
        serde_json::from_value(value)
            .map_err(|e| PeaklineError::configuration(format!("invalid palette: {e}")))
    }
}

/// Text content of the logo; defaults carry the department wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub header: String,
    pub footer_main: String,
    /// First/second line of the footer title when it is split.
    pub footer_main_split: (String, String),
    pub footer_top: String,
    pub footer_bottom: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            header: "CU Denver".to_owned(),
            footer_main: "Mathematical and Statistical Sciences".to_owned(),
            footer_main_split: (
                "Mathematical and Statistical".to_owned(),
                "Sciences".to_owned(),
            ),
            footer_top: "Department of".to_owned(),
            footer_bottom: "Est. 1987".to_owned(),
        }
    }
}

impl TextContent {
    /// Content used by the banded (club) flavor.
    pub fn club() -> Self {
        Self {
            header: "CU Denver".to_owned(),
            footer_main: "Math and Stats Club".to_owned(),
            footer_main_split: ("Math and".to_owned(), "Stats Club".to_owned()),
            footer_top: "Department of Mathematical".to_owned(),
            footer_bottom: "and Statistical Sciences".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoConfig {
    pub shape: Shape,
    pub ratio: Ratio,
    pub colors: Palette,
    #[serde(default = "default_marker")]
    pub marker: Marker,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub text: TextContent,
}

fn default_marker() -> Marker {
    Marker::Circle
}

fn default_dpi() -> u32 {
    1200
}

fn default_format() -> OutputFormat {
    OutputFormat::Png
}

impl LogoConfig {
    pub fn new(colors: Palette) -> Self {
        Self {
            shape: Shape::Default,
            ratio: Ratio::R5x4,
            colors,
            marker: default_marker(),
            dpi: default_dpi(),
            format: default_format(),
            variant: Variant::Classic,
            text: TextContent::default(),
        }
    }

    /// Validate and canonicalize, producing the resolved shape/ratio pair
    /// and the derived vertical shift. Fails fast; never coerces except the
    /// two sanctioned canonicalizations.
    pub fn resolve(&self) -> PeaklineResult<Resolved> {
        // The banner check runs on the raw input, before canonicalization:
        // 3:1 with a square is rejected, not coerced to 1:1.
        if self.ratio == Ratio::R3x1 && self.shape != Shape::Rectangle {
            return Err(PeaklineError::configuration(format!(
                "3:1 is banner size and cannot be used with shape '{}'; only 'rectangle' is valid",
                self.shape
            )));
        }
        if self.dpi == 0 {
            return Err(PeaklineError::configuration("dpi must be > 0"));
        }
        if self.colors.sky.colors().is_empty() {
            return Err(PeaklineError::configuration(
                "sky stripe list must contain at least one color",
            ));
        }
        if self.variant == Variant::Banded && self.colors.footer_small_text.is_none() {
            return Err(PeaklineError::configuration(
                "the banded variant requires the 'footer_small_text' color role",
            ));
        }

        let mut shape = self.shape;
        let mut ratio = self.ratio;

        // Square is a 1:1 rectangle, circle a 1:1 oval; force the pairing.
        if matches!(shape, Shape::Square | Shape::Circle | Shape::RoundedSquare) {
            ratio = Ratio::R1x1;
        }
        if shape == Shape::Oval && ratio == Ratio::R1x1 {
            shape = Shape::Circle;
        }
        if shape == Shape::Rectangle && ratio == Ratio::R1x1 {
            shape = Shape::Square;
        }

        // The whole composition shifts up for 1:1, and for the 5:4 oval,
        // to balance visual weight against the taller header.
        let shift_up = if ratio == Ratio::R1x1 || (ratio == Ratio::R5x4 && shape == Shape::Oval) {
            0.04
        } else {
            0.0
        };

        Ok(Resolved {
            shape,
            ratio,
            shift_up,
        })
    }
}

/// Canonicalized shape/ratio pair plus the derived vertical shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub shape: Shape,
    pub ratio: Ratio,
    pub shift_up: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_palette() -> Palette {
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
        let mut c = LogoConfig::new(test_palette());
        c.shape = shape;
        c.ratio = ratio;
        c
    }

    #[test]
    fn square_family_forces_unit_ratio() {
        for shape in [Shape::Square, Shape::Circle, Shape::RoundedSquare] {
            for ratio in [Ratio::R3x2, Ratio::R5x4, Ratio::R1x1] {
                let r = config(shape, ratio).resolve().unwrap();
                assert_eq!(r.ratio, Ratio::R1x1, "{shape} @ {ratio}");
            }
        }
    }

    #[test]
    fn unit_ratio_canonicalizes_oval_and_rectangle() {
        let r = config(Shape::Oval, Ratio::R1x1).resolve().unwrap();
        assert_eq!(r.shape, Shape::Circle);
        let r = config(Shape::Rectangle, Ratio::R1x1).resolve().unwrap();
        assert_eq!(r.shape, Shape::Square);
        // Non-1:1 oval stays an oval.
        let r = config(Shape::Oval, Ratio::R5x4).resolve().unwrap();
        assert_eq!(r.shape, Shape::Oval);
    }

    #[test]
    fn banner_requires_rectangle() {
        assert!(config(Shape::Oval, Ratio::R3x1).resolve().is_err());
        assert!(config(Shape::Square, Ratio::R3x1).resolve().is_err());
        assert!(config(Shape::Default, Ratio::R3x1).resolve().is_err());
        let r = config(Shape::Rectangle, Ratio::R3x1).resolve().unwrap();
        assert_eq!(r.shape, Shape::Rectangle);
        assert_eq!(r.ratio, Ratio::R3x1);
    }

    #[test]
    fn shift_up_rule() {
        assert_eq!(config(Shape::Square, Ratio::R1x1).resolve().unwrap().shift_up, 0.04);
        assert_eq!(config(Shape::Oval, Ratio::R5x4).resolve().unwrap().shift_up, 0.04);
        assert_eq!(config(Shape::Default, Ratio::R5x4).resolve().unwrap().shift_up, 0.0);
        assert_eq!(config(Shape::Rectangle, Ratio::R3x1).resolve().unwrap().shift_up, 0.0);
    }

    #[test]
    fn banded_variant_needs_small_text_role() {
        let mut c = config(Shape::Default, Ratio::R5x4);
        c.variant = Variant::Banded;
        assert!(c.resolve().is_err());
        c.colors.footer_small_text = Some(Color::rgb(0.0, 0.0, 0.0));
        assert!(c.resolve().is_ok());
    }

    #[test]
    fn palette_from_map_requires_every_role() {
        let full: BTreeMap<String, serde_json::Value> = serde_json::from_value(
            serde_json::to_value(test_palette()).unwrap(),
        )
        .unwrap();
        assert!(Palette::from_map(&full).is_ok());

        let mut missing = full.clone();
        missing.remove("sky");
        let err = Palette::from_map(&missing).unwrap_err();
        assert!(err.to_string().contains("sky"));
    }

    #[test]
    fn ratio_strings_roundtrip() {
        for r in [Ratio::R3x2, Ratio::R5x4, Ratio::R1x1, Ratio::R3x1] {
            assert_eq!(Ratio::parse(r.as_str()).unwrap(), r);
        }
        assert!(Ratio::parse("9:9").is_err());
    }

    #[test]
    fn unknown_marker_falls_back_to_circle() {
        assert_eq!(Marker::from_name("o"), Marker::Circle);
        assert_eq!(Marker::from_name("*"), Marker::Star);
        assert_eq!(Marker::from_name("hexagon?"), Marker::Circle);
    }
}
