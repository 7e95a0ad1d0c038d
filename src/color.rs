use serde::{Deserialize, Serialize};

/// A color role value: either a concrete sRGB color or the transparent
/// sentinel. The sentinel renders as alpha-0 white so layer geometry stays
/// identical whether or not a layer is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgba { r: f64, g: f64, b: f64, a: f64 },
    Transparent,
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgba { r, g, b, a }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        parse_hex(s)
    }

    pub fn is_transparent(self) -> bool {
        match self {
            Self::Transparent => true,
            Self::Rgba { a, .. } => a <= 0.0,
        }
    }

    /// Resolve to straight (non-premultiplied) RGBA bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        match self {
            Self::Transparent => [255, 255, 255, 0],
            Self::Rgba { r, g, b, a } => [to_u8(r), to_u8(g), to_u8(b), to_u8(a)],
        }
    }

    /// Hex form used by the markup backends (`#rrggbb`, alpha handled
    /// separately via opacity attributes).
    pub fn to_hex_rgb(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn alpha(self) -> f64 {
        match self {
            Self::Transparent => 0.0,
            Self::Rgba { a, .. } => a.clamp(0.0, 1.0),
        }
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            Self::Transparent => serializer.serialize_str("transparent"),
            Self::Rgba { .. } => {
                let [r, g, b, a] = self.to_rgba8();
                if a == 255 {
                    serializer.serialize_str(&format!("#{r:02x}{g:02x}{b:02x}"))
                } else {
                    serializer.serialize_str(&format!("#{r:02x}{g:02x}{b:02x}{a:02x}"))
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) if s.trim().eq_ignore_ascii_case("transparent") => Ok(Self::Transparent),
            Repr::Str(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::rgba(v[0], v[1], v[2], 1.0))
                } else if v.len() == 4 {
                    Ok(Self::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        6 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            (r, g, b, 255)
        }
        8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = hex_byte(&s[6..8])?;
            (r, g, b, a)
        }
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Color::rgba(
        (r as f64) / 255.0,
        (g as f64) / 255.0,
        (b as f64) / 255.0,
        (a as f64) / 255.0,
    ))
}
