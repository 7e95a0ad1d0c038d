#![forbid(unsafe_code)]

pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod fonts;
pub mod frame;
pub mod generate;
pub mod mountain;
pub mod outline;
pub mod popcorn;
pub mod render;
pub mod render_cpu;
pub mod render_eps;
pub mod render_svg;
pub mod scene;
pub mod sky;
pub mod text_layout;

pub use color::Color;
pub use compose::compose;
pub use config::{
    LogoConfig, Marker, OutputFormat, Palette, Ratio, Shape, Sky, TextContent, Variant,
};
pub use error::{PeaklineError, PeaklineResult};
pub use fonts::FontLibrary;
pub use generate::{generate, generate_in, generate_with_config};
pub use render::{RenderBackend, create_backend};
pub use scene::Scene;
