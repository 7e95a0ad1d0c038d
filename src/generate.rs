//! Top level entry points: configuration in, file on disk out.
//!
//! Rendering happens fully in memory and the output file is written with a
//! single `fs::write`, so a failed render never leaves a partial file.

use std::path::{Path, PathBuf};

use crate::compose;
use crate::config::{LogoConfig, Marker, OutputFormat, Palette, Ratio, Shape};
use crate::error::{PeaklineError, PeaklineResult};
use crate::fonts::FontLibrary;
use crate::render::create_backend;

/// Render a logo into `images/<filename>` under the current directory.
///
/// String arguments follow the accepted spellings of [`Shape::parse`],
/// [`Ratio::parse`] and [`OutputFormat::parse`]. A filename extension that
/// disagrees with `format` is only warned about; the format argument wins.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    filename: &str,
    colors: Palette,
    ratio: &str,
    shape: &str,
    dpi: u32,
    marker: &str,
    format: &str,
) -> PeaklineResult<PathBuf> {
    generate_in(Path::new("."), filename, colors, ratio, shape, dpi, marker, format)
}

/// Like [`generate`] but rooted at an explicit directory. Fonts are looked
/// up under `<root>/fonts` and output lands under `<root>/images`.
#[allow(clippy::too_many_arguments)]
pub fn generate_in(
    root: &Path,
    filename: &str,
    colors: Palette,
    ratio: &str,
    shape: &str,
    dpi: u32,
    marker: &str,
    format: &str,
) -> PeaklineResult<PathBuf> {
    let mut config = LogoConfig::new(colors);
    config.shape = Shape::parse(shape)?;
    config.ratio = Ratio::parse(ratio)?;
    config.format = OutputFormat::parse(format)?;
    config.dpi = dpi;
    config.marker = Marker::from_name(marker);
    generate_with_config(root, filename, &config)
}

/// Render a fully assembled configuration into `<root>/images/<filename>`.
/// `filename` may carry subdirectories; they are created as needed.
pub fn generate_with_config(
    root: &Path,
    filename: &str,
    config: &LogoConfig,
) -> PeaklineResult<PathBuf> {
    check_extension(filename, config.format);

    let scene = compose::compose(config)?;
    let fonts = FontLibrary::new(root.join("fonts"));
    let mut backend = create_backend(config.format, fonts);
    let bytes = backend.render(&scene, config.dpi)?;

    let out_path = root.join("images").join(filename);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PeaklineError::resource(format!(
                "cannot create output directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    std::fs::write(&out_path, &bytes).map_err(|e| {
        PeaklineError::resource(format!("cannot write {}: {e}", out_path.display()))
    })?;
    tracing::info!(
        path = %out_path.display(),
        bytes = bytes.len(),
        "logo written"
    );
    Ok(out_path)
}

fn check_extension(filename: &str, format: OutputFormat) {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if ext.as_deref() != Some(format.extension()) {
        tracing::warn!(
            filename,
            format = format.extension(),
            "filename extension does not match the output format"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::Sky;

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

    #[test]
    fn bad_ratio_string_fails_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_in(
            dir.path(),
            "logo.svg",
            palette(),
            "4:3",
            "oval",
            100,
            "circle",
            "svg",
        )
        .unwrap_err();
        assert!(err.to_string().contains("configuration error"));
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn nested_filename_creates_the_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let path = generate_in(
            dir.path(),
            "navy/logo.svg",
            palette(),
            "5:4",
            "oval",
            100,
            "circle",
            "svg",
        )
        .unwrap();
        assert_eq!(path, dir.path().join("images/navy/logo.svg"));
        assert!(path.is_file());
    }
}
