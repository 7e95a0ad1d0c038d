use std::{collections::BTreeMap, fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use peakline::{Color, LogoConfig, Marker, OutputFormat, Palette, Ratio, Shape, Sky, TextContent};

#[derive(Parser, Debug)]
#[command(name = "peakline", version, about = "Two-mountain institutional logo generator")]
struct Cli {
    /// Output filename under `<root>/images/`. Defaults to `logo.<format>`.
    #[arg(long)]
    out: Option<String>,

    /// Outline shape: default, circle, oval, square, rectangle,
    /// rounded_rectangle, rounded_square.
    #[arg(long, default_value = "default")]
    shape: String,

    /// Aspect ratio: 3:2, 5:4, 1:1 or 3:1.
    #[arg(long, default_value = "5:4")]
    ratio: String,

    /// Output format: png, svg or eps.
    #[arg(long, default_value = "png")]
    format: String,

    /// Raster resolution (PNG only).
    #[arg(long, default_value_t = 1200)]
    dpi: u32,

    /// Dot marker: circle or star.
    #[arg(long, default_value = "circle")]
    marker: String,

    /// Logo variant.
    #[arg(long, value_enum, default_value_t = VariantChoice::Classic)]
    variant: VariantChoice,

    /// Theme JSON file mapping color roles to hex strings.
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Use the club text content instead of the department's.
    #[arg(long)]
    club: bool,

    /// Project root; fonts are read from `<root>/fonts` and output goes
    /// to `<root>/images`.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Classic,
    Banded,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let colors = match &cli.theme {
        Some(path) => read_theme(path)?,
        None => default_palette(),
    };

    let mut config = LogoConfig::new(colors);
    config.shape = Shape::parse(&cli.shape)?;
    config.ratio = Ratio::parse(&cli.ratio)?;
    config.format = OutputFormat::parse(&cli.format)?;
    config.dpi = cli.dpi;
    config.marker = Marker::from_name(&cli.marker);
    config.variant = match cli.variant {
        VariantChoice::Classic => peakline::Variant::Classic,
        VariantChoice::Banded => peakline::Variant::Banded,
    };
    if cli.club {
        config.text = TextContent::club();
    }

    let filename = cli
        .out
        .unwrap_or_else(|| format!("logo.{}", config.format.extension()));
    let path = peakline::generate_with_config(&cli.root, &filename, &config)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn read_theme(path: &PathBuf) -> anyhow::Result<Palette> {
    let f = File::open(path).with_context(|| format!("open theme '{}'", path.display()))?;
    let map: BTreeMap<String, serde_json::Value> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse theme JSON")?;
    Ok(Palette::from_map(&map)?)
}

/// The gray-and-gold department theme.
fn default_palette() -> Palette {
    let hex = |s: &str| Color::from_hex(s).expect("static hex literal");
    Palette {
        popcorn: hex("#D4B773"),
        mountain_edge: hex("#636363"),
        mountain_snow: hex("#FFFFFF"),
        border: hex("#636363"),
        border_contrast: hex("#FFFFFF"),
        header_tag: hex("#636363"),
        header_text: hex("#FFFFFF"),
        footer_lines: hex("#636363"),
        footer_text: hex("#FFFFFF"),
        footer_small_text: Some(hex("#636363")),
        sky: Sky::Solid(hex("#ADF7FF")),
    }
}
