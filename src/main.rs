//! Masonry layout previewer - Entry Point

use clap::{Parser, ValueEnum};
use masonry_layout::config::{self, ResolvedConfig};
use masonry_layout::model::{AppError, ColumnCount};
use masonry_layout::scene::{self, Scene};
use masonry_layout::{integration, logging, view};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Viewport width used for headless output when `--width` is not given.
const DEFAULT_HEADLESS_WIDTH_PX: f64 = 1024.0;

/// What `masonry` prints or shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Interactive terminal preview
    Tui,
    /// Settled frame as JSON
    Json,
    /// Settled styles as CSS
    Css,
}

/// Balanced masonry layout - preview a scene or print its settled layout
#[derive(Parser, Debug)]
#[command(name = "masonry")]
#[command(version)]
#[command(about = "Lay out items in height-balanced columns")]
pub struct Args {
    /// Path to a JSON scene (uses the built-in demo scene if not provided)
    pub file: Option<PathBuf>,

    /// Number of columns
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: Option<u16>,

    /// Spacing between items, in theme units
    #[arg(short, long, value_parser = parse_spacing)]
    pub spacing: Option<f64>,

    /// Viewport width in px for json/css output
    #[arg(short, long, value_parser = parse_width)]
    pub width: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tui)]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_spacing(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(format!("spacing must be a non-negative number, got '{raw}'")),
    }
}

fn parse_width(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(format!("width must be a non-negative number of px, got '{raw}'")),
    }
}

/// Defaults → Config File → Env Vars. Scene props and CLI args follow in `run`.
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    Ok(config::apply_env_overrides(merged))
}

fn load_scene(args: &Args) -> Result<Scene, AppError> {
    match &args.file {
        Some(path) => Ok(scene::load_scene(path)?),
        None => Ok(Scene::demo()),
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = resolve_config(&args)?;

    logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let mut scene = load_scene(&args)?;
    info!(items = scene.items.len(), "Scene loaded");

    // Scene props sit between the environment and the CLI flags.
    config.props = std::mem::take(&mut scene.props).apply(config.props);
    let config =
        config::apply_cli_overrides(config, args.columns.map(ColumnCount::new), args.spacing);

    match args.format {
        OutputFormat::Tui => view::run_with_scene(scene, &config)?,
        format => {
            let width = args.width.unwrap_or(DEFAULT_HEADLESS_WIDTH_PX);
            let settled = integration::settle(scene, &config, width);
            if let Some(reason) = &settled.deferred {
                info!(%reason, "Layout not committed; printing previous frame");
            }
            let output = match format {
                OutputFormat::Css => settled.frame.to_css(".masonry", &config.breakpoints),
                _ => serde_json::to_string_pretty(&settled.frame)? + "\n",
            };
            std::io::stdout().lock().write_all(output.as_bytes())?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Args::parse())?;
    Ok(())
}
