//! pcbkit CLI - inspect a Gerber/Excellon fabrication archive
//!
//! Builds the layered board model and prints a per-layer summary, or the
//! whole model as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use pcbkit::{
    init_logging_with, load_board_from_path, Config, LayerGeometry, LayerHint, LogFormat,
    PcbModelGeometry, SettingsPersistence, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "pcbkit")]
#[command(about = "Turn a Gerber/Excellon zip archive into layered board geometry", long_about = None)]
struct Cli {
    /// Zip archive with Gerber and drill files
    archive: PathBuf,

    /// Config file (.toml or .json); defaults to the per-user config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board thickness in mm
    #[arg(short, long)]
    thickness: Option<f64>,

    /// Force a layer role for matching files, e.g. "*.art=top_copper"
    #[arg(long = "hint", value_name = "PATTERN=ROLE")]
    hints: Vec<LayerHint>,

    /// Union overlapping shapes on each copper layer
    #[arg(long)]
    merge_copper: bool,

    /// Cut drill holes out of copper layers
    #[arg(long)]
    cut_holes: bool,

    /// Print the full model as JSON
    #[arg(long)]
    json: bool,

    /// Emit log events as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match SettingsPersistence::load_default() {
            Ok(settings) => settings.into_config(),
            Err(e) => {
                debug!("Using default config: {}", e);
                Config::default()
            }
        },
    };

    if let Some(thickness) = cli.thickness {
        config = config.with_thickness(thickness);
    }
    config.prepend_hints(cli.hints.iter().cloned());
    config.board.merge_copper |= cli.merge_copper;
    config.board.cut_drill_holes |= cli.cut_holes;
    config.validate().context("invalid settings")?;
    Ok(config)
}

fn layer_line(layer: &LayerGeometry) -> String {
    let area: f64 = layer.polygons.iter().map(|p| p.area()).sum();
    format!(
        "  {:<40} {:>6} polygons {:>12.3} mm²",
        layer.layer_id(),
        layer.polygons.len(),
        area
    )
}

fn print_summary(model: &PcbModelGeometry) {
    println!(
        "Board {:.3} x {:.3} mm, {:.2} mm thick",
        model.width_mm, model.height_mm, model.thickness_mm
    );
    if let Some(b) = &model.bounds {
        println!(
            "Extent ({:.3}, {:.3}) .. ({:.3}, {:.3})",
            b.min_x, b.min_y, b.max_x, b.max_y
        );
    }
    println!("Layers:");
    for layer in model.layers() {
        println!("{}", layer_line(layer));
    }
    let plated = model.drills.iter().filter(|h| h.plated).count();
    println!(
        "Drills: {} ({} plated, {} non-plated)",
        model.drills.len(),
        plated,
        model.drills.len() - plated
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    })?;
    debug!("pcbkit {} built {}", VERSION, BUILD_DATE);

    let config = load_config(&cli)?;
    let model = load_board_from_path(&cli.archive, &config)
        .await
        .with_context(|| format!("reading {}", cli.archive.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print_summary(&model);
    }
    Ok(())
}
