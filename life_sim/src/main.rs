// main.rs - Desktop front-end for the Life core
// Editor, renderer and tick loop all share one Guard; see ui.rs for the window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use life_core::{Guard, GridState, SimConfig, codec};

mod ui;

use ui::LifeApp;

#[derive(Parser)]
#[command(name = "life_sim")]
#[command(version)]
#[command(about = "Conway's Game of Life on a wraparound grid")]
struct Cli {
    /// JSON file with start-up settings
    #[arg(long, env = "LIFE_SIM_CONFIG")]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// Delay between ticks in milliseconds
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,

    /// Saved .glconf grid to open at start-up
    #[arg(long)]
    open: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.tick_delay_ms = delay_ms;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;
    let grid = match &cli.open {
        Some(path) => codec::load_file(path)
            .with_context(|| format!("opening {}", path.display()))?,
        None => GridState::new(config.width, config.height)?,
    };
    info!(width = grid.width(), height = grid.height(), "starting simulator");

    // The tick loop lives on this runtime for the whole session
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let app = LifeApp::new(Guard::new(grid), config, runtime);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 950.0]),
        ..Default::default()
    };

    eframe::run_native(
        "LifeSim",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))
}
