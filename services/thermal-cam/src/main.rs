//! Thermal camera viewer.
//!
//! Renders a 32x24 thermal sensor as a full-screen false-color image:
//! - Seven upscaling strategies and a configurable palette list
//! - Optional edge-preserving filter and status overlay
//! - Keyboard control through configurable key bindings
//!
//! This binary drives the viewer with a synthetic sensor and a headless
//! display that can dump every presented frame as PNG.

mod headless;
mod synthetic;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use headless::{parse_key_script, HeadlessDisplay};
use synthetic::SyntheticSensor;
use viewer::{RenderLoop, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "thermal-cam")]
#[command(about = "False-color viewer for a 32x24 thermal sensor")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "THERMAL_CONFIG")]
    config: Option<PathBuf>,

    /// Display width in pixels (overrides configuration)
    #[arg(long)]
    width: Option<u32>,

    /// Display height in pixels (overrides configuration)
    #[arg(long)]
    height: Option<u32>,

    /// Stop after this many iterations
    #[arg(long)]
    frames: Option<u64>,

    /// Comma-separated key presses, one per iteration (e.g. "d,,w,esc")
    #[arg(long)]
    keys: Option<String>,

    /// Write every presented frame as PNG into this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Sensor refresh rate in Hz (1, 2, 4, 8...); 0 disables pacing
    #[arg(long, default_value = "4")]
    refresh_hz: f32,

    /// Inject a transient sensor fault every n pulls
    #[arg(long)]
    fault_every: Option<u64>,

    /// Seed for the synthetic sensor noise
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    info!("Starting thermal camera viewer");

    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    config.apply_env();
    if let Some(width) = args.width {
        config.display.width = width;
    }
    if let Some(height) = args.height {
        config.display.height = height;
    }
    config.validate().context("Invalid viewer configuration")?;

    let keys = match &args.keys {
        Some(script) => parse_key_script(script).context("Invalid --keys script")?,
        None => Vec::new(),
    };

    if let Some(dir) = &args.snapshot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
    }

    let sensor = SyntheticSensor::new(args.refresh_hz, args.fault_every, args.seed);
    let display = HeadlessDisplay::new(args.snapshot_dir.clone(), keys);

    let mut viewer =
        RenderLoop::new(&config, sensor, display).context("Failed to start viewer")?;

    let stats = viewer.run_for(args.frames);

    info!(
        frames = stats.frames_presented,
        mean_temp_c = viewer.mean_temperature(),
        transient_faults = stats.transient_faults,
        "Thermal camera viewer finished"
    );

    Ok(())
}
