use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use fsd_snake::game::GameConfig;
use fsd_snake::modes::{PlayMode, SimulateConfig, SimulateMode};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsd_snake")]
#[command(version, about = "Snake with a self-driving autopilot that is bound to crash")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// RNG seed for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (play mode logs nothing without it)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Number of sessions in simulate mode
    #[arg(long, default_value = "100")]
    runs: usize,

    /// Simulated frame length in milliseconds for simulate mode
    #[arg(long, default_value = "16")]
    frame_ms: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play in the terminal with keyboard controls
    Play,
    /// Run the autopilot headless and print statistics
    Simulate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.mode, cli.log_file.as_deref())?;

    let config = build_config(&cli)?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config);
            play_mode.run().await?;
        }
        Mode::Simulate => {
            if cli.frame_ms == 0 {
                return Err(anyhow!("--frame-ms must be at least 1"));
            }
            let mut simulate_config = SimulateConfig::new(cli.runs, config);
            simulate_config.frame = Duration::from_millis(cli.frame_ms);

            let mut simulate_mode = SimulateMode::new(simulate_config);
            simulate_mode.run()?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    Ok(config)
}

/// The terminal UI owns stderr in play mode, so logs only go to a file there
fn init_tracing(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    // per-session info lines would drown the simulation summary
    let default_level = match (mode, log_file) {
        (Mode::Simulate, None) => "warn",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (Mode::Simulate, None) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        (Mode::Play, None) => {}
    }

    Ok(())
}
