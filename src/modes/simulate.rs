//! Headless autopilot runs
//!
//! Each run starts a fresh session, engages the autopilot on the first tick
//! and drives the session clock with a fixed frame length until the session
//! ends. Results are aggregated into [`SimulationStats`].
//!
//! # Example
//!
//! ```rust
//! use fsd_snake::game::GameConfig;
//! use fsd_snake::modes::{SimulateConfig, SimulateMode};
//!
//! let mut config = SimulateConfig::new(3, GameConfig::small().with_seed(7));
//! config.log_frequency = 0;
//!
//! let stats = SimulateMode::new(config).run_all();
//! assert_eq!(stats.runs(), 3);
//! ```

use anyhow::Result;
use std::time::Duration;

use crate::game::{GameConfig, GameSession, SessionEnd};
use crate::metrics::SimulationStats;

/// Configuration for simulate mode
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    /// Number of sessions to run
    pub runs: usize,

    /// Simulated wall-clock time per tick
    pub frame: Duration,

    /// Sessions still running after this many ticks are quit
    pub max_ticks: u64,

    /// Print progress every N runs (0 disables)
    pub log_frequency: usize,

    /// Game configuration; a seed is offset by the run index
    pub game_config: GameConfig,
}

impl SimulateConfig {
    pub fn new(runs: usize, game_config: GameConfig) -> Self {
        Self {
            runs,
            frame: Duration::from_millis(16),
            max_ticks: 200_000,
            log_frequency: 10,
            game_config,
        }
    }
}

pub struct SimulateMode {
    config: SimulateConfig,
    stats: SimulationStats,
}

impl SimulateMode {
    pub fn new(config: SimulateConfig) -> Self {
        Self {
            config,
            stats: SimulationStats::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        let stats = self.run_all();

        println!("\nSimulation complete!");
        println!("{}", stats.format_summary());

        Ok(())
    }

    /// Run every configured session and return the aggregated statistics
    pub fn run_all(&mut self) -> SimulationStats {
        for run in 0..self.config.runs {
            let (end, ticks) = self.run_session(run);
            tracing::debug!(
                run,
                score = end.score,
                cause = end.cause.as_str(),
                autopilot = end.autopilot.as_str(),
                ticks,
                "run finished"
            );
            self.stats.record(&end, ticks);

            if self.config.log_frequency > 0 && (run + 1) % self.config.log_frequency == 0 {
                self.print_progress(run + 1);
            }
        }

        self.stats.clone()
    }

    fn run_session(&self, run: usize) -> (SessionEnd, u64) {
        let mut config = self.config.game_config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(run as u64));

        let mut session = GameSession::new(config);
        session.on_toggle_autopilot();

        while session.ticks() < self.config.max_ticks {
            if let Some(end) = session.on_tick(self.config.frame) {
                return (end, session.ticks());
            }
        }

        tracing::warn!(run, max_ticks = self.config.max_ticks, "tick cap reached");
        (session.quit(), session.ticks())
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        println!("Simulating {} autopilot runs", self.config.runs);
        println!(
            "Grid: {}x{} | Frame: {}ms | Crash delay: {}-{}ms",
            game.grid_width,
            game.grid_height,
            self.config.frame.as_millis(),
            game.autopilot.crash_delay_min_ms,
            game.autopilot.crash_delay_max_ms
        );
    }

    fn print_progress(&self, runs: usize) {
        println!(
            "[{}/{}] mean score {:.1} | max {} | malfunction crashes {}",
            runs,
            self.config.runs,
            self.stats.mean_score(),
            self.stats.max_score(),
            self.stats.malfunction_crashes()
        );
    }
}
