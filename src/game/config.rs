use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::grid::Grid;

/// Smallest playable grid edge
pub const MIN_GRID_SIZE: usize = 5;

/// Timing parameters for the autopilot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// How long the "engaging" popup freezes the game before the autopilot takes over
    pub engaging_delay_ms: u64,
    /// Lower bound of the randomized time from activation to malfunction
    pub crash_delay_min_ms: u64,
    /// Upper bound of the randomized time from activation to malfunction
    pub crash_delay_max_ms: u64,
    /// Minimum time between two fresh autopilot decisions
    pub decision_interval_ms: u64,
    /// Allow the player to switch off a malfunctioning autopilot
    pub allow_malfunction_override: bool,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            engaging_delay_ms: 2000,
            crash_delay_min_ms: 1000,
            crash_delay_max_ms: 5000,
            decision_interval_ms: 50,
            allow_malfunction_override: false,
        }
    }
}

impl AutopilotConfig {
    pub fn engaging_delay(&self) -> Duration {
        Duration::from_millis(self.engaging_delay_ms)
    }

    pub fn decision_interval(&self) -> Duration {
        Duration::from_millis(self.decision_interval_ms)
    }

    /// Config with a fixed crash delay, mostly useful in tests
    pub fn with_fixed_crash_delay(mut self, delay_ms: u64) -> Self {
        self.crash_delay_min_ms = delay_ms;
        self.crash_delay_max_ms = delay_ms;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.crash_delay_min_ms > self.crash_delay_max_ms {
            return Err(format!(
                "crash_delay_min_ms ({}) cannot exceed crash_delay_max_ms ({})",
                self.crash_delay_min_ms, self.crash_delay_max_ms
            ));
        }

        if self.decision_interval_ms == 0 {
            return Err("decision_interval_ms must be at least 1".to_string());
        }

        Ok(())
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per item
    pub score_increment: u32,
    /// Time between moves at the start of a session
    pub initial_move_interval_ms: u64,
    /// How much faster the snake gets per item
    pub speed_step_ms: u64,
    /// Fastest allowed move interval
    pub min_move_interval_ms: u64,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
    pub autopilot: AutopilotConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            score_increment: 10,
            initial_move_interval_ms: 150,
            speed_step_ms: 5,
            min_move_interval_ms: 50,
            seed: None,
            autopilot: AutopilotConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn initial_move_interval(&self) -> Duration {
        Duration::from_millis(self.initial_move_interval_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    pub fn min_move_interval(&self) -> Duration {
        Duration::from_millis(self.min_move_interval_ms)
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err` with a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < MIN_GRID_SIZE || self.grid_height < MIN_GRID_SIZE {
            return Err(format!(
                "grid must be at least {MIN_GRID_SIZE}x{MIN_GRID_SIZE}, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_width / 2 {
            return Err(format!(
                "initial_snake_length must be in 1..={}, got {}",
                self.grid_width / 2,
                self.initial_snake_length
            ));
        }

        if self.min_move_interval_ms == 0 {
            return Err("min_move_interval_ms must be at least 1".to_string());
        }

        if self.initial_move_interval_ms < self.min_move_interval_ms {
            return Err(format!(
                "initial_move_interval_ms ({}) cannot be below min_move_interval_ms ({})",
                self.initial_move_interval_ms, self.min_move_interval_ms
            ));
        }

        self.autopilot.validate()
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their default values. The result is validated.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .validate()
            .map_err(|msg| anyhow!("Invalid config in {:?}: {}", path, msg))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save_json_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_move_interval(), Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.grid(), Grid::new(15, 12));
    }

    #[test]
    fn test_validation_grid_too_small() {
        assert!(GameConfig::new(4, 10).validate().is_err());
        assert!(GameConfig::new(10, 4).validate().is_err());
    }

    #[test]
    fn test_validation_snake_length() {
        let mut config = GameConfig::small();
        config.initial_snake_length = 0;
        assert!(config.validate().is_err());

        config.initial_snake_length = 6;
        assert!(config.validate().is_err());

        config.initial_snake_length = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_intervals() {
        let mut config = GameConfig::default();
        config.min_move_interval_ms = 200;
        assert!(config.validate().is_err());

        config.min_move_interval_ms = 0;
        config.initial_move_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_crash_delay_range() {
        let mut config = GameConfig::default();
        config.autopilot.crash_delay_min_ms = 6000;
        assert!(config.validate().is_err());

        config.autopilot = AutopilotConfig::default().with_fixed_crash_delay(3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = GameConfig::new(12, 9).with_seed(7);
        config.save_json_file(&path).unwrap();

        let loaded = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.json");
        fs::write(&path, r#"{ "grid_width": 12, "autopilot": { "engaging_delay_ms": 500 } }"#)
            .unwrap();

        let loaded = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.grid_width, 12);
        assert_eq!(loaded.grid_height, 20);
        assert_eq!(loaded.autopilot.engaging_delay_ms, 500);
        assert_eq!(loaded.autopilot.crash_delay_max_ms, 5000);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, r#"{ "grid_width": 2 }"#).unwrap();

        let err = GameConfig::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
