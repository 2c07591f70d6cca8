// Configuration module for reading Snake.toml
// Values are read once at startup and stay fixed for the lifetime of the process.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::bots::BotKind;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub bots: BotsConfig,
    pub driver: DriverConfig,
    pub debug: DebugConfig,
}

/// Play area size in cells. Perfect play by BruteBot needs an even height.
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
}

/// Delay between simulation steps in the headless driver
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub default_tick_delay_ms: u64,
    pub max_tick_delay_ms: u64,
}

impl TimingConfig {
    /// Clamps a requested delay to the configured maximum
    pub fn clamp_delay_ms(&self, requested: u64) -> u64 {
        requested.min(self.max_tick_delay_ms)
    }
}

/// Bot selection
#[derive(Debug, Deserialize, Clone)]
pub struct BotsConfig {
    pub default_bot: String,
}

impl BotsConfig {
    pub fn default_kind(&self) -> Result<BotKind, String> {
        self.default_bot.parse()
    }
}

/// Headless run limits
#[derive(Debug, Deserialize, Clone)]
pub struct DriverConfig {
    pub games: usize,
    /// Cap on moves per game so bots that cycle forever still finish
    pub max_moves_per_game: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed and validated configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Checks values that would make the simulation impossible to run
    pub fn validate(&self) -> Result<(), String> {
        if self.grid.width <= 0 || self.grid.height <= 0 {
            return Err(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width, self.grid.height
            ));
        }
        if i64::from(self.grid.width) * i64::from(self.grid.height) < 2 {
            return Err("Grid needs at least two cells".to_string());
        }
        if self.timing.default_tick_delay_ms > self.timing.max_tick_delay_ms {
            return Err(format!(
                "Default tick delay {}ms exceeds maximum {}ms",
                self.timing.default_tick_delay_ms, self.timing.max_tick_delay_ms
            ));
        }
        if self.driver.max_moves_per_game == 0 {
            return Err("max_moves_per_game must be at least 1".to_string());
        }
        self.bots.default_kind()?;
        Ok(())
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                width: 20,
                height: 20,
            },
            timing: TimingConfig {
                default_tick_delay_ms: 50,
                max_tick_delay_ms: 100,
            },
            bots: BotsConfig {
                default_bot: "spacer".to_string(),
            },
            driver: DriverConfig {
                games: 1,
                max_moves_per_game: 100_000,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_debug.jsonl".to_string(),
            },
        }
    }

    /// Loads `path`, or the hardcoded defaults when the file does not exist
    ///
    /// # Returns
    /// * `Err` if the file exists but cannot be read, parsed or validated
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "Config file {} not found, using hardcoded defaults",
                path.display()
            );
            return Ok(Self::default_hardcoded());
        }
        Self::from_file(path)
    }

    /// Loads Snake.toml from the project root, falling back to hardcoded defaults only
    /// when the file is missing
    pub fn load_or_default() -> Result<Self, String> {
        Self::from_file_or_default("Snake.toml")
    }
}
