//! Runtime configuration
//!
//! Built-in defaults, optionally overridden by a JSON file, then by
//! command-line flags.

use crate::control::{ControlScheme, MovementSettings};
use crate::stage::RoomLighting;
use crate::view::RoomOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub control_scheme: ControlScheme,
    pub room_lighting: RoomLighting,
    pub move_speed: f32,
    pub interaction_radius: f32,
    pub floor_bound: f32,
    pub drag_sensitivity: f32,
    pub default_action_ms: u64,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for LabConfig {
    fn default() -> Self {
        let movement = MovementSettings::default();
        Self {
            control_scheme: ControlScheme::default(),
            room_lighting: RoomLighting::default(),
            move_speed: movement.speed,
            interaction_radius: 8.0,
            floor_bound: movement.bound,
            drag_sensitivity: movement.drag_sensitivity,
            default_action_ms: 2000,
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Command-line overrides.
#[derive(Debug, Clone, Default, clap::Parser)]
#[command(author, version, about = "Virtual science lab", long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Room control scheme
    #[arg(long, value_enum)]
    pub scheme: Option<ControlScheme>,

    /// Light the room with a ceiling grid of lamps
    #[arg(long)]
    pub bright: bool,

    /// Window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height
    #[arg(long)]
    pub height: Option<u32>,
}

impl LabConfig {
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    /// Defaults, then the file named by `--config`, then the flags.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(scheme) = cli.scheme {
            self.control_scheme = scheme;
        }
        if cli.bright {
            self.room_lighting = RoomLighting::Bright;
        }
        if let Some(width) = cli.width {
            self.window_width = width;
        }
        if let Some(height) = cli.height {
            self.window_height = height;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_speed > 0.0) {
            return Err(ConfigError::Invalid("move_speed must be positive".into()));
        }
        if !(self.interaction_radius > 0.0) {
            return Err(ConfigError::Invalid("interaction_radius must be positive".into()));
        }
        if !(self.floor_bound > 0.0) {
            return Err(ConfigError::Invalid("floor_bound must be positive".into()));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        Ok(())
    }

    pub fn default_action_duration(&self) -> Duration {
        Duration::from_millis(self.default_action_ms)
    }

    pub fn room_options(&self) -> RoomOptions {
        RoomOptions {
            scheme: self.control_scheme,
            lighting: self.room_lighting,
            movement: MovementSettings {
                speed: self.move_speed,
                bound: self.floor_bound,
                drag_sensitivity: self.drag_sensitivity,
            },
            interaction_radius: self.interaction_radius,
        }
    }
}
