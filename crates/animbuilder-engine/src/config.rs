//! Builder configuration.
//!
//! Asset location, host resolution, tick rate and preview settings.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "animbuilder.toml";

/// Builder configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Directory sprite paths are resolved against
    pub base_directory: PathBuf,
    /// Host resolution used to center windows
    pub resolution: (u32, u32),
    /// Length of one host tick in milliseconds
    pub tick_ms: u64,
    /// Sprite used for the pointer (None = null cursor)
    pub cursor_sprite: Option<PathBuf>,
    /// TOML file with extra window layouts
    pub layouts_file: Option<PathBuf>,
    /// Default tracing filter directive
    pub log_filter: String,
    /// Scale applied to tick time in the animation preview
    pub preview_time_scale: f32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("assets"),
            resolution: (1280, 720),
            tick_ms: 16,
            cursor_sprite: None,
            layouts_file: None,
            log_filter: "animbuilder=info".to_string(),
            preview_time_scale: animbuilder_tools::PREVIEW_TIME_SCALE,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    #[allow(dead_code)]
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.resolution.0 = self.resolution.0.clamp(320, 7680);
        self.resolution.1 = self.resolution.1.clamp(240, 4320);
        self.tick_ms = self.tick_ms.clamp(1, 1000);

        if self.preview_time_scale.is_finite() {
            self.preview_time_scale = self.preview_time_scale.clamp(0.0, 10.0);
        } else {
            self.preview_time_scale = animbuilder_tools::PREVIEW_TIME_SCALE;
        }
    }

    /// Length of one host tick.
    #[must_use]
    pub fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}
