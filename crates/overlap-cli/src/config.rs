//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Unit shared by every timestamp in the input.
///
/// Only affects human-readable rendering; evaluation is unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Unix seconds.
    #[default]
    Seconds,
    /// Unix milliseconds.
    Milliseconds,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reject logs whose spans are empty, unsorted or overlapping.
    pub strict: bool,

    /// Unit of input timestamps.
    pub time_unit: TimeUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: true,
            time_unit: TimeUnit::Seconds,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // OVERLAP_STRICT, OVERLAP_TIME_UNIT
        figment = figment.merge(Env::prefixed("OVERLAP_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for overlap.
///
/// On Linux: `~/.config/overlap`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("overlap"))
}
