//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ice_api::{DEFAULT_SCHEDULE_API_URL, DEFAULT_SHIFT_API_URL, DEFAULT_TIMEOUT, Endpoints};
use ice_core::{EndFallback, ReconcileConfig};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Length of a period in seconds.
    pub period_seconds: u32,

    /// Start minute from which a shift with no end closes at the period
    /// boundary.
    pub final_minutes_threshold: u32,

    /// Periods the boundary fallback applies to.
    pub end_fallback: EndFallback,

    /// Base URL of the shift chart API.
    pub shift_api_url: String,

    /// Base URL of the schedule API.
    pub schedule_api_url: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let reconcile = ReconcileConfig::default();
        Self {
            period_seconds: reconcile.period_seconds,
            final_minutes_threshold: reconcile.final_minutes_threshold,
            end_fallback: reconcile.end_fallback,
            shift_api_url: DEFAULT_SHIFT_API_URL.to_string(),
            schedule_api_url: DEFAULT_SCHEDULE_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
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

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ICE_*)
        figment = figment.merge(Env::prefixed("ICE_"));

        figment.extract()
    }

    pub const fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            period_seconds: self.period_seconds,
            final_minutes_threshold: self.final_minutes_threshold,
            end_fallback: self.end_fallback,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            shift_api_url: self.shift_api_url.clone(),
            schedule_api_url: self.schedule_api_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Returns the platform-specific config directory for ice.
///
/// On Linux: `~/.config/ice`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ice"))
}
