pub mod app_config;
pub mod config;
pub mod platform;
pub mod stats;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::Platform;
pub use stats::{SocialHandles, SocialStats, SocialStatsReport, FALLBACK_FOLLOWERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("scraper delay range is inverted: min {min_ms}ms > max {max_ms}ms")]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },
}
