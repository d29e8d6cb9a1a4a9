use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod platform;
pub mod records;
pub mod resolver;
pub mod textnorm;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::Platform;
pub use records::{CommenterMap, PostRecord, ProfileRecord};
pub use resolver::{normalize_username, resolve, username_for};
pub use textnorm::normalize;

/// Errors raised while loading or validating application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingEnvVar(String),
    #[error("environment variable {var} has an invalid value: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
