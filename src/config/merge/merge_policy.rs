//! Merge rules: built-in defaults that every later source overrides.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_REPOSITORY_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("repository.base_url", DEFAULT_REPOSITORY_URL)?
        .set_default(
            "repository.connect_timeout_secs",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?
        .set_default(
            "repository.request_timeout_secs",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )
}
