//! Configuration defaults and environment overrides
//!
//! Defaults live in constant modules; every tunable can be overridden from
//! the environment, and the CLI overrides the environment in turn.

use std::time::Duration;

use crate::mapper::{MapperConfig, UnsupportedTagPolicy};
use crate::resolver::RetryPolicy;

/// Default constants
pub mod defaults {
    /// Lookup attempts per tag group before giving up
    pub const RETRY_ATTEMPTS: u32 = 50;
    /// Fixed delay between lookup attempts
    pub const RETRY_DELAY_MS: u64 = 100;
    /// Default log filter
    pub const LOG_FILTER: &str = "assetgen=info";
    /// Default output directory
    pub const OUTPUT_DIR: &str = ".";
}

/// Environment variable names
pub mod env_vars {
    pub const RETRY_ATTEMPTS: &str = "ASSETGEN_RETRY_ATTEMPTS";
    pub const RETRY_DELAY_MS: &str = "ASSETGEN_RETRY_DELAY_MS";
    pub const KEEP_UNSUPPORTED: &str = "ASSETGEN_KEEP_UNSUPPORTED";
    pub const LOG_JSON: &str = "ASSETGEN_LOG_JSON";
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Lookup attempts from the environment, or the default.
pub fn retry_attempts() -> u32 {
    env_parse(env_vars::RETRY_ATTEMPTS).unwrap_or(defaults::RETRY_ATTEMPTS)
}

/// Retry delay from the environment, or the default.
pub fn retry_delay() -> Duration {
    Duration::from_millis(env_parse(env_vars::RETRY_DELAY_MS).unwrap_or(defaults::RETRY_DELAY_MS))
}

/// Whether unsupported tags should be kept (`true`/`false`).
pub fn keep_unsupported() -> bool {
    env_parse(env_vars::KEEP_UNSUPPORTED).unwrap_or(false)
}

/// Whether JSON log output is requested.
pub fn log_json() -> bool {
    env_parse(env_vars::LOG_JSON).unwrap_or(false)
}

/// Mapper configuration assembled from defaults and the environment.
pub fn mapper_config_from_env() -> MapperConfig {
    MapperConfig {
        retry: RetryPolicy::new(retry_attempts(), retry_delay()),
        unsupported: if keep_unsupported() {
            UnsupportedTagPolicy::Keep
        } else {
            UnsupportedTagPolicy::Drop
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, defaults::RETRY_ATTEMPTS);
        assert_eq!(policy.delay, Duration::from_millis(defaults::RETRY_DELAY_MS));
        // 49 sleeps between 50 attempts
        assert_eq!(policy.worst_case_delay(), Duration::from_millis(4900));
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        assert_eq!(env_parse::<u32>("ASSETGEN_TEST_UNSET_VARIABLE"), None);
    }
}
