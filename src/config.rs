/*!
 * Configuration
 * Runtime settings with defaults and environment overrides
 *
 * Environment variables:
 * - MULTIPASS_DATA_DIR: data directory (default: plugins/Multipass)
 * - MULTIPASS_DEFAULT_GROUP: implied group for users without known groups
 * - MULTIPASS_WORLD_POLICY: `overlay` or `underlay`
 * - MULTIPASS_CACHE_SIZE: maximum cached resolutions (0 disables caching)
 */

use crate::core::limits::{DEFAULT_DATA_DIR, DEFAULT_GROUP_NAME, DEFAULT_RESOLUTION_CACHE_SIZE};
use crate::permissions::WorldPolicy;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "MULTIPASS_DATA_DIR";
pub const ENV_DEFAULT_GROUP: &str = "MULTIPASS_DEFAULT_GROUP";
pub const ENV_WORLD_POLICY: &str = "MULTIPASS_WORLD_POLICY";
pub const ENV_CACHE_SIZE: &str = "MULTIPASS_CACHE_SIZE";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Unset the variable to fall back to the default.")
    )]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Multipass settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MultipassConfig {
    pub data_dir: PathBuf,
    pub default_group: String,
    pub world_policy: WorldPolicy,
    pub cache_size: usize,
}

impl Default for MultipassConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_group: DEFAULT_GROUP_NAME.to_string(),
            world_policy: WorldPolicy::default(),
            cache_size: DEFAULT_RESOLUTION_CACHE_SIZE,
        }
    }
}

impl MultipassConfig {
    /// Defaults overridden by any MULTIPASS_* variables that are set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MultipassConfig::from_env`] with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(group) = lookup(ENV_DEFAULT_GROUP) {
            let group = group.trim();
            if group.is_empty() {
                return Err(invalid(ENV_DEFAULT_GROUP, group, "must not be empty"));
            }
            config.default_group = group.to_string();
        }

        if let Some(policy) = lookup(ENV_WORLD_POLICY) {
            config.world_policy = policy
                .parse()
                .map_err(|reason: String| invalid(ENV_WORLD_POLICY, &policy, &reason))?;
        }

        if let Some(size) = lookup(ENV_CACHE_SIZE) {
            config.cache_size = size
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(ENV_CACHE_SIZE, &size, &e.to_string()))?;
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
