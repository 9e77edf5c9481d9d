//! Configuration file loading.

use std::fs;
use std::path::Path;

use crate::config::env_layer::EnvLayer;
use crate::config::schema::RunConfig;
use crate::error::{ProvisionError, Result};
use crate::platform::Platform;

/// Environment variable overriding [`RunConfig::platform`].
pub const PLATFORM_VAR: &str = "RIGUP_PLATFORM";

/// Environment variable overriding [`RunConfig::dry_run`].
pub const DRY_RUN_VAR: &str = "RIGUP_DRY_RUN";

/// Load a single config file and parse it into a [`RunConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ProvisionError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProvisionError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`RunConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<RunConfig> {
    if content.trim().is_empty() {
        return Ok(RunConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `RIGUP_*` overrides from an environment layer.
pub fn apply_env_overrides(mut config: RunConfig, env: &EnvLayer) -> Result<RunConfig> {
    if let Some(value) = env.get(PLATFORM_VAR) {
        let platform = value
            .parse::<Platform>()
            .map_err(|e| ProvisionError::InvalidConfigValue {
                key: PLATFORM_VAR.to_string(),
                message: e.to_string(),
            })?;
        config.platform = Some(platform);
    }

    if let Some(value) = env.get(DRY_RUN_VAR) {
        config.dry_run = parse_flag(value).ok_or_else(|| ProvisionError::InvalidConfigValue {
            key: DRY_RUN_VAR.to_string(),
            message: format!("expected true or false, got '{}'", value),
        })?;
    }

    Ok(config)
}

/// Load a config file, then apply overrides from the process environment.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let config = load_config_file(path)?;
    apply_env_overrides(config, &EnvLayer::from_system())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
