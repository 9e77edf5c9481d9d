//! Run configuration loading.
//!
//! - Schema definition in [`schema`]
//! - File loading and environment overrides in [`loader`]
//! - Environment variable capture in [`env_layer`]
//!
//! # Example
//!
//! ```
//! use rigup::config::load_config_file;
//! use rigup::platform::Platform;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("rigup.yml");
//! fs::write(&path, "platform: linux\nsettings:\n  user: dev").unwrap();
//!
//! let config = load_config_file(&path).unwrap();
//! assert_eq!(config.platform, Some(Platform::Linux));
//! assert_eq!(config.setting_str("user"), Some("dev"));
//! ```

pub mod env_layer;
pub mod loader;
pub mod schema;

pub use env_layer::EnvLayer;
pub use loader::{
    apply_env_overrides, load_config, load_config_file, parse_config, DRY_RUN_VAR, PLATFORM_VAR,
};
pub use schema::RunConfig;
