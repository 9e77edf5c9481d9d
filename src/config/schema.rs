//! Run configuration schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Read-only configuration for one provisioning run.
///
/// ```yaml
/// platform: darwin
/// dry_run: false
/// settings:
///   hosts_file: /etc/hosts
///   tools: [node, docker]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Platform to dispatch handlers for. Defaults to the host platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Resolve and report the plan without invoking any handler.
    pub dry_run: bool,

    /// Free-form values steps can read.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, serde_yaml::Value>,
}

impl RunConfig {
    /// The platform handlers are selected for.
    ///
    /// `None` when no override is set and the host is not a known platform.
    pub fn effective_platform(&self) -> Option<Platform> {
        self.platform.or_else(Platform::current)
    }

    /// Look up a setting.
    pub fn setting(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.settings.get(key)
    }

    /// Look up a string setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}
