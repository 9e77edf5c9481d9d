//! Platform tokens and handler dispatch.
//!
//! Every step carries a [`HandlerTable`] keyed by [`HandlerKey`]. At run
//! time the table is asked for the handler matching the host [`Platform`]:
//! an exact platform entry wins, otherwise the `all` entry, otherwise none.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating systems a step can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Darwin,
    Linux,
    Win32,
}

impl Platform {
    /// All known platforms.
    pub const ALL: [Platform; 3] = [Platform::Darwin, Platform::Linux, Platform::Win32];

    /// Detect the platform this binary was built for.
    ///
    /// Returns `None` on targets outside the known set (e.g. the BSDs).
    pub fn current() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Platform::Darwin)
        } else if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else if cfg!(target_os = "windows") {
            Some(Platform::Win32)
        } else {
            None
        }
    }

    /// The token used in step definitions and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Darwin => "darwin",
            Platform::Linux => "linux",
            Platform::Win32 => "win32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown platform token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform '{0}' (expected darwin, linux or win32)")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "darwin" | "macos" => Ok(Platform::Darwin),
            "linux" => Ok(Platform::Linux),
            "win32" | "windows" => Ok(Platform::Win32),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// Key of a handler entry: the fallback `all` or one specific platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerKey {
    All,
    Only(Platform),
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKey::All => f.write_str("all"),
            HandlerKey::Only(platform) => platform.fmt(f),
        }
    }
}

impl From<Platform> for HandlerKey {
    fn from(platform: Platform) -> Self {
        HandlerKey::Only(platform)
    }
}

/// Per-platform handler variants of a single step.
#[derive(Debug, Clone)]
pub struct HandlerTable<H> {
    all: Option<H>,
    by_platform: BTreeMap<Platform, H>,
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self {
            all: None,
            by_platform: BTreeMap::new(),
        }
    }
}

impl<H> HandlerTable<H> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler for `key`, replacing any previous one.
    pub fn insert(&mut self, key: HandlerKey, handler: H) {
        match key {
            HandlerKey::All => self.all = Some(handler),
            HandlerKey::Only(platform) => {
                self.by_platform.insert(platform, handler);
            }
        }
    }

    /// Select the handler for `platform`: exact match, then `all`, then none.
    pub fn select(&self, platform: Platform) -> Option<(HandlerKey, &H)> {
        if let Some(handler) = self.by_platform.get(&platform) {
            return Some((HandlerKey::Only(platform), handler));
        }
        self.all.as_ref().map(|handler| (HandlerKey::All, handler))
    }

    /// The `all` handler, if any.
    pub fn fallback(&self) -> Option<&H> {
        self.all.as_ref()
    }

    /// Keys that have a handler, `all` first.
    pub fn keys(&self) -> Vec<HandlerKey> {
        let mut keys = Vec::with_capacity(self.len());
        if self.all.is_some() {
            keys.push(HandlerKey::All);
        }
        keys.extend(self.by_platform.keys().copied().map(HandlerKey::Only));
        keys
    }

    /// Number of handler entries.
    pub fn len(&self) -> usize {
        self.by_platform.len() + usize::from(self.all.is_some())
    }

    /// Check if the table has no handler at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_tokens_and_aliases() {
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Darwin);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("win32".parse::<Platform>().unwrap(), Platform::Win32);
        assert!("all".parse::<Platform>().is_err());
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_display_matches_token() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn platform_deserializes_from_yaml() {
        let platform: Platform = serde_yaml::from_str("win32").unwrap();
        assert_eq!(platform, Platform::Win32);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn current_platform_on_linux() {
        assert_eq!(Platform::current(), Some(Platform::Linux));
    }

    #[test]
    fn exact_match_wins_over_all() {
        let mut table = HandlerTable::new();
        table.insert(HandlerKey::All, "generic");
        table.insert(HandlerKey::Only(Platform::Darwin), "mac");

        assert_eq!(
            table.select(Platform::Darwin),
            Some((HandlerKey::Only(Platform::Darwin), &"mac"))
        );
        assert_eq!(
            table.select(Platform::Linux),
            Some((HandlerKey::All, &"generic"))
        );
    }

    #[test]
    fn no_match_without_all() {
        let mut table = HandlerTable::new();
        table.insert(Platform::Win32.into(), "windows");

        assert!(table.select(Platform::Linux).is_none());
        assert!(table.select(Platform::Win32).is_some());
        assert!(table.fallback().is_none());
    }

    #[test]
    fn keys_list_all_first() {
        let mut table = HandlerTable::new();
        table.insert(HandlerKey::Only(Platform::Linux), 1);
        table.insert(HandlerKey::All, 0);

        assert_eq!(
            table.keys(),
            vec![HandlerKey::All, HandlerKey::Only(Platform::Linux)]
        );
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert!(HandlerTable::<u8>::new().is_empty());
    }
}
