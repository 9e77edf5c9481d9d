//! Append-only work lists filled by producer steps.
//!
//! Producer steps never perform privileged commands or downloads
//! themselves. They push a description of the work onto an
//! [`Accumulator`], and a later consumer step applies the whole batch at
//! once (one elevated session, one parallel fetch pass).

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ProvisionError, Result};

/// The accumulator lists carried by [`State`](super::State).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulatorKind {
    /// Commands that need elevated privileges.
    AdminCommands,
    /// Files to fetch.
    Downloads,
}

impl AccumulatorKind {
    /// Human-readable list name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            AccumulatorKind::AdminCommands => "admin commands",
            AccumulatorKind::Downloads => "downloads",
        }
    }
}

impl fmt::Display for AccumulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An entry that can check its own shape before being batched.
pub trait Validate {
    /// Returns a message describing the problem, if any.
    fn problem(&self) -> Option<String>;
}

/// A list that only grows.
///
/// Entries cannot be removed or replaced: a consumer sees every entry
/// pushed by every producer that ran before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator<T> {
    kind: AccumulatorKind,
    entries: Vec<T>,
}

impl<T> Accumulator<T> {
    /// Create an empty list of the given kind.
    pub fn new(kind: AccumulatorKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Which list this is.
    pub fn kind(&self) -> AccumulatorKind {
        self.kind
    }

    /// Entries in push order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Iterate entries in push order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Validate> Accumulator<T> {
    /// Validate and append an entry.
    pub fn push(&mut self, entry: T) -> Result<()> {
        if let Some(message) = entry.problem() {
            return Err(ProvisionError::Validation {
                list: self.kind.label(),
                index: self.entries.len(),
                message,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Re-check every entry before a consumer acts on the batch.
    pub fn validate(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(message) = entry.problem() {
                return Err(ProvisionError::Validation {
                    list: self.kind.label(),
                    index,
                    message,
                });
            }
        }
        Ok(())
    }
}

impl<'a, T> IntoIterator for &'a Accumulator<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Validate for String {
    fn problem(&self) -> Option<String> {
        if self.trim().is_empty() {
            Some("command is empty".to_string())
        } else if self.contains('\0') {
            Some("command contains a NUL byte".to_string())
        } else if self.contains('\n') || self.contains('\r') {
            Some("command spans multiple lines; queue each line separately".to_string())
        } else {
            None
        }
    }
}

/// A file a producer step wants fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    /// Source URL.
    pub url: String,
    /// Where the consumer should write the file.
    pub destination: String,
    /// Expected SHA-256 of the payload, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Download {
    /// Create a download without a checksum.
    pub fn new(url: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            sha256: None,
        }
    }

    /// Attach an expected SHA-256 checksum.
    pub fn with_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.sha256 = Some(sha256.into());
        self
    }

    /// Check a fetched payload against the expected checksum.
    ///
    /// Always true when no checksum was declared.
    pub fn verify(&self, payload: &[u8]) -> bool {
        match &self.sha256 {
            None => true,
            Some(expected) => {
                let actual = hex::encode(Sha256::digest(payload));
                actual.eq_ignore_ascii_case(expected.trim())
            }
        }
    }
}

impl Validate for Download {
    fn problem(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() {
            return Some("download url is empty".to_string());
        }
        if !["http://", "https://", "file://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Some(format!("unsupported url scheme in '{}'", url));
        }
        if self.destination.trim().is_empty() {
            return Some(format!("no destination for '{}'", url));
        }
        if let Some(sha) = &self.sha256 {
            match hex::decode(sha.trim()) {
                Ok(bytes) if bytes.len() == 32 => {}
                _ => return Some(format!("'{}' is not a sha256 hex digest", sha)),
            }
        }
        None
    }
}
