//! Incremental bundle sessions keyed by `(mode, build root)`.
//!
//! A `SessionStore` is owned by whoever drives builds (one per long-running
//! host, one per `run_build` call). It holds no lock: two builds must never
//! use the same store concurrently, which `&mut self` enforces.

use super::bundler::{BundleReport, BundleRequest, BundleSession, Bundler};
use modkit_core::config::BuildMode;
use modkit_core::error::{ModkitError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `mode:absoluteBuildRoot`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub mode: BuildMode,
    pub build_root: PathBuf,
}

impl SessionKey {
    pub fn new(mode: BuildMode, build_root: &Path) -> Self {
        Self {
            mode,
            build_root: build_root.to_path_buf(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mode, self.build_root.display())
    }
}

struct SessionEntry {
    signature: String,
    session: Box<dyn BundleSession>,
}

/// Live bundle sessions reused while the entry set is unchanged
#[derive(Default)]
pub struct SessionStore {
    entries: HashMap<SessionKey, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Signature the cached session for `key` was created with
    pub fn signature(&self, key: &SessionKey) -> Option<&str> {
        self.entries.get(key).map(|e| e.signature.as_str())
    }

    /// Rebuild through the session for `key`.
    ///
    /// Reuses the cached session when `signature` matches; otherwise the stale
    /// session is disposed and a fresh one created from `request`.
    pub async fn rebuild(
        &mut self,
        key: SessionKey,
        signature: &str,
        bundler: &dyn Bundler,
        request: &BundleRequest,
    ) -> Result<BundleReport> {
        let cached = self.entries.get(&key).map(|e| e.signature == signature);
        match cached {
            Some(true) => {
                debug!("Reusing incremental session {}", key);
            }
            Some(false) => {
                debug!("Entry set changed, recreating session {}", key);
                self.evict(&key).await;
                self.create(key.clone(), signature, bundler, request).await?;
            }
            None => {
                debug!("Creating incremental session {}", key);
                self.create(key.clone(), signature, bundler, request).await?;
            }
        }

        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| ModkitError::toolchain(format!("no session for {key}")))?;
        entry.session.rebuild().await
    }

    async fn create(
        &mut self,
        key: SessionKey,
        signature: &str,
        bundler: &dyn Bundler,
        request: &BundleRequest,
    ) -> Result<()> {
        let session = bundler.context(request).await?;
        self.entries.insert(
            key,
            SessionEntry {
                signature: signature.to_string(),
                session,
            },
        );
        Ok(())
    }

    /// Dispose and forget the session for `key`, if any
    pub async fn evict(&mut self, key: &SessionKey) -> bool {
        match self.entries.remove(key) {
            Some(mut entry) => {
                debug!("Disposing incremental session {}", key);
                entry.session.dispose().await;
                true
            }
            None => false,
        }
    }

    /// Dispose every live session
    pub async fn dispose_all(&mut self) {
        for (key, mut entry) in self.entries.drain() {
            debug!("Disposing incremental session {}", key);
            entry.session.dispose().await;
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            warn!(
                "{} incremental session(s) dropped without dispose_all()",
                self.entries.len()
            );
        }
    }
}
