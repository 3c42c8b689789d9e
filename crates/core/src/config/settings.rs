//! Build settings resolved from environment variables.

use super::constants;
use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Build,
    Publish,
    Test,
}

impl BuildMode {
    /// Lower-case and validate an override; anything unrecognized is `Build`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("publish") => Self::Publish,
            Some("test") => Self::Test,
            _ => Self::Build,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Publish => "publish",
            Self::Test => "test",
        }
    }

    pub fn is_publish(&self) -> bool {
        matches!(self, Self::Publish)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every environment-driven knob of a build, parsed once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub mode: BuildMode,
    pub skip_typecheck: bool,
    pub sourcemap_opt_in: bool,
    pub diagnostic_limit: Option<usize>,
    pub min_severity: Severity,
    pub quiet_cache: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::from_env(&HashMap::new())
    }
}

impl BuildSettings {
    pub fn from_env(env: &HashMap<String, String>) -> Self {
        let get = |key: &str| env.get(key).map(String::as_str);
        Self {
            mode: BuildMode::parse(get(constants::ENV_MODE)),
            skip_typecheck: is_truthy(get(constants::ENV_SKIP_TYPECHECK)),
            sourcemap_opt_in: is_truthy(get(constants::ENV_SOURCEMAP)),
            diagnostic_limit: get(constants::ENV_DIAGNOSTIC_LIMIT)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|limit| *limit > 0),
            min_severity: Severity::parse_min(get(constants::ENV_LOG_LEVEL)),
            quiet_cache: is_truthy(get(constants::ENV_QUIET_CACHE)),
        }
    }

    /// Snapshot of the process environment
    pub fn from_process_env() -> Self {
        Self::from_env(&std::env::vars().collect())
    }

    /// Whether the type-check pass runs. Publish always checks.
    pub fn should_typecheck(&self) -> bool {
        self.mode.is_publish() || !self.skip_typecheck
    }

    /// Sourcemaps are on outside publish, opt-in for publish
    pub fn sourcemaps(&self) -> bool {
        !self.mode.is_publish() || self.sourcemap_opt_in
    }

    /// Compiler diagnostic cap, with a smaller default for watch mode
    pub fn diagnostic_limit(&self, watch: bool) -> usize {
        self.diagnostic_limit.unwrap_or(if watch {
            constants::DEFAULT_WATCH_DIAGNOSTIC_LIMIT
        } else {
            constants::DEFAULT_DIAGNOSTIC_LIMIT
        })
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}
