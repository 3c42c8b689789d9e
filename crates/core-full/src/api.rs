// Public build API for core-full

use crate::context::{BuildContext, Toolchain, CONTEXT, SESSIONS};
use crate::pipeline::build_pipeline;
use crate::toolchain::SessionStore;
use crate::workspace::Workspace;
use modkit_core::artifact::ArtifactRecord;
use modkit_core::config::BuildSettings;
use modkit_core::error::ModkitError;
use modkit_core::manifest::ModuleManifest;
use modkit_core::pipeline::keys::{ARTIFACTS, ENTRY_POINTS, MANIFEST};
use modkit_core::pipeline::PipeMap;
use modkit_core::{Diagnostic, Diagnostics};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Build configuration for core-full
#[derive(Clone, Debug, Default)]
pub struct BuildOptions {
    root: PathBuf,
    env: Option<HashMap<String, String>>,
    incremental: bool,
}

impl BuildOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Use `env` instead of the process environment
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Set one variable, starting from an empty map when none was supplied
    pub fn set_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    pub fn settings(&self) -> BuildSettings {
        match &self.env {
            Some(env) => BuildSettings::from_env(env),
            None => BuildSettings::from_process_env(),
        }
    }
}

/// Manifest section of a build result
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    /// Build-root-relative entry files
    pub entry_points: Vec<String>,
    pub static_assets: Vec<String>,
    /// Severity-filtered diagnostics
    pub diagnostics: Vec<Diagnostic>,
    pub module: ModuleManifest,
}

/// Build output
#[derive(Clone, Debug, Serialize)]
pub struct BuildResult {
    pub artifacts: Vec<ArtifactRecord>,
    pub manifest: BuildManifest,
}

/// A fatal build error plus the diagnostics recorded before it.
///
/// The message is generic; the detail (compiler output, type-check output)
/// lives in `diagnostics`.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct BuildFailure {
    pub source: ModkitError,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildFailure {
    pub fn new(source: impl Into<ModkitError>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            source: source.into(),
            diagnostics,
        }
    }
}

/// Owns the incremental sessions for a sequence of builds.
///
/// Builds through one `Builder` run one at a time (`&mut self`); call
/// [`Builder::shutdown`] before dropping it to dispose live sessions.
#[derive(Default)]
pub struct Builder {
    toolchain: Option<Toolchain>,
    sessions: SessionStore,
    watch: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default esbuild/tsc/node toolchain
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    /// Builds driven by a watcher use the smaller diagnostic cap and leave
    /// type checking to the watch checker
    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn build(&mut self, options: &BuildOptions) -> Result<BuildResult, BuildFailure> {
        let workspace =
            Workspace::resolve(options.root()).map_err(|e| BuildFailure::new(e, Vec::new()))?;
        let settings = options.settings();
        let min_severity = settings.min_severity;
        let toolchain = self
            .toolchain
            .clone()
            .unwrap_or_else(|| Toolchain::for_workspace(&workspace));
        info!(
            "Building {} ({} mode{})",
            workspace.root.display(),
            settings.mode,
            if options.is_incremental() { ", incremental" } else { "" }
        );

        let context = BuildContext::new(workspace, settings, toolchain)
            .incremental(options.is_incremental())
            .watch(self.watch);

        let mut data = PipeMap::new();
        data.insert_typed(CONTEXT, context);
        data.insert_typed(SESSIONS, std::mem::take(&mut self.sessions));

        let mut diagnostics = Diagnostics::new();
        let outcome = build_pipeline().execute(&mut data, &mut diagnostics).await;
        if let Some(sessions) = data.take_typed(SESSIONS) {
            self.sessions = sessions;
        }

        if let Err(e) = outcome {
            return Err(BuildFailure::new(e, diagnostics.filtered(min_severity)));
        }

        let Some(module) = data.take_typed(MANIFEST) else {
            return Err(BuildFailure::new(
                ModkitError::missing_input(MANIFEST.name()),
                diagnostics.filtered(min_severity),
            ));
        };
        let artifacts = data.take_typed(ARTIFACTS).unwrap_or_default();
        let entry_points = data.take_typed(ENTRY_POINTS).unwrap_or_default();
        debug!("Build produced {} artifacts", artifacts.len());

        Ok(BuildResult {
            artifacts,
            manifest: BuildManifest {
                entry_points,
                static_assets: Vec::new(),
                diagnostics: diagnostics.filtered(min_severity),
                module,
            },
        })
    }

    /// Dispose every live incremental session
    pub async fn shutdown(&mut self) {
        self.sessions.dispose_all().await;
    }
}

/// One build with a fresh session store, disposed before returning
pub async fn run_build(options: BuildOptions) -> Result<BuildResult, BuildFailure> {
    let mut builder = Builder::new();
    let result = builder.build(&options).await;
    builder.shutdown().await;
    result
}
