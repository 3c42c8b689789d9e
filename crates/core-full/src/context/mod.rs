//! Per-build context shared by every pipeline node.

use crate::manifest::loader::{DefinitionLoader, NodeDefinitionLoader};
use crate::toolchain::{Bundler, EsbuildBundler, SessionStore, TypeCheckRunner};
use crate::workspace::Workspace;
use modkit_core::config::BuildSettings;
use modkit_core::pipeline::TypedKey;
use std::sync::Arc;

/// External programs a build delegates to
#[derive(Clone)]
pub struct Toolchain {
    pub bundler: Arc<dyn Bundler>,
    pub typecheck: TypeCheckRunner,
    pub loader: Arc<dyn DefinitionLoader>,
}

impl Toolchain {
    pub fn new(
        bundler: Arc<dyn Bundler>,
        typecheck: TypeCheckRunner,
        loader: Arc<dyn DefinitionLoader>,
    ) -> Self {
        Self {
            bundler,
            typecheck,
            loader,
        }
    }

    /// esbuild, tsc and node resolved against the workspace
    pub fn for_workspace(workspace: &Workspace) -> Self {
        Self {
            bundler: Arc::new(EsbuildBundler::new(&workspace.root, &workspace.state_dir)),
            typecheck: TypeCheckRunner::new(),
            loader: Arc::new(NodeDefinitionLoader::new(&workspace.root)),
        }
    }
}

/// Everything fixed for the duration of one build call
#[derive(Clone)]
pub struct BuildContext {
    pub workspace: Workspace,
    pub settings: BuildSettings,
    pub toolchain: Toolchain,
    /// Reuse a cached bundle session (ignored in publish)
    pub incremental: bool,
    /// Running under a watcher: smaller diagnostic cap, no one-shot type check
    pub watch: bool,
}

impl BuildContext {
    pub fn new(workspace: Workspace, settings: BuildSettings, toolchain: Toolchain) -> Self {
        Self {
            workspace,
            settings,
            toolchain,
            incremental: false,
            watch: false,
        }
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn diagnostic_limit(&self) -> usize {
        self.settings.diagnostic_limit(self.watch)
    }

    /// Incremental reuse never applies to publish builds
    pub fn uses_session(&self) -> bool {
        self.incremental && !self.settings.mode.is_publish()
    }
}

/// Type-safe key for BuildContext in pipeline
pub const CONTEXT: TypedKey<BuildContext> = TypedKey::new("context");

/// Session store lent to the pipeline for the duration of one build
pub const SESSIONS: TypedKey<SessionStore> = TypedKey::new("sessions");
