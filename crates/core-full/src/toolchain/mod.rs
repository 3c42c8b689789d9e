//! External toolchain: bundler, incremental sessions and the type checker.

pub mod bundler;
pub mod esbuild;
pub mod session;
pub mod typecheck;

pub use bundler::{BundleReport, BundleRequest, BundleSession, Bundler, CompilerMessage};
pub use esbuild::EsbuildBundler;
pub use session::{SessionKey, SessionStore};
pub use typecheck::{TypeCheckOutcome, TypeCheckRunner};

use std::path::{Path, PathBuf};

/// Prefer the workspace-local `node_modules/.bin/<tool>`, else rely on `PATH`
pub fn resolve_tool(root: &Path, tool: &str) -> PathBuf {
    let local = root.join("node_modules").join(".bin").join(tool);
    if local.is_file() {
        local
    } else {
        PathBuf::from(tool)
    }
}
