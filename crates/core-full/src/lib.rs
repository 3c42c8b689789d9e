pub mod api;
pub mod cache;
pub mod commands;
pub mod context;
pub mod io;
pub mod manifest;
pub mod pipeline;
pub mod toolchain;
pub mod watch;
pub mod workspace;

// Re-export commonly used types
pub use api::{run_build, BuildFailure, BuildManifest, BuildOptions, BuildResult, Builder};
pub use context::Toolchain;
pub use watch::{watch, WatchHandle};
pub use workspace::{scaffold_assets, ScaffoldAsset, Workspace};
