//! Bundler abstraction. Transpilation and bundling are always delegated to an
//! external compiler; this module only describes what to ask it for.

use async_trait::async_trait;
use modkit_core::config::BuildMode;
use modkit_core::error::Result;
use modkit_core::outputs::OutputSizeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// What to compile and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Absolute entry files
    pub entries: Vec<PathBuf>,
    pub source_root: PathBuf,
    pub out_dir: PathBuf,
    /// Full bundle with dependencies externalized, else per-file transpile
    pub bundle: bool,
    pub minify: bool,
    pub sourcemap: bool,
    /// Keep comments the compiler preserves. esbuild only keeps legal
    /// comments (`//!`, `/*!`, `@license`); ordinary ones are always dropped.
    pub keep_comments: bool,
}

impl BundleRequest {
    /// Per-mode policy: publish bundles and minifies, everything else transpiles
    pub fn for_mode(
        mode: BuildMode,
        sourcemap: bool,
        entries: Vec<PathBuf>,
        source_root: &Path,
        out_dir: &Path,
    ) -> Self {
        let publish = mode.is_publish();
        Self {
            entries,
            source_root: source_root.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            bundle: publish,
            minify: publish,
            sourcemap,
            keep_comments: !publish,
        }
    }
}

/// One compiler error or warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerMessage {
    pub text: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl CompilerMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for CompilerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => {
                write!(f, "{file}:{line}:{column}: {}", self.text)
            }
            (Some(file), _, _) => write!(f, "{file}: {}", self.text),
            _ => f.write_str(&self.text),
        }
    }
}

/// Result of one compile: messages plus output metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleReport {
    pub errors: Vec<CompilerMessage>,
    pub warnings: Vec<CompilerMessage>,
    /// Build-root-relative output path -> bytes
    pub outputs: OutputSizeMap,
}

impl BundleReport {
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A long-lived compiler context reused across rebuilds
#[async_trait]
pub trait BundleSession: Send + Sync {
    async fn rebuild(&mut self) -> Result<BundleReport>;
    async fn dispose(&mut self);
}

#[async_trait]
pub trait Bundler: Send + Sync {
    /// One-shot compile
    async fn build(&self, request: &BundleRequest) -> Result<BundleReport>;

    /// Create an incremental session for `request`
    async fn context(&self, request: &BundleRequest) -> Result<Box<dyn BundleSession>>;

    /// Compile a single source file to `outfile`
    async fn compile_file(&self, source: &Path, outfile: &Path) -> Result<BundleReport>;
}
