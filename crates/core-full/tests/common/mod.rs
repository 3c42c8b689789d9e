// Shared fakes and fixtures for core-full tests
#![allow(dead_code)]

use async_trait::async_trait;
use modkit_core::error::{ModkitError, Result};
use modkit_core::outputs::OutputSizeMap;
use modkit_core::util::path::relative_slash_path;
use modkit_core_full::manifest::JsonDefinitionLoader;
use modkit_core_full::toolchain::{
    BundleReport, BundleRequest, BundleSession, Bundler, CompilerMessage, TypeCheckRunner,
};
use modkit_core_full::Toolchain;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// What the fake bundler was asked to do
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub builds: usize,
    pub contexts: usize,
    pub rebuilds: usize,
    pub disposals: usize,
    pub compiles: usize,
    pub last_request: Option<BundleRequest>,
}

/// Writes `<entry stem path>.js` for every entry (content length = `size`)
/// and reports the sizes it wrote
#[derive(Clone, Default)]
pub struct FakeBundler {
    pub calls: Arc<Mutex<Calls>>,
    pub size: Arc<Mutex<usize>>,
    pub errors: Arc<Mutex<Vec<CompilerMessage>>>,
    pub warnings: Arc<Mutex<Vec<CompilerMessage>>>,
    /// `compile_file` returns this as a toolchain error when set
    pub compile_failure: Arc<Mutex<Option<String>>>,
    /// `compile_file` reports these as compiler errors
    pub compile_errors: Arc<Mutex<Vec<CompilerMessage>>>,
}

impl FakeBundler {
    pub fn new() -> Self {
        let bundler = Self::default();
        *bundler.size.lock().unwrap() = 100;
        bundler
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_size(&self, size: usize) {
        *self.size.lock().unwrap() = size;
    }

    pub fn fail_with(&self, errors: Vec<CompilerMessage>) {
        *self.errors.lock().unwrap() = errors;
    }

    pub fn warn_with(&self, warnings: Vec<CompilerMessage>) {
        *self.warnings.lock().unwrap() = warnings;
    }

    pub fn fail_compile(&self, reason: &str) {
        *self.compile_failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn compile_errors_with(&self, errors: Vec<CompilerMessage>) {
        *self.compile_errors.lock().unwrap() = errors;
    }

    fn emit(&self, request: &BundleRequest) -> BundleReport {
        let errors = self.errors.lock().unwrap().clone();
        let warnings = self.warnings.lock().unwrap().clone();
        if !errors.is_empty() {
            return BundleReport {
                errors,
                warnings,
                outputs: OutputSizeMap::new(),
            };
        }

        let size = *self.size.lock().unwrap();
        let mut outputs = OutputSizeMap::new();
        for entry in &request.entries {
            let relative = entry.strip_prefix(&request.source_root).unwrap();
            let out = request.out_dir.join(relative).with_extension("js");
            std::fs::create_dir_all(out.parent().unwrap()).unwrap();
            std::fs::write(&out, "x".repeat(size)).unwrap();
            outputs.insert(relative_slash_path(&out, &request.out_dir).unwrap(), size as u64);
            if request.sourcemap {
                let map = PathBuf::from(format!("{}.map", out.display()));
                std::fs::write(&map, "{}").unwrap();
                outputs.insert(relative_slash_path(&map, &request.out_dir).unwrap(), 2);
            }
        }
        BundleReport {
            errors,
            warnings,
            outputs,
        }
    }
}

pub struct FakeSession {
    bundler: FakeBundler,
    request: BundleRequest,
}

#[async_trait]
impl BundleSession for FakeSession {
    async fn rebuild(&mut self) -> Result<BundleReport> {
        self.bundler.calls.lock().unwrap().rebuilds += 1;
        Ok(self.bundler.emit(&self.request))
    }

    async fn dispose(&mut self) {
        self.bundler.calls.lock().unwrap().disposals += 1;
    }
}

#[async_trait]
impl Bundler for FakeBundler {
    async fn build(&self, request: &BundleRequest) -> Result<BundleReport> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.builds += 1;
            calls.last_request = Some(request.clone());
        }
        Ok(self.emit(request))
    }

    async fn context(&self, request: &BundleRequest) -> Result<Box<dyn BundleSession>> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.contexts += 1;
            calls.last_request = Some(request.clone());
        }
        Ok(Box::new(FakeSession {
            bundler: self.clone(),
            request: request.clone(),
        }))
    }

    async fn compile_file(&self, source: &Path, outfile: &Path) -> Result<BundleReport> {
        self.calls.lock().unwrap().compiles += 1;
        if let Some(reason) = self.compile_failure.lock().unwrap().clone() {
            return Err(ModkitError::toolchain(reason));
        }
        let errors = self.compile_errors.lock().unwrap().clone();
        if !errors.is_empty() {
            return Ok(BundleReport {
                errors,
                ..BundleReport::default()
            });
        }
        std::fs::create_dir_all(outfile.parent().unwrap()).unwrap();
        std::fs::copy(source, outfile).unwrap();
        Ok(BundleReport::default())
    }
}

/// Toolchain with the fake bundler, `true` as type checker and JSON definitions
pub fn fake_toolchain(bundler: &FakeBundler) -> Toolchain {
    Toolchain::new(
        Arc::new(bundler.clone()),
        TypeCheckRunner::new().with_program("true"),
        Arc::new(JsonDefinitionLoader),
    )
}

/// A workspace directory with the given files, paths relative to the root
pub fn workspace_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        write(dir.path(), path, content);
    }
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
