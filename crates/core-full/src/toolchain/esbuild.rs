//! `esbuild` driven as a subprocess.
//!
//! Output sizes come from esbuild's own `--metafile`; diagnostics are parsed
//! from its human-readable stderr.

use super::bundler::{BundleReport, BundleRequest, BundleSession, Bundler, CompilerMessage};
use super::resolve_tool;
use async_trait::async_trait;
use modkit_core::error::{ModkitError, Result};
use modkit_core::outputs::OutputSizeMap;
use modkit_core::util::path::{relative_slash_path, to_slash};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

static MESSAGE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:✘|▲|X)?\s*\[(ERROR|WARNING)\]\s+(.*)$").expect("static pattern")
});

static MESSAGE_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+(\S.*?):(\d+):(\d+):\s*$").expect("static pattern"));

static METAFILE_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Deserialize)]
struct Metafile {
    #[serde(default)]
    outputs: HashMap<String, MetafileOutput>,
}

#[derive(Deserialize)]
struct MetafileOutput {
    bytes: u64,
}

/// Bundler backed by the `esbuild` binary
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
    cwd: PathBuf,
    scratch_dir: PathBuf,
}

impl EsbuildBundler {
    /// `cwd` is the workspace root; metafiles are written under `scratch_dir`
    pub fn new(cwd: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        Self {
            program: resolve_tool(&cwd, "esbuild"),
            cwd,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn next_metafile(&self) -> PathBuf {
        let n = METAFILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.scratch_dir
            .join(format!("esbuild-{}-{n}.meta.json", std::process::id()))
    }

    fn invocation(&self, request: &BundleRequest) -> Invocation {
        let metafile = self.next_metafile();
        let mut args: Vec<OsString> = request
            .entries
            .iter()
            .map(|e| e.as_os_str().to_os_string())
            .collect();
        args.push(flag("--outdir=", &request.out_dir));
        args.push(flag("--outbase=", &request.source_root));
        args.push(flag("--metafile=", &metafile));
        args.extend(
            ["--platform=node", "--format=esm", "--log-level=warning", "--color=false"]
                .map(OsString::from),
        );
        if request.bundle {
            args.push("--bundle".into());
            args.push("--packages=external".into());
        }
        if request.minify {
            args.push("--minify".into());
        }
        if request.sourcemap {
            args.push("--sourcemap".into());
        }
        args.push(if request.keep_comments {
            "--legal-comments=inline".into()
        } else {
            "--legal-comments=none".into()
        });

        Invocation {
            program: self.program.clone(),
            cwd: self.cwd.clone(),
            args,
            metafile,
            out_dir: request.out_dir.clone(),
        }
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn build(&self, request: &BundleRequest) -> Result<BundleReport> {
        let invocation = self.invocation(request);
        let report = invocation.run().await;
        invocation.cleanup().await;
        report
    }

    async fn context(&self, request: &BundleRequest) -> Result<Box<dyn BundleSession>> {
        debug!("Creating esbuild session for {} entries", request.entries.len());
        Ok(Box::new(EsbuildSession {
            invocation: self.invocation(request),
            disposed: false,
        }))
    }

    async fn compile_file(&self, source: &Path, outfile: &Path) -> Result<BundleReport> {
        let args: Vec<OsString> = vec![
            source.as_os_str().to_os_string(),
            flag("--outfile=", outfile),
            "--bundle".into(),
            "--packages=external".into(),
            "--platform=node".into(),
            "--format=esm".into(),
            "--log-level=warning".into(),
            "--color=false".into(),
        ];
        let output = spawn(&self.program, &self.cwd, &args).await?;
        let mut report = report_from_output(&output);
        if report.succeeded() {
            if let Ok(meta) = tokio::fs::metadata(outfile).await {
                let out_dir = outfile.parent().unwrap_or(Path::new(""));
                let key = relative_slash_path(outfile, out_dir).unwrap_or_else(|| to_slash(outfile));
                report.outputs.insert(key, meta.len());
            }
        }
        Ok(report)
    }
}

/// Prepared command line, reused by sessions across rebuilds
#[derive(Debug, Clone)]
struct Invocation {
    program: PathBuf,
    cwd: PathBuf,
    args: Vec<OsString>,
    metafile: PathBuf,
    out_dir: PathBuf,
}

impl Invocation {
    async fn run(&self) -> Result<BundleReport> {
        if let Some(parent) = self.metafile.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let output = spawn(&self.program, &self.cwd, &self.args).await?;
        let mut report = report_from_output(&output);
        if report.succeeded() {
            report.outputs = self.read_outputs().await?;
        }
        Ok(report)
    }

    async fn read_outputs(&self) -> Result<OutputSizeMap> {
        let raw = tokio::fs::read_to_string(&self.metafile).await?;
        let metafile: Metafile = serde_json::from_str(&raw)?;
        let mut outputs = OutputSizeMap::new();
        for (path, output) in metafile.outputs {
            let absolute = self.cwd.join(&path);
            let key = relative_slash_path(&absolute, &self.out_dir)
                .unwrap_or_else(|| to_slash(Path::new(&path)));
            outputs.insert(key, output.bytes);
        }
        Ok(outputs)
    }

    async fn cleanup(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.metafile).await {
            debug!("Metafile {:?} not removed: {}", self.metafile, e);
        }
    }
}

struct EsbuildSession {
    invocation: Invocation,
    disposed: bool,
}

#[async_trait]
impl BundleSession for EsbuildSession {
    async fn rebuild(&mut self) -> Result<BundleReport> {
        if self.disposed {
            return Err(ModkitError::toolchain("esbuild session already disposed"));
        }
        self.invocation.run().await
    }

    async fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.invocation.cleanup().await;
        }
    }
}

fn flag(name: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(path.as_os_str());
    arg
}

async fn spawn(program: &Path, cwd: &Path, args: &[OsString]) -> Result<std::process::Output> {
    debug!("Running {:?} {:?}", program, args);
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModkitError::toolchain(format!("bundler executable {:?} not found", program))
            } else {
                ModkitError::toolchain(format!("failed to run {:?}: {}", program, e))
            }
        })
}

fn report_from_output(output: &std::process::Output) -> BundleReport {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let (mut errors, warnings) = parse_messages(&stderr);
    if !output.status.success() && errors.is_empty() {
        let text = stderr.trim();
        errors.push(CompilerMessage::new(if text.is_empty() {
            format!("esbuild exited with {}", output.status)
        } else {
            text.to_string()
        }));
    }
    BundleReport {
        errors,
        warnings,
        outputs: OutputSizeMap::new(),
    }
}

/// Split esbuild's stderr into errors and warnings.
///
/// Each message starts at an `[ERROR]` / `[WARNING]` header; the first
/// `file:line:column:` line after it is taken as its location.
pub fn parse_messages(stderr: &str) -> (Vec<CompilerMessage>, Vec<CompilerMessage>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut current: Option<(bool, CompilerMessage)> = None;

    for line in stderr.lines() {
        if let Some(caps) = MESSAGE_HEADER.captures(line) {
            if let Some((is_error, message)) = current.take() {
                if is_error { errors.push(message) } else { warnings.push(message) }
            }
            current = Some((&caps[1] == "ERROR", CompilerMessage::new(caps[2].trim())));
        } else if let Some(caps) = MESSAGE_LOCATION.captures(line) {
            if let Some((_, message)) = current.as_mut() {
                if message.file.is_none() {
                    let line_no = caps[2].parse().unwrap_or(0);
                    let column = caps[3].parse().unwrap_or(0);
                    *message = message.clone().at(&caps[1], line_no, column);
                }
            }
        }
    }
    if let Some((is_error, message)) = current {
        if is_error { errors.push(message) } else { warnings.push(message) }
    }
    (errors, warnings)
}
