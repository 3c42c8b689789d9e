//! Loading compiled module definitions.
//!
//! Whatever a loader returns is untrusted until it passes manifest validation.

use async_trait::async_trait;
use modkit_core::util::path::extension_lower;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Result of trying one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Value),
    NotFound,
    LoadError(String),
}

#[async_trait]
pub trait DefinitionLoader: Send + Sync {
    async fn load(&self, path: &Path) -> LoadOutcome;
}

/// Reads a definition already serialised as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDefinitionLoader;

#[async_trait]
impl DefinitionLoader for JsonDefinitionLoader {
    async fn load(&self, path: &Path) -> LoadOutcome {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::NotFound,
            Err(e) => return LoadOutcome::LoadError(e.to_string()),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => LoadOutcome::Loaded(value),
            Err(e) => LoadOutcome::LoadError(format!("invalid JSON: {e}")),
        }
    }
}

/// Imports the default export in a Node.js child process and prints it as
/// JSON. Functions become `{ "name": ... }` descriptors; cycles become null.
const IMPORT_SCRIPT: &str = r#"
const { pathToFileURL } = await import('node:url');
const target = process.argv[process.argv.length - 1];
const mod = await import(pathToFileURL(target).href);
const root = mod.default ?? mod.definition ?? { ...mod };
const seen = new WeakSet();
const plain = (value) => {
  if (typeof value === 'function') return { name: value.name || null };
  if (Array.isArray(value)) return value.map(plain);
  if (value && typeof value === 'object') {
    if (seen.has(value)) return null;
    seen.add(value);
    const out = {};
    for (const [key, item] of Object.entries(value)) out[key] = plain(item);
    return out;
  }
  return value === undefined ? null : value;
};
process.stdout.write(JSON.stringify(plain(root)));
"#;

/// Loads compiled ES modules through `node`; `.json` candidates are read directly
#[derive(Debug, Clone)]
pub struct NodeDefinitionLoader {
    program: PathBuf,
    cwd: PathBuf,
}

impl NodeDefinitionLoader {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("node"),
            cwd: cwd.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl DefinitionLoader for NodeDefinitionLoader {
    async fn load(&self, path: &Path) -> LoadOutcome {
        if !path.is_file() {
            return LoadOutcome::NotFound;
        }
        if extension_lower(path).as_deref() == Some("json") {
            return JsonDefinitionLoader.load(path).await;
        }

        debug!("Importing module definition {:?}", path);
        let output = Command::new(&self.program)
            .arg("--input-type=module")
            .arg("-e")
            .arg(IMPORT_SCRIPT)
            .arg(path)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return LoadOutcome::LoadError(format!("{:?} not found", self.program));
            }
            Err(e) => return LoadOutcome::LoadError(e.to_string()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().to_string())
                .unwrap_or_else(|| format!("import exited with {}", output.status));
            return LoadOutcome::LoadError(reason);
        }

        match serde_json::from_slice(&output.stdout) {
            Ok(value) => LoadOutcome::Loaded(value),
            Err(e) => LoadOutcome::LoadError(format!("definition is not serialisable: {e}")),
        }
    }
}
