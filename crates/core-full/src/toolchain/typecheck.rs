//! No-emit type check run as a child process.

use super::resolve_tool;
use crate::workspace::Workspace;
use modkit_core::config::BuildSettings;
use modkit_core::error::{ModkitError, Result};
use modkit_core::{DiagnosticSink, Diagnostics};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// How a type-check pass ended without failing the build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheckOutcome {
    /// Opted out via environment (never in publish)
    Skipped,
    Passed,
    /// No project config; soft pass
    MissingConfig,
    /// Checker binary not on the execution path; soft pass
    ToolMissing,
}

#[derive(Debug, Clone, Default)]
pub struct TypeCheckRunner {
    program: Option<PathBuf>,
}

impl TypeCheckRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific checker binary instead of resolving `tsc`
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn program(&self, workspace: &Workspace) -> PathBuf {
        self.program
            .clone()
            .unwrap_or_else(|| resolve_tool(&workspace.root, "tsc"))
    }

    pub async fn run(
        &self,
        workspace: &Workspace,
        settings: &BuildSettings,
        diagnostics: &mut Diagnostics,
    ) -> Result<TypeCheckOutcome> {
        if !settings.should_typecheck() {
            debug!("Type check skipped by environment");
            return Ok(TypeCheckOutcome::Skipped);
        }

        if !workspace.tsconfig_path.is_file() {
            diagnostics.warn(format!(
                "No {} found; skipping type check",
                workspace.tsconfig_path.display()
            ));
            return Ok(TypeCheckOutcome::MissingConfig);
        }

        let program = self.program(workspace);
        info!("Type checking with {:?}", program);
        let output = Command::new(&program)
            .arg("--noEmit")
            .arg("-p")
            .arg(&workspace.tsconfig_path)
            .current_dir(&workspace.root)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                diagnostics.warn(format!(
                    "Type checker {:?} not found; skipping type check",
                    program
                ));
                return Ok(TypeCheckOutcome::ToolMissing);
            }
            Err(e) => {
                return Err(ModkitError::toolchain(format!(
                    "failed to run type checker {:?}: {}",
                    program, e
                )));
            }
        };

        if output.status.success() {
            debug!("Type check passed");
            return Ok(TypeCheckOutcome::Passed);
        }

        let captured = [output.stdout.as_slice(), output.stderr.as_slice()]
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        diagnostics.error(if captured.is_empty() {
            format!("Type check failed ({})", output.status)
        } else {
            format!("Type check failed ({}):\n{}", output.status, captured)
        });
        Err(ModkitError::TypeCheckFailed)
    }

    /// Long-running `--watch` checker for watch mode, stdout piped
    pub fn watch_command(&self, workspace: &Workspace) -> Command {
        let mut cmd = Command::new(self.program(workspace));
        cmd.arg("--noEmit")
            .arg("--watch")
            .arg("--preserveWatchOutput")
            .arg("-p")
            .arg(&workspace.tsconfig_path)
            .current_dir(&workspace.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}
