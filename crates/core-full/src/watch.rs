//! Watch mode: a type-check watcher and a bundle watcher running side by side.
//!
//! The two watchers share one diagnostic channel and are not synchronised;
//! their diagnostics interleave in whatever order they arrive.

use crate::api::{BuildFailure, BuildOptions, Builder};
use crate::context::Toolchain;
use crate::workspace::Workspace;
use modkit_core::error::Result;
use modkit_core::Diagnostic;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Quiet period after the last file event before rebuilding
const DEBOUNCE: Duration = Duration::from_millis(200);

type DiagnosticTx = mpsc::UnboundedSender<Diagnostic>;

/// Running watchers. Drain diagnostics with [`WatchHandle::next_diagnostic`]
/// and end both watchers with [`WatchHandle::stop`].
pub struct WatchHandle {
    diagnostics: mpsc::UnboundedReceiver<Diagnostic>,
    stop: Option<oneshot::Sender<()>>,
    bundle_task: JoinHandle<()>,
    typecheck: Option<Child>,
    readers: Vec<JoinHandle<()>>,
}

impl WatchHandle {
    pub async fn next_diagnostic(&mut self) -> Option<Diagnostic> {
        self.diagnostics.recv().await
    }

    /// Dispose the bundle watcher and its sessions, then terminate the checker
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.bundle_task).await {
            warn!("Bundle watcher ended abnormally: {}", e);
        }
        if let Some(mut child) = self.typecheck.take() {
            if let Err(e) = child.kill().await {
                debug!("Type-check watcher already gone: {}", e);
            }
        }
        for reader in &self.readers {
            reader.abort();
        }
        info!("Watch mode stopped");
    }
}

/// Start both watchers for the workspace in `options`. Rebuilds are always
/// incremental.
pub async fn watch(options: BuildOptions, toolchain: Option<Toolchain>) -> Result<WatchHandle> {
    let workspace = Workspace::resolve(options.root())?;
    let settings = options.settings();
    let toolchain = toolchain.unwrap_or_else(|| Toolchain::for_workspace(&workspace));
    let (tx, rx) = mpsc::unbounded_channel();

    let (typecheck, readers) = if settings.should_typecheck() {
        spawn_typecheck_watcher(&workspace, &toolchain, &tx)
    } else {
        debug!("Type-check watcher skipped by environment");
        (None, Vec::new())
    };

    let (stop_tx, stop_rx) = oneshot::channel();
    let options = options.incremental(true);
    let builder = Builder::new().with_toolchain(toolchain).watch(true);
    let bundle_task = tokio::spawn(bundle_watcher(workspace, options, builder, tx, stop_rx));

    Ok(WatchHandle {
        diagnostics: rx,
        stop: Some(stop_tx),
        bundle_task,
        typecheck,
        readers,
    })
}

fn spawn_typecheck_watcher(
    workspace: &Workspace,
    toolchain: &Toolchain,
    tx: &DiagnosticTx,
) -> (Option<Child>, Vec<JoinHandle<()>>) {
    if !workspace.tsconfig_path.is_file() {
        let _ = tx.send(Diagnostic::warn(format!(
            "No {} found; type-check watcher not started",
            workspace.tsconfig_path.display()
        )));
        return (None, Vec::new());
    }

    let mut child = match toolchain.typecheck.watch_command(workspace).spawn() {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(Diagnostic::warn(format!(
                "Type-check watcher could not start: {e}"
            )));
            return (None, Vec::new());
        }
    };

    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(forward_lines(stdout, tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(forward_lines(stderr, tx.clone())));
    }
    info!("Type-check watcher started");
    (Some(child), readers)
}

/// Diagnostic for one line of checker output. Blank lines yield nothing;
/// lines carrying `error TS` are errors, everything else is info.
pub fn checker_line_diagnostic(line: &str) -> Option<Diagnostic> {
    let line = line.trim_end();
    if line.is_empty() {
        None
    } else if line.contains("error TS") {
        Some(Diagnostic::error(line))
    } else {
        Some(Diagnostic::info(line))
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(stream: R, tx: DiagnosticTx) {
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Some(diagnostic) = checker_line_diagnostic(&line) else {
            continue;
        };
        if tx.send(diagnostic).is_err() {
            break;
        }
    }
}

async fn bundle_watcher(
    workspace: Workspace,
    options: BuildOptions,
    mut builder: Builder,
    tx: DiagnosticTx,
    mut stop: oneshot::Receiver<()>,
) {
    let (event_tx, mut events) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .and_then(|mut watcher| {
        watcher.watch(&workspace.source_root, RecursiveMode::Recursive)?;
        Ok(watcher)
    });
    let _watcher = match watcher {
        Ok(watcher) => watcher,
        Err(e) => {
            let _ = tx.send(Diagnostic::error(format!(
                "Could not watch {}: {e}",
                workspace.source_root.display()
            )));
            return;
        }
    };
    debug!("Watching {:?}", workspace.source_root);

    rebuild(&mut builder, &options, &tx).await;

    let mut deadline: Option<Instant> = None;
    loop {
        tokio::select! {
            _ = &mut stop => break,
            event = events.recv() => match event {
                Some(Ok(event)) if is_relevant(&event) => {
                    deadline = Some(Instant::now() + DEBOUNCE);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!("Watch error: {}", e),
                None => break,
            },
            _ = sleep_until(deadline), if deadline.is_some() => {
                deadline = None;
                info!("Source change detected, rebuilding");
                rebuild(&mut builder, &options, &tx).await;
            }
        }
    }

    builder.shutdown().await;
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

async fn rebuild(builder: &mut Builder, options: &BuildOptions, tx: &DiagnosticTx) {
    match builder.build(options).await {
        Ok(result) => {
            for diagnostic in result.manifest.diagnostics {
                let _ = tx.send(diagnostic);
            }
            debug!("Rebuild completed successfully");
        }
        Err(BuildFailure {
            source,
            diagnostics,
        }) => {
            for diagnostic in diagnostics {
                let _ = tx.send(diagnostic);
            }
            let _ = tx.send(Diagnostic::error(format!("Rebuild failed: {source}")));
        }
    }
}
