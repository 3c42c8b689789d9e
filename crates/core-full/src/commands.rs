use crate::api::{run_build, BuildFailure, BuildOptions, BuildResult};
use crate::watch::watch;
use crate::workspace::{scaffold_assets, ScaffoldAsset, Workspace};
use modkit_core::Severity;
use std::path::Path;
use tracing::{error, info, warn};

/// One-shot build, or a watch session that runs until Ctrl-C when `watching`.
///
/// Returns the build result for one-shot builds and `None` after watch mode.
pub async fn build_command(
    options: BuildOptions,
    watching: bool,
) -> Result<Option<BuildResult>, BuildFailure> {
    if !watching {
        return run_build(options).await.map(Some);
    }

    info!("Entering watch mode...");
    let mut handle = watch(options, None)
        .await
        .map_err(|e| BuildFailure::new(e, Vec::new()))?;

    loop {
        tokio::select! {
            diagnostic = handle.next_diagnostic() => match diagnostic {
                Some(d) => match d.severity {
                    Severity::Info => info!("{}", d),
                    Severity::Warn => warn!("{}", d),
                    Severity::Error => error!("{}", d),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    Ok(None)
}

pub fn workspace_command(root: &Path) -> std::io::Result<Workspace> {
    Workspace::resolve(root)
}

pub fn scaffold_command(root: &Path, templates: &Path) -> std::io::Result<Vec<ScaffoldAsset>> {
    let workspace = Workspace::resolve(root)?;
    let assets = scaffold_assets(templates, &workspace.root);
    for asset in assets.iter().filter(|a| !a.exists()) {
        warn!("Template {} is missing", asset.source.display());
    }
    Ok(assets)
}
