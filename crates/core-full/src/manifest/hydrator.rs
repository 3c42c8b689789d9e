//! Static configuration + compiled definition -> validated manifest.

use super::loader::{DefinitionLoader, LoadOutcome};
use super::package::read_descriptor;
use crate::workspace::Workspace;
use modkit_core::config::constants::DEFINITION_OUTPUTS;
use modkit_core::manifest::{
    consistency_checks, flatten_definition, validate_manifest, ManifestBuilder, ModuleManifest,
};
use modkit_core::{Diagnostic, DiagnosticSink, Diagnostics};
use serde_json::Value;
use tracing::{debug, info};

pub struct ManifestHydrator<'a> {
    workspace: &'a Workspace,
    loader: &'a dyn DefinitionLoader,
}

impl<'a> ManifestHydrator<'a> {
    pub fn new(workspace: &'a Workspace, loader: &'a dyn DefinitionLoader) -> Self {
        Self { workspace, loader }
    }

    /// Produce the module manifest. Never fails: an invalid merge result is
    /// replaced by a minimal manifest carrying only name, version and kind.
    pub async fn hydrate(
        &self,
        entry_points: &[String],
        diagnostics: &mut Diagnostics,
    ) -> ModuleManifest {
        let descriptor = read_descriptor(
            &self.workspace.package_path,
            &self.workspace.directory_name(),
            diagnostics,
        )
        .await;
        let mut builder = ManifestBuilder::from_static(&descriptor.config, descriptor.package);

        if let Some((candidate, definition)) = self.load_definition(diagnostics).await {
            let flat = flatten_definition(&definition);
            if flat.is_empty() {
                diagnostics.warn(format!(
                    "Module definition {candidate} exported no manifest fields; ignoring it"
                ));
            } else {
                debug!("Merging module definition {}", candidate);
                builder.merge_definition(&flat);
            }
        }

        let manifest = match validate_manifest(&builder.value()) {
            Ok(manifest) => manifest,
            Err(issues) => {
                let listed = issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                diagnostics.error(format!("Manifest validation failed: {listed}"));
                let (name, version) = builder.fallback_identity();
                ModuleManifest::minimal(name, version)
            }
        };

        for diagnostic in consistency_checks(&manifest, entry_points) {
            diagnostics.push(diagnostic);
        }
        info!("Hydrated manifest {}@{}", manifest.name, manifest.version);
        manifest
    }

    /// First candidate that loads wins; load errors are warnings
    async fn load_definition(&self, diagnostics: &mut Diagnostics) -> Option<(String, Value)> {
        for candidate in DEFINITION_OUTPUTS {
            let path = self.workspace.build_root.join(candidate);
            match self.loader.load(&path).await {
                LoadOutcome::Loaded(value) => return Some(((*candidate).to_string(), value)),
                LoadOutcome::NotFound => continue,
                LoadOutcome::LoadError(reason) => {
                    diagnostics.push(
                        Diagnostic::warn(format!(
                            "Failed to load module definition {candidate}: {reason}"
                        ))
                        .with_file(path.display().to_string()),
                    );
                }
            }
        }
        None
    }
}
