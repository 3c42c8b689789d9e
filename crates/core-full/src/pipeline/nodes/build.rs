// Build pipeline nodes

use crate::cache::CacheDiffReporter;
use crate::context::{BuildContext, CONTEXT, SESSIONS};
use crate::io::entries::signature_for;
use crate::io::{collect_outputs, discover_entries};
use crate::manifest::ManifestHydrator;
use crate::toolchain::{BundleReport, BundleRequest, SessionKey};
use async_trait::async_trait;
use modkit_core::artifact::{index_entry_points, ArtifactRecord};
use modkit_core::config::constants::{DEFINITION_OUTFILE, DEFINITION_SOURCES};
use modkit_core::error::{ModkitError, Result};
use modkit_core::outputs::OutputSizeMap;
use modkit_core::pipeline::keys::{
    ARTIFACTS, ENTRIES, ENTRY_POINTS, ENTRY_SIGNATURE, MANIFEST, OUTPUT_SIZES, SOURCEMAPS,
};
use modkit_core::pipeline::{PipeMap, PipeNode};
use modkit_core::util::path::relative_slash_path;
use modkit_core::util::text::plural;
use modkit_core::{Diagnostic, DiagnosticSink, Diagnostics, NullSink, Severity};
use std::path::Path;
use tracing::{debug, info};

fn context(data: &PipeMap) -> Result<BuildContext> {
    data.require(CONTEXT).cloned()
}

/// Type-check node - fails the build on a failing check.
///
/// Watch builds skip it; the `--watch` checker reports on its own.
pub struct TypeCheckNode;

#[async_trait]
impl PipeNode for TypeCheckNode {
    fn name(&self) -> String {
        "TypeCheck".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["context".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec![]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        if ctx.watch {
            debug!("Type check left to the watch checker");
            return Ok(());
        }
        let outcome = ctx
            .toolchain
            .typecheck
            .run(&ctx.workspace, &ctx.settings, diagnostics)
            .await?;
        debug!("Type check outcome: {:?}", outcome);
        Ok(())
    }
}

/// Entry discovery node - find entry files and their signature
pub struct EntryDiscoveryNode;

#[async_trait]
impl PipeNode for EntryDiscoveryNode {
    fn name(&self) -> String {
        "EntryDiscovery".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["context".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["entries".to_string(), "entry_signature".to_string()]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let source_root = &ctx.workspace.source_root;
        let entries = discover_entries(source_root).await?;

        if entries.is_empty() {
            diagnostics.warn(format!(
                "No entry points found under {}; skipping bundle",
                source_root.display()
            ));
        } else {
            debug!("Found {}", plural(entries.len(), "entry point"));
        }

        data.insert_typed(ENTRY_SIGNATURE, signature_for(&entries, source_root));
        data.insert_typed(ENTRIES, entries);
        Ok(())
    }
}

/// Bundle node - one-shot or session rebuild depending on mode
pub struct BundleNode;

#[async_trait]
impl PipeNode for BundleNode {
    fn name(&self) -> String {
        "Bundle".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec![
            "context".to_string(),
            "sessions".to_string(),
            "entries".to_string(),
            "entry_signature".to_string(),
        ]
    }

    fn output(&self) -> Vec<String> {
        vec!["output_sizes".to_string(), "sourcemaps".to_string()]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let entries = data.require(ENTRIES)?.clone();
        let signature = data.require(ENTRY_SIGNATURE)?.clone();
        let mode = ctx.settings.mode;
        let sourcemap = ctx.settings.sourcemaps();
        let build_root = &ctx.workspace.build_root;
        data.insert_typed(SOURCEMAPS, sourcemap);

        let key = SessionKey::new(mode, build_root);
        let sessions = data
            .get_typed_mut(SESSIONS)
            .ok_or_else(|| ModkitError::missing_input(SESSIONS.name()))?;

        if entries.is_empty() {
            sessions.evict(&key).await;
            data.insert_typed(OUTPUT_SIZES, OutputSizeMap::new());
            return Ok(());
        }

        let request = BundleRequest::for_mode(
            mode,
            sourcemap,
            entries,
            &ctx.workspace.source_root,
            build_root,
        );
        let bundler = ctx.toolchain.bundler.as_ref();

        let report = if ctx.uses_session() {
            sessions.rebuild(key, &signature, bundler, &request).await?
        } else {
            sessions.evict(&key).await;
            if mode.is_publish() {
                clean_build_root(build_root).await?;
            }
            info!("Bundling {} ({} mode)", plural(request.entries.len(), "entry file"), mode);
            bundler.build(&request).await?
        };

        record_compiler_messages(&report, ctx.diagnostic_limit(), diagnostics);
        if !report.succeeded() {
            return Err(ModkitError::BuildFailed);
        }

        data.insert_typed(OUTPUT_SIZES, report.outputs);
        Ok(())
    }
}

async fn clean_build_root(build_root: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(build_root).await {
        Ok(()) => debug!("Cleaned {:?}", build_root),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// One diagnostic per compiler message, errors first, capped at `limit`
/// with a trailing line counting what was left out
fn record_compiler_messages(report: &BundleReport, limit: usize, diagnostics: &mut Diagnostics) {
    let messages = report
        .errors
        .iter()
        .map(|m| (Severity::Error, m))
        .chain(report.warnings.iter().map(|m| (Severity::Warn, m)));

    let total = report.errors.len() + report.warnings.len();
    for (severity, message) in messages.take(limit) {
        let mut diagnostic = Diagnostic::new(severity, message.to_string());
        if let Some(file) = &message.file {
            diagnostic = diagnostic.with_file(file.clone());
        }
        diagnostics.push(diagnostic);
    }

    if total > limit {
        let omitted = total - limit;
        let severity = if report.errors.len() > limit {
            Severity::Error
        } else {
            Severity::Warn
        };
        diagnostics.push(Diagnostic::new(
            severity,
            format!(
                "{} omitted ({} total)",
                plural(omitted, "compiler diagnostic"),
                total
            ),
        ));
    }
}

/// Definition compile node - best-effort single-file compile of the
/// module-definition source
pub struct DefinitionCompileNode;

#[async_trait]
impl PipeNode for DefinitionCompileNode {
    fn name(&self) -> String {
        "DefinitionCompile".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["context".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec![]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let Some(source) = DEFINITION_SOURCES
            .iter()
            .map(|name| ctx.workspace.source_root.join(name))
            .find(|path| path.is_file())
        else {
            debug!("No module-definition source found");
            return Ok(());
        };

        let outfile = ctx.workspace.build_root.join(DEFINITION_OUTFILE);
        let file = source.display().to_string();
        match ctx.toolchain.bundler.compile_file(&source, &outfile).await {
            Ok(report) => {
                for message in &report.errors {
                    diagnostics.push(
                        Diagnostic::error(format!("Module definition: {message}"))
                            .with_file(file.clone()),
                    );
                }
                for message in &report.warnings {
                    diagnostics.push(
                        Diagnostic::warn(format!("Module definition: {message}"))
                            .with_file(file.clone()),
                    );
                }
            }
            Err(e) => {
                diagnostics.push(
                    Diagnostic::error(format!("Failed to compile module definition: {e}"))
                        .with_file(file),
                );
            }
        }
        Ok(())
    }
}

/// Artifact collector node - scan the build root and derive entry points
pub struct ArtifactCollectorNode;

#[async_trait]
impl PipeNode for ArtifactCollectorNode {
    fn name(&self) -> String {
        "ArtifactCollector".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["context".to_string(), "sourcemaps?".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["artifacts".to_string(), "entry_points".to_string()]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let build_root = &ctx.workspace.build_root;
        let include_maps = data.get_typed(SOURCEMAPS).copied().unwrap_or(false);
        let files = collect_outputs(build_root, include_maps).await?;

        let relative: Vec<String> = files
            .iter()
            .filter_map(|f| relative_slash_path(f, build_root))
            .collect();
        let mut entry_points = index_entry_points(&relative);
        if entry_points.is_empty() {
            if build_root.join("index.js").is_file() {
                entry_points.push("index.js".to_string());
            } else {
                diagnostics.warn(format!("No entry point found in {}", build_root.display()));
            }
        }

        let artifacts: Vec<ArtifactRecord> = files.into_iter().map(ArtifactRecord::new).collect();
        debug!(
            "Collected {} ({})",
            plural(artifacts.len(), "artifact"),
            plural(entry_points.len(), "entry point")
        );
        data.insert_typed(ARTIFACTS, artifacts);
        data.insert_typed(ENTRY_POINTS, entry_points);
        Ok(())
    }
}

/// Manifest hydrator node
pub struct ManifestHydratorNode;

#[async_trait]
impl PipeNode for ManifestHydratorNode {
    fn name(&self) -> String {
        "ManifestHydrator".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["context".to_string(), "entry_points".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["manifest".to_string()]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let entry_points = data.require(ENTRY_POINTS)?.clone();
        let hydrator = ManifestHydrator::new(&ctx.workspace, ctx.toolchain.loader.as_ref());
        let manifest = hydrator.hydrate(&entry_points, diagnostics).await;
        data.insert_typed(MANIFEST, manifest);
        Ok(())
    }
}

/// Cache diff node - summarize changes since the previous build
pub struct CacheDiffNode;

#[async_trait]
impl PipeNode for CacheDiffNode {
    fn name(&self) -> String {
        "CacheDiff".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec![
            "context".to_string(),
            "output_sizes".to_string(),
            "manifest".to_string(),
        ]
    }

    fn output(&self) -> Vec<String> {
        vec![]
    }

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        let ctx = context(data)?;
        let outputs = data.require(OUTPUT_SIZES)?;
        let manifest = data.require(MANIFEST)?;
        let reporter = CacheDiffReporter::new(&ctx.workspace.state_dir);

        if ctx.settings.quiet_cache {
            reporter.report(outputs, manifest, &mut NullSink).await;
        } else {
            reporter.report(outputs, manifest, diagnostics).await;
        }
        Ok(())
    }
}
