//! Post-validation consistency checks. Each check is independent and non-fatal.

use super::model::ModuleManifest;
use super::route::duplicate_routes;
use crate::config::constants::SUMMARY_NAME_LIMIT;
use crate::diagnostic::Diagnostic;
use crate::util::text::{plural, summarize_names};

/// Run every check against a validated manifest
pub fn consistency_checks(manifest: &ModuleManifest, entry_points: &[String]) -> Vec<Diagnostic> {
    [
        check_duplicate_routes(manifest),
        check_routes_have_entries(manifest, entry_points),
        surface_summary(manifest),
        check_job_schedules(manifest),
        Some(route_summary(manifest)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn check_duplicate_routes(manifest: &ModuleManifest) -> Option<Diagnostic> {
    let duplicates = duplicate_routes(&manifest.routes);
    if duplicates.is_empty() {
        return None;
    }
    let groups: Vec<String> = duplicates
        .iter()
        .map(|(key, count)| format!("{key} (x{count})"))
        .collect();
    Some(Diagnostic::warn(format!(
        "Duplicate routes detected: {}",
        summarize_names(&groups, SUMMARY_NAME_LIMIT)
    )))
}

pub fn check_routes_have_entries(
    manifest: &ModuleManifest,
    entry_points: &[String],
) -> Option<Diagnostic> {
    (!manifest.routes.is_empty() && entry_points.is_empty()).then(|| {
        Diagnostic::warn(format!(
            "{} declared but no build entry points were produced",
            plural(manifest.routes.len(), "route")
        ))
    })
}

pub fn surface_summary(manifest: &ModuleManifest) -> Option<Diagnostic> {
    manifest.has_surface().then(|| {
        Diagnostic::info(format!(
            "Module surface: {}, {}, {}",
            plural(manifest.jobs.len(), "job"),
            plural(manifest.events.len(), "event"),
            plural(manifest.services.len(), "service")
        ))
    })
}

pub fn check_job_schedules(manifest: &ModuleManifest) -> Option<Diagnostic> {
    let unscheduled: Vec<&str> = manifest
        .jobs
        .iter()
        .filter(|job| job.schedule.as_deref().is_none_or(|s| s.trim().is_empty()))
        .map(|job| job.name.as_str())
        .collect();
    if unscheduled.is_empty() {
        return None;
    }
    Some(Diagnostic::warn(format!(
        "Jobs declared without a schedule: {}",
        summarize_names(&unscheduled, SUMMARY_NAME_LIMIT)
    )))
}

pub fn route_summary(manifest: &ModuleManifest) -> Diagnostic {
    let capabilities = if manifest.capabilities.is_empty() {
        "none".to_string()
    } else {
        manifest.capabilities.join(", ")
    };
    Diagnostic::info(format!(
        "Manifest {}@{}: {}, {}; capabilities: {}",
        manifest.name,
        manifest.version,
        plural(manifest.routes.len(), "route"),
        plural(manifest.views.len(), "view"),
        capabilities
    ))
}
