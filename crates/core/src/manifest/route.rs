use super::model::RouteDefinition;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static REPEATED_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("static pattern"));

/// Normalize a route path for comparison.
///
/// Ensures a leading slash, collapses every run of slashes, and strips a
/// trailing slash except on the root path.
pub fn normalize_route_path(path: &str) -> String {
    let with_root = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let mut normalized = REPEATED_SLASHES.replace_all(&with_root, "/").into_owned();
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// `METHOD /normalized/path`
pub fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method.to_ascii_uppercase(), normalize_route_path(path))
}

/// Route keys occurring more than once, with their counts, in first-seen order
pub fn duplicate_routes(routes: &[RouteDefinition]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for route in routes {
        *counts.entry(route_key(&route.method, &route.path)).or_insert(0) += 1;
    }
    counts.into_iter().filter(|(_, count)| *count > 1).collect()
}
