//! Reduced manifest snapshot used only for change detection.

use super::model::ModuleManifest;
use super::route::route_key;
use crate::config::constants::DIGEST_EXAMPLE_LIMIT;
use crate::util::text::summarize_names;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDigest {
    pub route_keys: BTreeSet<String>,
    pub view_paths: BTreeSet<String>,
    pub capabilities: BTreeSet<String>,
}

impl ManifestDigest {
    pub fn from_manifest(manifest: &ModuleManifest) -> Self {
        Self {
            route_keys: manifest
                .routes
                .iter()
                .map(|r| route_key(&r.method, &r.path))
                .collect(),
            view_paths: manifest.views.iter().map(|v| v.path.clone()).collect(),
            capabilities: manifest.capabilities.iter().cloned().collect(),
        }
    }

    pub fn diff(&self, next: &ManifestDigest) -> DigestDiff {
        DigestDiff {
            routes_added: next.route_keys.difference(&self.route_keys).cloned().collect(),
            routes_removed: self.route_keys.difference(&next.route_keys).cloned().collect(),
            views_added: next.view_paths.difference(&self.view_paths).cloned().collect(),
            views_removed: self.view_paths.difference(&next.view_paths).cloned().collect(),
        }
    }
}

/// Route and view set differences between two digests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestDiff {
    pub routes_added: Vec<String>,
    pub routes_removed: Vec<String>,
    pub views_added: Vec<String>,
    pub views_removed: Vec<String>,
}

impl DigestDiff {
    pub fn is_empty(&self) -> bool {
        self.routes_added.is_empty()
            && self.routes_removed.is_empty()
            && self.views_added.is_empty()
            && self.views_removed.is_empty()
    }

    /// `Manifest changes: routes +A/-R; views +A/-R (...)`
    pub fn summary(&self) -> String {
        let mut message = format!(
            "Manifest changes: routes +{}/-{}; views +{}/-{}",
            self.routes_added.len(),
            self.routes_removed.len(),
            self.views_added.len(),
            self.views_removed.len()
        );

        let examples: Vec<String> = [
            ("+", &self.routes_added),
            ("-", &self.routes_removed),
            ("+", &self.views_added),
            ("-", &self.views_removed),
        ]
        .into_iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(sign, names)| format!("{sign}{}", summarize_names(names, DIGEST_EXAMPLE_LIMIT)))
        .collect();
        if !examples.is_empty() {
            message.push_str(&format!(" ({})", examples.join("; ")));
        }
        message
    }
}
