//! Build artifact classification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Bundle,
    Asset,
}

impl ArtifactKind {
    /// `.map` files are assets, every other produced file is a bundle
    pub fn classify(file_name: &str) -> Self {
        if file_name.ends_with(".map") {
            Self::Asset
        } else {
            Self::Bundle
        }
    }
}

/// A produced file in the build output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
}

impl ArtifactRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = path
            .file_name()
            .map(|n| ArtifactKind::classify(&n.to_string_lossy()))
            .unwrap_or(ArtifactKind::Bundle);
        Self { path, kind }
    }
}

/// Every relative artifact path that ends in `index.js`, sorted
pub fn index_entry_points<S: AsRef<str>>(relative_paths: &[S]) -> Vec<String> {
    let mut entry_points: Vec<String> = relative_paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| p.ends_with("index.js"))
        .map(str::to_string)
        .collect();
    entry_points.sort();
    entry_points
}
