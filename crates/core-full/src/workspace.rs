//! Workspace layout and scaffold-asset listing.

use modkit_core::config::constants;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Resolved, absolute workspace paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub root: PathBuf,
    pub source_root: PathBuf,
    pub build_root: PathBuf,
    pub tests_root: PathBuf,
    pub state_dir: PathBuf,
    pub package_path: PathBuf,
    pub tsconfig_path: PathBuf,
}

impl Workspace {
    /// Resolve the layout under `root`, absolutising relative input
    pub fn resolve(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self {
            source_root: root.join(constants::SOURCE_DIR),
            build_root: root.join(constants::BUILD_DIR),
            tests_root: root.join(constants::TESTS_DIR),
            state_dir: root.join(constants::STATE_DIR),
            package_path: root.join(constants::PACKAGE_FILE),
            tsconfig_path: root.join(constants::TSCONFIG_FILE),
            root,
        })
    }

    /// Basename of the root directory
    pub fn directory_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace".to_string())
    }
}

/// A template file and where provisioning should place it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldAsset {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ScaffoldAsset {
    /// Whether the template source is present
    pub fn exists(&self) -> bool {
        self.source.is_file()
    }
}

/// (template, workspace) relative pairs. The ignore file is stored without
/// its leading dot in the template tree.
const SCAFFOLD_FILES: &[(&str, &str)] = &[
    ("package.json", "package.json"),
    ("tsconfig.json", "tsconfig.json"),
    ("gitignore", ".gitignore"),
    ("src/index.ts", "src/index.ts"),
    ("src/module.ts", "src/module.ts"),
    ("src/functions/hello/index.ts", "src/functions/hello/index.ts"),
];

/// Source/target pairs a provisioning tool copies to create a workspace
pub fn scaffold_assets(template_root: &Path, workspace_root: &Path) -> Vec<ScaffoldAsset> {
    SCAFFOLD_FILES
        .iter()
        .map(|(source, target)| ScaffoldAsset {
            source: template_root.join(source),
            target: workspace_root.join(target),
        })
        .collect()
}
