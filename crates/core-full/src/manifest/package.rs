use modkit_core::config::constants::CONFIG_BLOCK_KEY;
use modkit_core::manifest::PackageInfo;
use modkit_core::{DiagnosticSink, Diagnostics};
use serde_json::{Map, Value};
use std::path::Path;

/// The parts of `package.json` the manifest is built from
#[derive(Debug, Clone, Default)]
pub struct PackageDescriptor {
    pub package: PackageInfo,
    /// Module-configuration block, empty when absent
    pub config: Map<String, Value>,
}

/// Read the package descriptor at `path`.
///
/// A missing, unreadable or malformed descriptor is reported as a warning and
/// yields an empty configuration.
pub async fn read_descriptor(
    path: &Path,
    directory: &str,
    diagnostics: &mut Diagnostics,
) -> PackageDescriptor {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            diagnostics.warn(format!(
                "No package descriptor at {}; using default manifest values",
                path.display()
            ));
            return PackageDescriptor::empty(directory);
        }
        Err(e) => {
            diagnostics.warn(format!("Could not read {}: {}", path.display(), e));
            return PackageDescriptor::empty(directory);
        }
    };

    let descriptor: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            diagnostics.warn(format!("Could not parse {}: {}", path.display(), e));
            return PackageDescriptor::empty(directory);
        }
    };

    let config = match descriptor.get(CONFIG_BLOCK_KEY) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(block)) => block.clone(),
        Some(_) => {
            diagnostics.warn(format!(
                "\"{CONFIG_BLOCK_KEY}\" in {} is not an object; ignoring it",
                path.display()
            ));
            Map::new()
        }
    };

    PackageDescriptor {
        package: PackageInfo::from_descriptor(&descriptor, directory),
        config,
    }
}

impl PackageDescriptor {
    fn empty(directory: &str) -> Self {
        Self {
            package: PackageInfo {
                directory: directory.to_string(),
                ..PackageInfo::default()
            },
            config: Map::new(),
        }
    }
}
