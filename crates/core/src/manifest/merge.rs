//! Candidate manifest construction and definition merge.
//!
//! Which source wins for each field is stated once, in [`MERGE_TABLE`]:
//! the static configuration block provides the candidate, the compiled
//! module definition then overrides or extends it according to the rule.

use crate::config::constants::{
    FALLBACK_NAME_PREFIX, FALLBACK_VERSION, MANIFEST_CONTRACT_VERSION, MANIFEST_KIND,
};
use serde_json::{Map, Value};

/// How a compiled definition's field combines with the static candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// The static candidate always wins
    KeepStatic,
    /// The definition wins when it provides the field, else the candidate is kept
    PreferDefinition,
    /// Set union of both arrays: candidate items first, then new definition items
    Union,
}

/// Where a candidate field comes from when the config block omits it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StaticDefault {
    ContractVersion,
    Name,
    Version,
    Kind,
    EmptyList,
    Absent,
}

pub const MERGE_TABLE: &[(&str, MergeRule)] = &[
    ("contractVersion", MergeRule::KeepStatic),
    ("name", MergeRule::KeepStatic),
    ("version", MergeRule::KeepStatic),
    ("kind", MergeRule::KeepStatic),
    ("capabilities", MergeRule::Union),
    ("routes", MergeRule::PreferDefinition),
    ("views", MergeRule::PreferDefinition),
    ("jobs", MergeRule::PreferDefinition),
    ("events", MergeRule::PreferDefinition),
    ("services", MergeRule::PreferDefinition),
    ("init", MergeRule::PreferDefinition),
    ("dispose", MergeRule::PreferDefinition),
];

const STATIC_DEFAULTS: &[(&str, StaticDefault)] = &[
    ("contractVersion", StaticDefault::ContractVersion),
    ("name", StaticDefault::Name),
    ("version", StaticDefault::Version),
    ("kind", StaticDefault::Kind),
    ("capabilities", StaticDefault::EmptyList),
    ("routes", StaticDefault::EmptyList),
    ("views", StaticDefault::EmptyList),
    ("jobs", StaticDefault::EmptyList),
    ("events", StaticDefault::EmptyList),
    ("services", StaticDefault::EmptyList),
    ("init", StaticDefault::Absent),
    ("dispose", StaticDefault::Absent),
];

/// Identity fields read from the package descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Basename of the workspace directory, for the synthesized name
    pub directory: String,
}

impl PackageInfo {
    /// Pull `name` / `version` out of a parsed descriptor, ignoring non-strings
    pub fn from_descriptor(descriptor: &Value, directory: impl Into<String>) -> Self {
        let text = |key: &str| {
            descriptor
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            name: text("name"),
            version: text("version"),
            directory: directory.into(),
        }
    }

    pub fn default_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{FALLBACK_NAME_PREFIX}{}", self.directory))
    }

    pub fn default_version(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| FALLBACK_VERSION.to_string())
    }
}

/// Builds the manifest value field by field from the two sources
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    package: PackageInfo,
    fields: Map<String, Value>,
}

impl ManifestBuilder {
    /// Candidate manifest from the static configuration block.
    ///
    /// Scalars are taken whenever present (bad types surface in validation);
    /// collections are taken only when they are arrays.
    pub fn from_static(config: &Map<String, Value>, package: PackageInfo) -> Self {
        let mut fields = Map::new();
        for (key, default) in STATIC_DEFAULTS {
            let configured = config.get(*key).filter(|v| !v.is_null());
            let value = match (default, configured) {
                (StaticDefault::Kind, _) => Some(Value::from(MANIFEST_KIND)),
                (StaticDefault::EmptyList, Some(value)) if value.is_array() => Some(value.clone()),
                (StaticDefault::EmptyList, _) => Some(Value::Array(Vec::new())),
                (_, Some(value)) => Some(value.clone()),
                (StaticDefault::ContractVersion, None) => Some(Value::from(MANIFEST_CONTRACT_VERSION)),
                (StaticDefault::Name, None) => Some(Value::from(package.default_name())),
                (StaticDefault::Version, None) => Some(Value::from(package.default_version())),
                (StaticDefault::Absent, None) => None,
            };
            if let Some(value) = value {
                fields.insert((*key).to_string(), value);
            }
        }
        Self { package, fields }
    }

    /// Apply a flattened definition over the candidate according to [`MERGE_TABLE`]
    pub fn merge_definition(&mut self, definition: &Map<String, Value>) {
        for (key, rule) in MERGE_TABLE {
            let Some(incoming) = definition.get(*key).filter(|v| !v.is_null()) else {
                continue;
            };
            match rule {
                MergeRule::KeepStatic => {}
                MergeRule::PreferDefinition => {
                    self.fields.insert((*key).to_string(), incoming.clone());
                }
                MergeRule::Union => {
                    let merged = match (self.fields.get(*key), incoming) {
                        (Some(Value::Array(current)), Value::Array(extra)) => {
                            Value::Array(union(current, extra))
                        }
                        // Not a list: hand it to validation untouched
                        _ => incoming.clone(),
                    };
                    self.fields.insert((*key).to_string(), merged);
                }
            }
        }
    }

    pub fn value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Name and version for the minimal fallback manifest.
    ///
    /// Uses the candidate's own values when they are usable strings, else the
    /// package defaults, so the fallback always validates.
    pub fn fallback_identity(&self) -> (String, String) {
        let usable = |key: &str| {
            self.fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        (
            usable("name").unwrap_or_else(|| self.package.default_name()),
            usable("version").unwrap_or_else(|| self.package.default_version()),
        )
    }
}

fn union(current: &[Value], extra: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(current.len() + extra.len());
    for item in current.iter().chain(extra) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Normalize a loaded definition export into manifest-shaped fields.
///
/// Fields of a nested `manifest` object are hoisted; top-level fields win over
/// hoisted ones. Route and view entries carrying a `.definition` sub-object are
/// replaced by it, dropping handler references.
pub fn flatten_definition(export: &Value) -> Map<String, Value> {
    let Some(root) = export.as_object() else {
        return Map::new();
    };

    let mut flat = root
        .get("manifest")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (key, value) in root {
        if key != "manifest" && !value.is_null() {
            flat.insert(key.clone(), value.clone());
        }
    }

    for key in ["routes", "views"] {
        if let Some(Value::Array(items)) = flat.get_mut(key) {
            for item in items.iter_mut() {
                if let Some(definition) = item.get("definition").filter(|d| d.is_object()) {
                    *item = definition.clone();
                }
            }
        }
    }
    flat
}
