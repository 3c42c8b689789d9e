use crate::config::constants::MANIFEST_CONTRACT_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Module kind. Only backend modules are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    #[default]
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lifecycle hook (`init` / `dispose`) descriptor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Validated description of a backend module's public surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    pub contract_version: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub kind: ModuleKind,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
    #[serde(default)]
    pub jobs: Vec<JobDefinition>,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<HookDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispose: Option<HookDescriptor>,
}

impl ModuleManifest {
    /// Name, version and kind only; every collection empty
    pub fn minimal(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            contract_version: MANIFEST_CONTRACT_VERSION.to_string(),
            name: name.into(),
            version: version.into(),
            kind: ModuleKind::Backend,
            capabilities: Vec::new(),
            routes: Vec::new(),
            views: Vec::new(),
            jobs: Vec::new(),
            events: Vec::new(),
            services: Vec::new(),
            init: None,
            dispose: None,
        }
    }

    /// Capabilities compared as a set; display order lives in `capabilities`
    pub fn capability_set(&self) -> BTreeSet<&str> {
        self.capabilities.iter().map(String::as_str).collect()
    }

    pub fn has_surface(&self) -> bool {
        !self.jobs.is_empty() || !self.events.is_empty() || !self.services.is_empty()
    }
}
