//! Module manifest: model, validation, merge, digest and consistency checks.

pub mod checks;
pub mod digest;
pub mod merge;
pub mod model;
pub mod route;
pub mod schema;

pub use checks::consistency_checks;
pub use digest::{DigestDiff, ManifestDigest};
pub use merge::{ManifestBuilder, MergeRule, PackageInfo, flatten_definition, MERGE_TABLE};
pub use model::{
    EventDefinition, HookDescriptor, JobDefinition, ModuleKind, ModuleManifest, RouteDefinition,
    ServiceDefinition, ViewDefinition,
};
pub use route::{duplicate_routes, normalize_route_path, route_key};
pub use schema::{validate_manifest, SchemaIssue};
