//! Manifest hydration from the package descriptor and a compiled definition.

pub mod hydrator;
pub mod loader;
pub mod package;

pub use hydrator::ManifestHydrator;
pub use loader::{DefinitionLoader, JsonDefinitionLoader, LoadOutcome, NodeDefinitionLoader};
pub use package::{read_descriptor, PackageDescriptor};
