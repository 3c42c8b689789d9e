pub mod build;

pub use build::{
    ArtifactCollectorNode, BundleNode, CacheDiffNode, DefinitionCompileNode, EntryDiscoveryNode,
    ManifestHydratorNode, TypeCheckNode,
};
