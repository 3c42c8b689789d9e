// Pipeline module for I/O operations

pub mod nodes;

// Re-export commonly used types from core
pub use modkit_core::pipeline::{PipeMap, PipeNode, Pipeline};

pub use nodes::*;

/// The build pipeline: type-check, discover, bundle, compile the definition,
/// collect artifacts, hydrate the manifest, diff against the previous build
pub fn build_pipeline() -> Pipeline {
    Pipeline::new("ModkitBuildPipeline")
        .with_external_inputs(vec!["context".to_string(), "sessions".to_string()])
        .add_node(Box::new(TypeCheckNode))
        .add_node(Box::new(EntryDiscoveryNode))
        .add_node(Box::new(BundleNode))
        .add_node(Box::new(DefinitionCompileNode))
        .add_node(Box::new(ArtifactCollectorNode))
        .add_node(Box::new(ManifestHydratorNode))
        .add_node(Box::new(CacheDiffNode))
}
