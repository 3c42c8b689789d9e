use crate::artifact::ArtifactRecord;
use crate::manifest::ModuleManifest;
use crate::outputs::OutputSizeMap;
/// Type-safe keys for PipeMap
use std::marker::PhantomData;
use std::path::PathBuf;

/// A type-safe key for PipeMap that enforces compile-time type checking
pub struct TypedKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> TypedKey<T> {
    /// Create a new typed key with a static name
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// Get the key name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> {}

/// Discovered entry files, absolute
pub const ENTRIES: TypedKey<Vec<PathBuf>> = TypedKey::new("entries");

/// Entry signature of the discovered set
pub const ENTRY_SIGNATURE: TypedKey<String> = TypedKey::new("entry_signature");

/// Output sizes reported by the bundler
pub const OUTPUT_SIZES: TypedKey<OutputSizeMap> = TypedKey::new("output_sizes");

/// Whether sourcemaps were emitted this run
pub const SOURCEMAPS: TypedKey<bool> = TypedKey::new("sourcemaps");

/// Collected artifacts
pub const ARTIFACTS: TypedKey<Vec<ArtifactRecord>> = TypedKey::new("artifacts");

/// Build-root-relative entry points
pub const ENTRY_POINTS: TypedKey<Vec<String>> = TypedKey::new("entry_points");

/// Hydrated module manifest
pub const MANIFEST: TypedKey<ModuleManifest> = TypedKey::new("manifest");
