// Pipeline core - pure logic framework

use super::keys::TypedKey;
use crate::diagnostic::Diagnostics;
use crate::error::{ModkitError, Result};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use tracing::debug;

/// Pipeline data map for passing data between nodes
#[derive(Default)]
pub struct PipeMap {
    data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl PipeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value with a typed key (compile-time type checking)
    pub fn insert_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>, value: T) {
        self.data.insert(key.name().to_string(), Box::new(value));
    }

    /// Get a value with a typed key (compile-time type checking)
    pub fn get_typed<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Option<&T> {
        self.data
            .get(key.name())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_typed_mut<T: Any + Send + Sync>(&mut self, key: TypedKey<T>) -> Option<&mut T> {
        self.data
            .get_mut(key.name())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Remove a value, handing ownership back to the caller
    pub fn take_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>) -> Option<T> {
        let boxed = self.data.remove(key.name())?;
        match boxed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.data.insert(key.name().to_string(), other);
                None
            }
        }
    }

    /// Typed lookup that fails with a missing-input error
    pub fn require<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Result<&T> {
        self.get_typed(key)
            .ok_or_else(|| ModkitError::missing_input(key.name()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }
}

/// Pipeline node trait.
///
/// Nodes mutate the shared map in place and push diagnostics as they go, so
/// both survive a node failing part-way through a run.
#[async_trait]
pub trait PipeNode: Send + Sync {
    fn name(&self) -> String;
    fn input(&self) -> Vec<String>;
    fn output(&self) -> Vec<String>;

    async fn process(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()>;
}

/// Pipeline - orchestrates sequential execution of nodes
pub struct Pipeline {
    name: String,
    nodes: Vec<Box<dyn PipeNode + Send + Sync>>,
    external_inputs: Vec<String>,
}

impl Pipeline {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            external_inputs: Vec::new(),
        }
    }

    pub fn with_external_inputs(mut self, inputs: Vec<String>) -> Self {
        self.external_inputs = inputs;
        self
    }

    pub fn add_node(mut self, node: Box<dyn PipeNode + Send + Sync>) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Run every node in order, stopping at the first error
    pub async fn execute(&self, data: &mut PipeMap, diagnostics: &mut Diagnostics) -> Result<()> {
        if let Some(missing) = self.external_inputs.iter().find(|i| !data.contains(i)) {
            return Err(ModkitError::missing_input(missing.clone()));
        }

        for node in &self.nodes {
            debug!(
                "[{}] running {} ({:?} -> {:?})",
                self.name,
                node.name(),
                node.input(),
                node.output()
            );
            node.process(data, diagnostics).await?;
        }
        Ok(())
    }
}
