//! Registry of precision types shared across layers

use std::collections::HashSet;

use crate::model::{Layer, PrecisionType};

/// Precision types of a model, deduplicated by name
///
/// Iteration order is the order in which names were first seen. A later
/// layer that reuses a name (for example an in-place buffer aliasing an
/// upstream tensor) neither replaces nor duplicates the earlier entry.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: Vec<PrecisionType>,
    names: HashSet<String>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the types of every layer, in graph order
    pub fn register_all(layers: &[Layer]) -> Self {
        let mut registry = Self::new();
        for layer in layers {
            for ty in layer.types() {
                registry.register(ty);
            }
        }
        registry
    }

    /// Register a type unless its name is already present
    ///
    /// Returns whether the type was inserted.
    pub fn register(&mut self, ty: &PrecisionType) -> bool {
        if self.names.contains(ty.name()) {
            return false;
        }
        self.names.insert(ty.name().to_string());
        self.types.push(ty.clone());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Registered types in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &PrecisionType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Concatenate the definitions of all registered types
    pub fn render_all(&self) -> String {
        self.types.iter().map(|t| t.render_definition()).collect()
    }
}
