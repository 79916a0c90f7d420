//! Draw-order buckets of shape names

use crate::{Error, Result};
use indexmap::IndexSet;

/// Dense, index-addressed layer buckets.
///
/// Layer `n` always exists once any layer `>= n` does; unused layers are
/// empty buckets. Each bucket keeps its names in insertion order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LayerStack {
    buckets: Vec<IndexSet<String>>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layers, including empty ones
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Grows the stack with empty buckets until `layer` exists
    pub fn ensure(&mut self, layer: usize) {
        if layer >= self.buckets.len() {
            self.buckets.resize_with(layer + 1, IndexSet::new);
        }
    }

    pub fn insert(&mut self, layer: usize, name: &str) {
        self.ensure(layer);
        self.buckets[layer].insert(name.to_string());
    }

    /// Removes `name` from whichever bucket holds it, returning that layer
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let layer = self.layer_of(name)?;
        self.buckets[layer].shift_remove(name);
        Some(layer)
    }

    pub fn layer_of(&self, name: &str) -> Option<usize> {
        self.buckets.iter().position(|bucket| bucket.contains(name))
    }

    pub fn bucket(&self, layer: usize) -> Option<&IndexSet<String>> {
        self.buckets.get(layer)
    }

    /// Exchanges the contents of two existing layers
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        for layer in [a, b] {
            if layer >= self.buckets.len() {
                return Err(Error::UnknownEntity(format!("layer {layer}")));
            }
        }
        self.buckets.swap(a, b);
        Ok(())
    }

    /// Empties a layer, returning the names it held. The bucket itself stays.
    pub fn clear(&mut self, layer: usize) -> Result<IndexSet<String>> {
        let bucket = self
            .buckets
            .get_mut(layer)
            .ok_or_else(|| Error::UnknownEntity(format!("layer {layer}")))?;
        Ok(std::mem::take(bucket))
    }

    /// Buckets from the bottom layer up
    pub fn iter(&self) -> impl Iterator<Item = &IndexSet<String>> + '_ {
        self.buckets.iter()
    }
}
