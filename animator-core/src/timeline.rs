//! The timeline: every shape of an animation, its layers and canvas

use crate::geometry::Bounds;
use crate::keyframe::Keyframe;
use crate::layers::LayerStack;
use crate::motion::Motion;
use crate::shape::{Shape, ShapeKind};
use crate::{Error, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Owns all shapes of an animation, keyed by name in insertion order.
///
/// Every shape also sits in exactly one layer bucket, the one its own layer
/// field names. All mutations keep the two in step.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Timeline {
    bounds: Bounds,
    shapes: IndexMap<String, Shape>,
    layers: LayerStack,
}

impl Timeline {
    /// Creates an empty timeline drawn into `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            shapes: IndexMap::new(),
            layers: LayerStack::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Adds a shape; its name must not be taken
    pub fn add_shape(&mut self, shape: Shape) -> Result<()> {
        if shape.name().is_empty() {
            return Err(Error::InvalidValue("a shape needs a name".to_string()));
        }
        if self.shapes.contains_key(shape.name()) {
            return Err(Error::DuplicateEntity(shape.name().to_string()));
        }
        debug!(shape = shape.name(), kind = %shape.kind(), layer = shape.layer(), "adding shape");
        self.layers.insert(shape.layer(), shape.name());
        self.shapes.insert(shape.name().to_string(), shape);
        Ok(())
    }

    /// Creates and adds a shape with the default initial state
    pub fn declare_shape(&mut self, name: &str, kind: ShapeKind, layer: usize) -> Result<()> {
        self.add_shape(Shape::new(name, kind).on_layer(layer))
    }

    /// Removes a shape and its layer membership, returning it
    pub fn remove_shape(&mut self, name: &str) -> Result<Shape> {
        let shape = self
            .shapes
            .shift_remove(name)
            .ok_or_else(|| Error::UnknownEntity(format!("shape {name}")))?;
        self.layers.remove(name);
        debug!(shape = name, "removed shape");
        Ok(shape)
    }

    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    pub(crate) fn shape_mut(&mut self, name: &str) -> Result<&mut Shape> {
        self.shapes
            .get_mut(name)
            .ok_or_else(|| Error::UnknownEntity(format!("shape {name}")))
    }

    pub(crate) fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> + '_ {
        self.shapes.values_mut()
    }

    pub fn add_motion(&mut self, motion: Motion) -> Result<()> {
        self.add_motions([motion])
    }

    /// Adds motions in order, recording a keyframe at both ends of each.
    ///
    /// The start keyframe is the shape's state at the motion's start; the
    /// end keyframe is its state at the motion's end with the motion
    /// applied. The batch is all or nothing: if any motion is rejected no
    /// shape changes.
    pub fn add_motions<I>(&mut self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = Motion>,
    {
        let mut staged = self.shapes.clone();
        for motion in batch {
            let name = motion.shape().to_string();
            let shape = staged
                .get_mut(&name)
                .ok_or_else(|| Error::UnknownEntity(format!("shape {name}")))?;
            let (start, end) = (motion.start(), motion.end());

            shape.add_motion(motion.clone())?;

            let first = Keyframe::new(start, name.as_str(), *shape.state_at(start).state());
            let mut last_state = *shape.state_at(end).state();
            motion.apply(&mut last_state, end);
            let last = Keyframe::new(end, name.as_str(), last_state);

            shape.add_keyframe(first)?;
            shape.add_keyframe(last)?;
        }
        self.shapes = staged;
        Ok(())
    }

    /// Adds a keyframe to the shape it names
    pub fn add_keyframe(&mut self, frame: Keyframe) -> Result<()> {
        self.shape_mut(&frame.shape)?.add_keyframe(frame)
    }

    pub fn remove_keyframe(&mut self, name: &str, tick: u32) -> Result<()> {
        self.shape_mut(name)?.remove_keyframe(tick)
    }

    pub fn remove_motion(&mut self, motion: &Motion) -> Result<()> {
        self.shape_mut(motion.shape())?.remove_motion(motion)
    }

    /// Advances every shape's live state by one tick; see [`Shape::apply_motion`]
    pub fn update(&mut self, tick: u32) {
        for shape in self.shapes.values_mut() {
            shape.apply_motion(tick);
        }
    }

    /// Sets every shape to its computed state at `tick`
    pub fn set_state_to(&mut self, tick: u32) {
        for shape in self.shapes.values_mut() {
            *shape = shape.state_at(tick);
        }
    }

    /// Pure point query for one shape
    pub fn state_of(&self, name: &str, tick: u32) -> Result<Shape> {
        self.shape(name)
            .map(|shape| shape.state_at(tick))
            .ok_or_else(|| Error::UnknownEntity(format!("shape {name}")))
    }

    /// Owned snapshot of every shape, in insertion order
    pub fn shapes(&self) -> IndexMap<String, Shape> {
        self.shapes.clone()
    }

    /// Owned snapshot of every layer bucket, bottom layer first
    pub fn shapes_by_layer(&self) -> Vec<IndexMap<String, Shape>> {
        self.layers
            .iter()
            .map(|bucket| {
                bucket
                    .iter()
                    .filter_map(|name| self.shapes.get_key_value(name))
                    .map(|(name, shape)| (name.clone(), shape.clone()))
                    .collect()
            })
            .collect()
    }

    /// Latest end tick over all shapes, or 0 for an empty timeline
    pub fn last_tick(&self) -> u32 {
        self.shapes
            .values()
            .filter_map(Shape::end_tick)
            .max()
            .unwrap_or(0)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Moves a shape to another layer, creating the layer if needed
    pub fn change_shape_layer(&mut self, name: &str, layer: usize) -> Result<()> {
        self.shape_mut(name)?.set_layer(layer);
        self.layers.remove(name);
        self.layers.insert(layer, name);
        debug!(shape = name, layer, "changed shape layer");
        Ok(())
    }

    /// Swaps two existing layers along with every shape in them
    pub fn reorder(&mut self, a: usize, b: usize) -> Result<()> {
        self.layers.swap(a, b)?;
        for layer in [a, b] {
            let names: Vec<String> = self
                .layers
                .bucket(layer)
                .map(|bucket| bucket.iter().cloned().collect())
                .unwrap_or_default();
            for name in names {
                if let Some(shape) = self.shapes.get_mut(&name) {
                    shape.set_layer(layer);
                }
            }
        }
        debug!(a, b, "reordered layers");
        Ok(())
    }

    /// Makes sure `layer` exists. Existing layers are left alone.
    pub fn add_layer(&mut self, layer: usize) {
        self.layers.ensure(layer);
    }

    /// Removes every shape on `layer`. The emptied layer keeps its place.
    pub fn delete_layer(&mut self, layer: usize) -> Result<()> {
        let names = self.layers.clear(layer)?;
        for name in &names {
            self.shapes.shift_remove(name);
        }
        debug!(layer, removed = names.len(), "deleted layer");
        Ok(())
    }
}
