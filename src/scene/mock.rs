// src/scene/mock.rs

use crate::scene::{Layer, NodeId, Primitive, Surface};
use anyhow::Result;
use std::collections::BTreeMap;

/// A `Surface` that only remembers what it was given.
///
/// Used by tests and by the inspection binary to count what a frame draws.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    nodes: BTreeMap<NodeId, (Layer, Vec<Primitive>)>,
    flushes: usize,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn node(&self, id: NodeId) -> Option<&[Primitive]> {
        self.nodes.get(&id).map(|(_, group)| group.as_slice())
    }

    /// Every primitive currently on `layer`, in insertion order.
    pub fn primitives_on(&self, layer: Layer) -> Vec<&Primitive> {
        self.nodes
            .values()
            .filter(|(l, _)| *l == layer)
            .flat_map(|(_, group)| group.iter())
            .collect()
    }

    /// Every text string currently on `layer`.
    pub fn texts_on(&self, layer: Layer) -> Vec<String> {
        self.primitives_on(layer)
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn add(&mut self, layer: Layer, group: Vec<Primitive>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, (layer, group));
        id
    }

    fn remove(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.clears += 1;
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
