// src/grid/edges.rs

//! Edge lines keyed by `(x, y, region index)`.

use std::collections::BTreeMap;

use crate::color::Ink;
use crate::scene::LineWeight;

/// `(cell x, cell y, boundary region index)`.
pub type EdgeKey = (usize, usize, usize);

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub weight: LineWeight,
    pub ink: Ink,
}

/// An edge line along one side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub stroke: Stroke,
    /// Drawn while authoring; survives solver resets and solver toggles.
    pub locked: bool,
}

/// All edge lines of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeMap {
    entries: BTreeMap<EdgeKey, Edge>,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&Edge> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &EdgeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: EdgeKey, edge: Edge) -> Option<Edge> {
        self.entries.insert(key, edge)
    }

    pub fn remove(&mut self, key: &EdgeKey) -> Option<Edge> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.entries.iter()
    }

    /// Entries belonging to cell `(x, y)`.
    pub fn for_cell(&self, x: usize, y: usize) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.entries.range((x, y, 0)..=(x, y, usize::MAX))
    }

    pub fn retain(&mut self, keep: impl FnMut(&EdgeKey, &mut Edge) -> bool) {
        self.entries.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn edge(locked: bool) -> Edge {
        Edge {
            stroke: Stroke { weight: LineWeight::Fat, ink: Ink::Palette(0) },
            locked,
        }
    }

    #[test]
    fn for_cell_only_yields_that_cell() {
        let mut edges = EdgeMap::new();
        edges.insert((1, 1, 12), edge(true));
        edges.insert((1, 1, 13), edge(false));
        edges.insert((1, 2, 12), edge(true));
        edges.insert((2, 1, 12), edge(true));
        let keys: Vec<_> = edges.for_cell(1, 1).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![(1, 1, 12), (1, 1, 13)]);
    }

    #[test]
    fn retain_drops_unlocked_entries() {
        let mut edges = EdgeMap::new();
        edges.insert((0, 0, 12), edge(true));
        edges.insert((0, 0, 13), edge(false));
        edges.retain(|_, e| e.locked);
        assert_eq!(edges.len(), 1);
        assert!(edges.contains(&(0, 0, 12)));
    }
}
