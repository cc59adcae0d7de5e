// src/grid/snapshot.rs

use crate::grid::{Cell, EdgeMap};

/// A full copy of the grid's content: every cell with its boundary regions,
/// plus the edge map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: Vec<Cell>,
    edges: EdgeMap,
}

impl GridSnapshot {
    pub(super) fn capture(cells: &[Cell], edges: &EdgeMap) -> Self {
        Self {
            cells: cells.to_vec(),
            edges: edges.clone(),
        }
    }

    pub(super) fn fits(&self, cell_count: usize) -> bool {
        self.cells.len() == cell_count
    }

    pub(super) fn apply(&self, cells: &mut [Cell], edges: &mut EdgeMap) {
        cells.clone_from_slice(&self.cells);
        edges.clone_from(&self.edges);
    }
}
