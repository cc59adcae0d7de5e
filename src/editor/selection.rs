// src/editor/selection.rs

use std::collections::BTreeSet;

use crate::grid::{EdgeKey, Position};

/// Marked cells, or one selected boundary region. The two are mutually
/// exclusive: marking a cell drops the boundary and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    cells: BTreeSet<(usize, usize)>,
    boundary: Option<EdgeKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.boundary.is_none()
    }

    /// Number of marked cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_marked(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&(x, y))
    }

    pub fn boundary(&self) -> Option<EdgeKey> {
        self.boundary
    }

    /// Marks a cell. Returns the cells whose highlight changed.
    pub fn mark(&mut self, cell: (usize, usize)) -> Vec<(usize, usize)> {
        let mut touched = Vec::new();
        if let Some((x, y, _)) = self.boundary.take() {
            touched.push((x, y));
        }
        if self.cells.insert(cell) {
            touched.push(cell);
        }
        touched
    }

    /// Selects a single boundary region, dropping everything else. Returns
    /// the cells whose highlight changed.
    pub fn select_boundary(&mut self, key: EdgeKey) -> Vec<(usize, usize)> {
        let mut touched = self.clear();
        self.boundary = Some(key);
        touched.push((key.0, key.1));
        touched
    }

    /// Empties the selection. Returns the cells whose highlight changed.
    pub fn clear(&mut self) -> Vec<(usize, usize)> {
        let mut touched: Vec<_> = std::mem::take(&mut self.cells).into_iter().collect();
        if let Some((x, y, _)) = self.boundary.take() {
            touched.push((x, y));
        }
        touched
    }

    /// Write targets for typed input: the boundary if one is selected,
    /// otherwise every marked cell in row-major order.
    pub fn targets(&self) -> Vec<Position> {
        if let Some((x, y, index)) = self.boundary {
            return vec![Position::Boundary { x, y, index }];
        }
        let mut cells: Vec<_> = self.cells.iter().copied().collect();
        cells.sort_by_key(|&(x, y)| (y, x));
        cells.into_iter().map(|(x, y)| Position::Cell { x, y }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn marking_a_cell_drops_the_boundary() {
        let mut selection = Selection::new();
        selection.select_boundary((1, 1, 4));
        let touched = selection.mark((3, 3));
        assert_eq!(touched, vec![(1, 1), (3, 3)]);
        assert_eq!(selection.boundary(), None);
        assert!(selection.is_marked(3, 3));
    }

    #[test]
    fn selecting_a_boundary_drops_marked_cells() {
        let mut selection = Selection::new();
        selection.mark((0, 0));
        selection.mark((1, 0));
        selection.select_boundary((2, 2, 13));
        assert_eq!(selection.cell_count(), 0);
        assert_eq!(selection.targets(), vec![Position::Boundary { x: 2, y: 2, index: 13 }]);
    }

    #[test]
    fn targets_are_row_major() {
        let mut selection = Selection::new();
        selection.mark((0, 1));
        selection.mark((2, 0));
        assert_eq!(
            selection.targets(),
            vec![Position::Cell { x: 2, y: 0 }, Position::Cell { x: 0, y: 1 }]
        );
        assert_eq!(selection.clear().len(), 2);
        assert!(selection.is_empty());
    }
}
