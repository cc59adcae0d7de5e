// src/grid/mod.rs

//! The cell store.
//!
//! `Grid` owns every cell, the edge map and the set of cells whose visuals
//! changed since the renderer last looked. All content writes go through
//! `Grid::set_cell` (text, marks, fills, resets) or one of the boundary
//! toggles (edges, centerlines, crosses).

pub mod cell;
pub mod edges;
pub mod snapshot;
pub mod validator;

#[cfg(test)]
mod tests;

use log::{trace, warn};
use std::collections::BTreeSet;

use crate::color::Ink;
use crate::layout::{Layout, RegionKind, Side};
use crate::symbols;

pub use cell::{BoundaryRegion, Cell, Content, DigitSet, LockType, Mark};
pub use edges::{Edge, EdgeKey, EdgeMap, Stroke};
pub use snapshot::GridSnapshot;

/// Where a write lands: a cell, or one of its boundary regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Cell { x: usize, y: usize },
    Boundary { x: usize, y: usize, index: usize },
}

impl Position {
    pub fn cell(&self) -> (usize, usize) {
        match *self {
            Position::Cell { x, y } | Position::Boundary { x, y, .. } => (x, y),
        }
    }
}

/// Which part of a cell a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMode {
    Normal,
    Center,
    Corner,
    Color,
    Reset,
}

/// One `set_cell` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit<'a> {
    /// Authoring writes lock normal content and may overwrite locked cells.
    pub authoring: bool,
    pub mode: EntryMode,
    /// Palette index; for color mode the fill, otherwise the ink.
    pub color: u8,
    pub text: &'a str,
    pub background: bool,
    /// Append to existing text instead of replacing it.
    pub multi_digit: bool,
}

impl<'a> Edit<'a> {
    /// An authoring write in palette color 0.
    pub fn new(mode: EntryMode, text: &'a str) -> Self {
        Self {
            authoring: true,
            mode,
            color: 0,
            text,
            background: false,
            multi_digit: false,
        }
    }

    pub fn solving(mut self) -> Self {
        self.authoring = false;
        self
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }
}

/// The grid of cells plus the edge map.
#[derive(Debug, Clone)]
pub struct Grid {
    layout: Layout,
    /// Row-major.
    cells: Vec<Cell>,
    edges: EdgeMap,
    dirty: BTreeSet<(usize, usize)>,
}

impl Grid {
    pub fn new(layout: Layout) -> Self {
        let mut cells = Vec::with_capacity(layout.cols * layout.rows);
        for y in 0..layout.rows {
            for x in 0..layout.cols {
                cells.push(Cell::new(
                    x,
                    y,
                    layout.is_main_grid(x, y),
                    layout.corner_mark_capacity(x, y),
                    &layout.regions(x, y),
                ));
            }
        }
        Self {
            layout,
            cells,
            edges: EdgeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.layout.contains(x, y).then(|| y * self.layout.cols + x)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        let i = self.index(x, y)?;
        Some(&mut self.cells[i])
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn region(&self, x: usize, y: usize, index: usize) -> Option<&BoundaryRegion> {
        self.cell(x, y)?.boundary(index)
    }

    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub fn has_edge(&self, key: EdgeKey) -> bool {
        self.edges.contains(&key)
    }

    /// Writes into a cell or boundary region.
    ///
    /// Returns `false` when a guard rejected the write: outside the grid,
    /// a solver writing marks outside the main grid, a solver touching a
    /// locked clue, or an unknown boundary index.
    pub fn set_cell(&mut self, pos: Position, edit: &Edit<'_>) -> bool {
        let (x, y) = pos.cell();
        let Some(cell) = self.cell_mut(x, y) else {
            trace!("set_cell outside the grid at ({}, {})", x, y);
            return false;
        };
        if !cell.main_grid && !edit.authoring && !matches!(edit.mode, EntryMode::Normal | EntryMode::Reset) {
            trace!("Ignoring {:?} write to margin cell ({}, {})", edit.mode, x, y);
            return false;
        }
        if cell.is_locked() && !edit.authoring && !matches!(edit.mode, EntryMode::Color | EntryMode::Reset) {
            trace!("Ignoring {:?} write to locked cell ({}, {})", edit.mode, x, y);
            return false;
        }

        match (pos, edit.mode) {
            (_, EntryMode::Reset) => {
                cell.reset(edit.authoring);
                let authoring = edit.authoring;
                self.edges
                    .retain(|&(ex, ey, _), e| (ex, ey) != (x, y) || (e.locked && !authoring));
            }
            (Position::Cell { .. }, _) => cell.apply(edit),
            (Position::Boundary { index, .. }, EntryMode::Normal) => {
                let Some(boundary) = cell.boundary_mut(index) else {
                    warn!("Cell ({}, {}) has no boundary region {}", x, y, index);
                    return false;
                };
                let ink = if edit.authoring { Ink::Palette(edit.color) } else { Ink::Solver };
                symbols::set_symbol(&mut boundary.content, edit.text, ink, edit.background, edit.multi_digit);
            }
            (Position::Boundary { .. }, mode) => {
                trace!("{:?} writes do not apply to boundary regions", mode);
                return false;
            }
        }
        self.mark_dirty(x, y);
        true
    }

    /// Adds or removes the edge line on an edge region.
    ///
    /// Solvers cannot remove locked edges. Returns whether the map changed.
    pub fn set_edge(&mut self, key: EdgeKey, on: bool, stroke: Stroke, authoring: bool) -> bool {
        if !self.is_region_kind(key, RegionKind::Edge) {
            return false;
        }
        let changed = match (on, self.edges.get(&key)) {
            (true, None) => {
                self.edges.insert(key, Edge { stroke, locked: authoring });
                true
            }
            (false, Some(edge)) if authoring || !edge.locked => {
                self.edges.remove(&key);
                true
            }
            _ => false,
        };
        if changed {
            self.mark_dirty(key.0, key.1);
        }
        changed
    }

    pub fn has_centerline(&self, key: EdgeKey) -> bool {
        self.region(key.0, key.1, key.2).is_some_and(|b| b.centerline.is_some())
    }

    /// Adds or removes a centerline across an edge region. Edges on the outer
    /// border of the main grid cannot carry one.
    pub fn set_centerline(&mut self, key: EdgeKey, on: bool, stroke: Stroke) -> bool {
        if !self.centerline_allowed(key) {
            trace!("No centerline across {:?}", key);
            return false;
        }
        let (x, y, index) = key;
        let Some(boundary) = self.cell_mut(x, y).and_then(|c| c.boundary_mut(index)) else {
            return false;
        };
        let next = on.then_some(stroke);
        if boundary.centerline.is_some() == on {
            return false;
        }
        boundary.centerline = next;
        self.mark_dirty(x, y);
        true
    }

    fn centerline_allowed(&self, (x, y, index): EdgeKey) -> bool {
        let Some(region) = self.region(x, y, index) else {
            return false;
        };
        if region.kind != RegionKind::Edge {
            return false;
        }
        let layout = &self.layout;
        let last_col = layout.left + layout.main_cols();
        let last_row = layout.top + layout.main_rows();
        match region.side {
            Some(Side::Left) => x > layout.left,
            Some(Side::Top) => y > layout.top,
            Some(Side::Right) => x + 1 < last_col,
            Some(Side::Bottom) => y + 1 < last_row,
            None => false,
        }
    }

    pub fn has_boundary_cross(&self, key: EdgeKey) -> bool {
        self.region(key.0, key.1, key.2).is_some_and(|b| b.cross)
    }

    pub fn set_boundary_cross(&mut self, (x, y, index): EdgeKey, on: bool) -> bool {
        let Some(boundary) = self.cell_mut(x, y).and_then(|c| c.boundary_mut(index)) else {
            return false;
        };
        if boundary.cross == on {
            return false;
        }
        boundary.cross = on;
        self.mark_dirty(x, y);
        true
    }

    pub fn set_cell_cross(&mut self, x: usize, y: usize, on: bool) -> bool {
        let Some(cell) = self.cell_mut(x, y) else {
            return false;
        };
        if cell.cross == on {
            return false;
        }
        cell.cross = on;
        self.mark_dirty(x, y);
        true
    }

    fn is_region_kind(&self, (x, y, index): EdgeKey, kind: RegionKind) -> bool {
        self.region(x, y, index).is_some_and(|b| b.kind == kind)
    }

    pub fn mark_dirty(&mut self, x: usize, y: usize) {
        if self.layout.contains(x, y) {
            self.dirty.insert((x, y));
        }
    }

    pub fn mark_all_dirty(&mut self) {
        for y in 0..self.layout.rows {
            for x in 0..self.layout.cols {
                self.dirty.insert((x, y));
            }
        }
    }

    /// Returns the cells changed since the last call and forgets them.
    pub fn take_dirty_cells(&mut self) -> Vec<(usize, usize)> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.cells, &self.edges)
    }

    /// Restores a snapshot taken from a grid of the same shape.
    pub fn restore(&mut self, snapshot: &GridSnapshot) {
        if !snapshot.fits(self.cells.len()) {
            warn!("Ignoring snapshot taken from a differently sized grid.");
            return;
        }
        snapshot.apply(&mut self.cells, &mut self.edges);
        self.mark_all_dirty();
    }
}
