// src/editor/methods.rs

//! Public operations of the editing session: loading and saving puzzles,
//! typed input on the selection, history and checking.

use anyhow::{bail, Context, Result};
use log::{debug, info, trace};
use std::collections::BTreeMap;

use super::{Editor, Mode, Selection};
use crate::codec::{self, CellRecord, EdgeRecord, PuzzleRecord};
use crate::color::{Ink, CLEAR_COLOR_INDEX};
use crate::config::{GridConfig, GridConfigPatch, ModeConfig};
use crate::decoration::Decoration;
use crate::grid::{validator, Edit, EntryMode, Grid, Mark, Position, Stroke};
use crate::layout::Layout;
use crate::renderer::Frame;
use crate::scene::Surface;

impl Editor {
    // --- Scene ---

    /// Rebuilds the whole scene. With a puzzle code (or share link) the
    /// puzzle is loaded and its own grid geometry wins over `config`; a
    /// code that fails to decode leaves the session untouched.
    pub fn render(&mut self, code: Option<&str>, surface: &mut dyn Surface, config: GridConfig) -> Result<()> {
        match code {
            Some(code) => {
                let code = codec::code_from_url(code).unwrap_or_else(|| code.to_string());
                let record = codec::decode(&code).context("Failed to load puzzle")?;
                self.load_record(&record, true)?;
            }
            None => {
                let record = PuzzleRecord {
                    grid: config,
                    ..PuzzleRecord::default()
                };
                self.load_record(&record, true)?;
            }
        }
        self.draw(surface)
    }

    /// Draws whatever changed since the last draw.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let dirty = self.grid.take_dirty_cells();
        let frame = Frame {
            grid: &self.grid,
            decorations: &self.decorations,
            pending: self.pending.as_ref(),
            selection: &self.selection,
            dirty_cells: &dirty,
            decorations_dirty: self.decorations_dirty,
            full: self.full_redraw,
        };
        self.renderer.draw(surface, &frame)?;
        self.full_redraw = false;
        self.decorations_dirty = false;
        Ok(())
    }

    /// Changes grid geometry while keeping the authored content. Content
    /// that no longer fits is dropped; the undo history is cleared.
    pub fn update_grid(&mut self, surface: &mut dyn Surface, patch: &GridConfigPatch) -> Result<()> {
        let metadata = self.metadata.clone();
        let mut record = self.to_record(&metadata);
        record.grid = patch.apply_to(&self.grid_config);
        info!(
            "Updating grid geometry to {}x{} (+{}/{}/{}/{})",
            record.grid.width, record.grid.height, record.grid.left, record.grid.right, record.grid.top, record.grid.bottom
        );
        self.load_record(&record, false)?;
        self.draw(surface)
    }

    /// Switches mode and styles. A mode change cancels any drag and drops a
    /// selected boundary region.
    pub fn set_mode(&mut self, config: ModeConfig) {
        if config.mode != self.mode.mode {
            debug!("Mode {:?} -> {:?}", self.mode.mode, config.mode);
            self.clear_boundary_selection();
        }
        self.cancel_drag();
        self.mode = config;
    }

    // --- Typed input ---

    /// Writes `text` into every selected cell, or the selected boundary
    /// region, using the current mode.
    ///
    /// While solving, normal entry into more than one cell becomes center
    /// marks.
    pub fn set_number(&mut self, text: &str) {
        let Some(mut mode) = self.mode.mode.entry_mode() else {
            trace!("{:?} mode takes no typed input", self.mode.mode);
            return;
        };
        if self.mode.solve_mode && mode == EntryMode::Normal && self.selection.cell_count() > 1 {
            mode = EntryMode::Center;
        }
        let edit = Edit {
            authoring: self.is_authoring(),
            mode,
            color: self.color,
            text,
            background: self.mode.number_background,
            multi_digit: self.mode.multi_digit,
        };
        let targets = self.selection.targets();
        self.apply_edit(&targets, &edit);
    }

    /// Selects a palette color; in color mode it is also applied to the
    /// selection.
    pub fn set_color(&mut self, index: u8) {
        self.color = index;
        if self.mode.mode.entry_mode() != Some(EntryMode::Color) {
            return;
        }
        let edit = Edit {
            authoring: self.is_authoring(),
            ..Edit::new(EntryMode::Color, "").with_color(index)
        };
        let targets = self.selection.targets();
        self.apply_edit(&targets, &edit);
    }

    /// Deletes under the selection.
    ///
    /// While authoring with the cage or path tool this removes the most
    /// recently added decoration through the cursor cell. Otherwise the
    /// selected cells or boundary region are cleared for the current entry
    /// mode.
    pub fn delete_selection(&mut self) {
        let authoring = self.is_authoring();
        if authoring && matches!(self.mode.mode, Mode::Cage | Mode::Path) {
            let Some(cell) = self.cursor else {
                return;
            };
            if let Some(i) = self.decorations.iter().rposition(|d| d.contains(cell)) {
                let before = self.snapshot();
                let removed = self.decorations.remove(i);
                debug!("Deleted decoration {:?} at {:?}", removed, cell);
                self.history.record(before);
                self.decorations_dirty = true;
            }
            return;
        }
        let Some(mode) = self.mode.mode.entry_mode() else {
            return;
        };
        let color = if mode == EntryMode::Color { CLEAR_COLOR_INDEX } else { self.color };
        let edit = Edit {
            authoring,
            ..Edit::new(mode, "").with_color(color)
        };
        let targets = self.selection.targets();
        self.apply_edit(&targets, &edit);
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                debug!("Undo");
                self.restore(previous);
                true
            }
            None => {
                trace!("Nothing to undo.");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                debug!("Redo");
                self.restore(next);
                true
            }
            None => {
                trace!("Nothing to redo.");
                false
            }
        }
    }

    /// Resets every cell. A solver reset keeps the authored clues and
    /// edges; an authoring reset clears everything but the decorations.
    /// Not undoable: both history stacks are cleared.
    pub fn reset(&mut self) {
        let authoring = self.is_authoring();
        info!("Resetting grid ({})", if authoring { "authoring" } else { "solving" });
        let edit = Edit {
            authoring,
            ..Edit::new(EntryMode::Reset, "")
        };
        let (cols, rows) = (self.grid.layout().cols, self.grid.layout().rows);
        for y in 0..rows {
            for x in 0..cols {
                self.grid.set_cell(Position::Cell { x, y }, &edit);
            }
        }
        self.cancel_drag();
        self.clear_selection();
        self.history.clear();
        self.full_redraw = true;
    }

    // --- Checking and sharing ---

    /// Checks the main grid as a classic sudoku.
    pub fn check(&self) -> (bool, String) {
        validator::check_sudoku(&self.grid)
    }

    /// Encodes the puzzle and returns its share link.
    pub fn generate_url(&mut self, metadata: &str) -> Result<String> {
        let record = self.to_record(metadata);
        let code = codec::encode(&record)?;
        self.metadata = metadata.to_string();
        Ok(codec::puzzle_url(&self.url_origin, &code))
    }

    /// Reads the metadata of a puzzle code or share link without loading it.
    pub fn get_metadata(&self, code: &str) -> Result<String> {
        let code = codec::code_from_url(code).unwrap_or_else(|| code.to_string());
        codec::read_metadata(&code)
    }

    // --- Records ---

    /// Captures the authored state: locked clues and symbols, author fills,
    /// boundary symbols, locked edges and decorations.
    pub fn to_record(&self, metadata: &str) -> PuzzleRecord {
        let mut cells = Vec::new();
        for cell in self.grid.cells() {
            let (x, y) = (cell.x, cell.y);
            for mark in authored(&[&cell.content.text, &cell.content.symbol]) {
                cells.push(CellRecord::Clue {
                    x,
                    y,
                    text: mark.0.text.clone(),
                    color: mark.1,
                    background: mark.0.background,
                });
            }
            if let Some(color) = cell.author_fill {
                cells.push(CellRecord::ColorFill { x, y, color });
            }
            for boundary in &cell.boundaries {
                for mark in authored(&[&boundary.content.text, &boundary.content.symbol]) {
                    cells.push(CellRecord::BoundarySymbol {
                        x,
                        y,
                        index: boundary.index,
                        text: mark.0.text.clone(),
                        color: mark.1,
                        background: mark.0.background,
                    });
                }
            }
        }
        let edges: BTreeMap<_, _> = self
            .grid
            .edges()
            .iter()
            .filter(|(_, edge)| edge.locked)
            .map(|(key, edge)| {
                let record = EdgeRecord {
                    weight: edge.stroke.weight,
                    color: edge.stroke.ink.palette_index().unwrap_or(0),
                };
                (*key, record)
            })
            .collect();
        PuzzleRecord {
            grid: self.grid_config.clone(),
            cells,
            decorations: self.decorations.clone(),
            edges,
            metadata: metadata.to_string(),
        }
    }

    /// Replaces the session with a record.
    ///
    /// The new grid is built on the side and swapped in only on success. In
    /// strict mode any entry that does not fit the grid is an error;
    /// otherwise it is dropped.
    fn load_record(&mut self, record: &PuzzleRecord, strict: bool) -> Result<()> {
        let mut grid = Grid::new(Layout::new(&record.grid));
        let mut dropped = 0usize;

        for entry in &record.cells {
            let (pos, edit) = match entry {
                CellRecord::Clue { x, y, text, color, background } => (
                    Position::Cell { x: *x, y: *y },
                    Edit::new(EntryMode::Normal, text).with_color(*color).with_background(*background),
                ),
                CellRecord::ColorFill { x, y, color } => {
                    (Position::Cell { x: *x, y: *y }, Edit::new(EntryMode::Color, "").with_color(*color))
                }
                CellRecord::BoundarySymbol { x, y, index, text, color, background } => (
                    Position::Boundary { x: *x, y: *y, index: *index },
                    Edit::new(EntryMode::Normal, text).with_color(*color).with_background(*background),
                ),
            };
            if !grid.set_cell(pos, &edit) {
                if strict {
                    bail!("cell entry {:?} does not fit the grid", entry);
                }
                dropped += 1;
            }
        }

        for (&key, edge) in &record.edges {
            let stroke = Stroke {
                weight: edge.weight,
                ink: Ink::Palette(edge.color),
            };
            if !grid.set_edge(key, true, stroke, true) {
                if strict {
                    bail!("edge {:?} does not fit the grid", key);
                }
                dropped += 1;
            }
        }

        let layout = grid.layout().clone();
        let mut decorations = Vec::with_capacity(record.decorations.len());
        for decoration in &record.decorations {
            let fits = decoration.cells().iter().all(|&(x, y)| layout.contains(x, y));
            if fits {
                decorations.push(decoration.clone());
                continue;
            }
            if strict {
                bail!("decoration {:?} does not fit the grid", decoration);
            }
            if let Some(clipped) = clip(decoration, &layout) {
                decorations.push(clipped);
            }
            dropped += 1;
        }

        if dropped > 0 {
            info!("Dropped {} entries outside the new grid", dropped);
        }
        info!(
            "Loaded puzzle: {} cell entries, {} decorations, {} edges",
            record.cells.len(),
            decorations.len(),
            grid.edges().len()
        );

        grid.mark_all_dirty();
        self.grid = grid;
        self.grid_config = record.grid.clone();
        self.decorations = decorations;
        self.metadata = record.metadata.clone();
        self.pending = None;
        self.drag = None;
        self.cursor = None;
        self.selection = Selection::new();
        self.history.clear();
        self.decorations_dirty = true;
        self.full_redraw = true;
        Ok(())
    }
}

/// The author-written marks among `slots` with their palette index.
fn authored<'a>(slots: &[&'a Option<Mark>]) -> Vec<(&'a Mark, u8)> {
    slots
        .iter()
        .filter_map(|slot| slot.as_ref())
        .filter_map(|mark| mark.ink.palette_index().map(|color| (mark, color)))
        .collect()
}

/// Keeps the cells of a decoration that lie inside `layout`.
fn clip(decoration: &Decoration, layout: &Layout) -> Option<Decoration> {
    let keep = |cells: &[(usize, usize)]| -> Vec<(usize, usize)> {
        cells.iter().copied().filter(|&(x, y)| layout.contains(x, y)).collect()
    };
    let clipped = match decoration {
        Decoration::Cage { style, color, cells } => Decoration::Cage {
            style: *style,
            color: *color,
            cells: keep(cells),
        },
        Decoration::Path { style, color, cells } => Decoration::Path {
            style: *style,
            color: *color,
            cells: keep(cells),
        },
    };
    (!clipped.cells().is_empty()).then_some(clipped)
}
