// src/editor/mod.rs

//! The editing session.
//!
//! `Editor` owns everything a puzzle canvas needs between events: the cell
//! store, committed and in-progress decorations, the input mode, selection,
//! drag state and the undo history. Pointer and keyboard events enter
//! through `interpret_input`; the public operations in `methods.rs` cover
//! loading, saving, checking and history.

use log::{debug, trace};

use crate::config::{Config, GridConfig, ModeConfig};
use crate::decoration::Decoration;
use crate::grid::{EdgeKey, Edit, Grid, GridSnapshot, Position};
use crate::history::History;
use crate::keys::{KeySymbol, Modifiers};
use crate::layout::{HitTarget, Layout, Point, RegionKind};
use crate::renderer::Renderer;

mod input_handler;
mod methods;
mod mode;
mod selection;


pub use mode::{Drag, Mode, PointerButton, ToggleLatch, SOLVE_CYCLE};
pub use selection::Selection;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event, already hit-tested against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: PointerButton,
    pub target: HitTarget,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, button: PointerButton, target: HitTarget) -> Self {
        Self {
            kind,
            button,
            target,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Input delivered to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorInput {
    Pointer(PointerEvent),
    Key { symbol: KeySymbol, modifiers: Modifiers },
}

/// What an undo step restores.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    grid: GridSnapshot,
    decorations: Vec<Decoration>,
}

/// One puzzle editing session.
#[derive(Debug)]
pub struct Editor {
    grid: Grid,
    grid_config: GridConfig,
    mode: ModeConfig,
    /// Palette index used for new text, fills, decorations and edges.
    color: u8,
    decorations: Vec<Decoration>,
    /// The cage or path being dragged out.
    pending: Option<Decoration>,
    selection: Selection,
    drag: Option<Drag>,
    cursor: Option<(usize, usize)>,
    history: History<Snapshot>,
    url_origin: String,
    metadata: String,
    decorations_dirty: bool,
    full_redraw: bool,
    renderer: Renderer,
}

impl Editor {
    /// Creates an empty session for the configured grid.
    pub fn new(config: Config) -> Self {
        debug!(
            "Creating editor: {}x{} grid, mode {:?}",
            config.grid.width, config.grid.height, config.mode.mode
        );
        Self {
            grid: Grid::new(Layout::new(&config.grid)),
            grid_config: config.grid,
            mode: config.mode,
            color: 0,
            decorations: Vec::new(),
            pending: None,
            selection: Selection::new(),
            drag: None,
            cursor: None,
            history: History::new(),
            url_origin: config.url_origin,
            metadata: String::new(),
            decorations_dirty: true,
            full_redraw: true,
            renderer: Renderer::new(),
        }
    }

    /// Routes one input event.
    pub fn interpret_input(&mut self, input: EditorInput) {
        match input {
            EditorInput::Pointer(event) => input_handler::process_pointer(self, event),
            EditorInput::Key { symbol, modifiers } => input_handler::process_key(self, symbol, modifiers),
        }
    }

    // --- Accessors ---

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_config(&self) -> &GridConfig {
        &self.grid_config
    }

    pub fn mode(&self) -> &ModeConfig {
        &self.mode
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn pending_decoration(&self) -> Option<&Decoration> {
        self.pending.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        self.cursor
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Region kinds that take pointer hits in the current mode.
    pub fn active_region_kinds(&self) -> Vec<RegionKind> {
        self.mode.mode.region_kinds()
    }

    /// Maps a canvas position to what the current mode can interact with.
    pub fn hit_test(&self, point: Point) -> HitTarget {
        self.grid.layout().hit_test(point, &self.active_region_kinds())
    }

    // --- Internal helpers shared by the handlers ---

    fn is_authoring(&self) -> bool {
        !self.mode.solve_mode
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.snapshot(),
            decorations: self.decorations.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.cancel_drag();
        self.grid.restore(&snapshot.grid);
        self.decorations = snapshot.decorations;
        self.decorations_dirty = true;
        self.full_redraw = true;
    }

    /// Applies `edit` to every position; records one undo step if the grid
    /// actually changed.
    fn apply_edit(&mut self, targets: &[Position], edit: &Edit<'_>) -> bool {
        if targets.is_empty() {
            return false;
        }
        let before = self.snapshot();
        let mut accepted = false;
        for &pos in targets {
            accepted |= self.grid.set_cell(pos, edit);
        }
        // Accepted writes can still be no-ops, e.g. a pencil mark on a
        // filled cell.
        let changed = accepted && self.grid.snapshot() != before.grid;
        if changed {
            self.history.record(before);
        } else {
            trace!("{:?} edit changed nothing on {} targets", edit.mode, targets.len());
        }
        changed
    }

    /// Runs a toggle inside a drag, taking an undo snapshot before the first
    /// change the drag makes.
    fn drag_edit(&mut self, apply: impl FnOnce(&mut Grid) -> bool) -> bool {
        let first = self.drag.as_ref().map_or(true, |d| !d.recorded);
        let before = first.then(|| self.snapshot());
        if !apply(&mut self.grid) {
            return false;
        }
        if let Some(before) = before {
            self.history.record(before);
            if let Some(drag) = self.drag.as_mut() {
                drag.recorded = true;
            }
        }
        true
    }

    fn mark_cell(&mut self, cell: (usize, usize)) {
        if !self.grid.layout().contains(cell.0, cell.1) {
            return;
        }
        for (x, y) in self.selection.mark(cell) {
            self.grid.mark_dirty(x, y);
        }
    }

    fn select_boundary(&mut self, key: EdgeKey) {
        for (x, y) in self.selection.select_boundary(key) {
            self.grid.mark_dirty(x, y);
        }
    }

    fn clear_selection(&mut self) {
        for (x, y) in self.selection.clear() {
            self.grid.mark_dirty(x, y);
        }
    }

    fn clear_boundary_selection(&mut self) {
        if self.selection.boundary().is_some() {
            self.clear_selection();
        }
    }

    /// Drops the drag and any uncommitted decoration.
    fn cancel_drag(&mut self) {
        self.drag = None;
        if self.pending.take().is_some() {
            debug!("Discarding uncommitted decoration.");
            self.decorations_dirty = true;
        }
    }
}
