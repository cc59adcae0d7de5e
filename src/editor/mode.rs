// src/editor/mode.rs

//! Input modes and the per-drag state that lives between pointer events.

use serde::{Deserialize, Serialize};

use crate::grid::EntryMode;
use crate::layout::RegionKind;

/// What a click or keystroke on the grid does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Big digits, letters and symbols.
    #[default]
    Normal,
    /// Pencil marks in the middle of a cell.
    Center,
    /// Pencil marks along the cell border.
    Corner,
    /// Color fills.
    Color,
    /// Drag out a cage.
    Cage,
    /// Drag out a path.
    Path,
    /// Toggle edge lines.
    Edge,
    /// Toggle lines between neighbouring cell centers.
    CenterLine,
    /// Select one boundary region of the given kind and type into it.
    Boundary(RegionKind),
    /// Right-drag toggles crosses on cells and regions; left-drag edges.
    Cross,
}

/// Modes the solver cycles through with the space key.
pub const SOLVE_CYCLE: [Mode; 4] = [Mode::Normal, Mode::Center, Mode::Corner, Mode::Color];

impl Mode {
    /// Which part of a cell typed input goes to, or `None` when the mode
    /// does not take typed input.
    pub fn entry_mode(self) -> Option<EntryMode> {
        match self {
            Mode::Normal | Mode::Boundary(_) => Some(EntryMode::Normal),
            Mode::Center => Some(EntryMode::Center),
            Mode::Corner => Some(EntryMode::Corner),
            Mode::Color => Some(EntryMode::Color),
            Mode::Cage | Mode::Path | Mode::Edge | Mode::CenterLine | Mode::Cross => None,
        }
    }

    /// Boundary region kinds that receive pointer hits in this mode.
    pub fn region_kinds(self) -> Vec<RegionKind> {
        match self {
            Mode::Edge | Mode::CenterLine => vec![RegionKind::Edge],
            Mode::Cross => vec![RegionKind::Edge, RegionKind::Boundary],
            Mode::Boundary(kind) => vec![kind],
            _ => Vec::new(),
        }
    }

    /// The next mode in `SOLVE_CYCLE`; modes outside the cycle restart it.
    pub fn next_solve_mode(self) -> Mode {
        match SOLVE_CYCLE.iter().position(|&m| m == self) {
            Some(i) => SOLVE_CYCLE[(i + 1) % SOLVE_CYCLE.len()],
            None => SOLVE_CYCLE[0],
        }
    }
}

/// Pointer buttons the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Left,
    Right,
}

/// Decides whether a drag adds or removes marks.
///
/// Unset until the first toggleable region of the drag is touched; from then
/// on every region the drag crosses is driven to the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleLatch(Option<bool>);

impl ToggleLatch {
    /// The target state for a region currently in state `current`.
    pub fn resolve(&mut self, current: bool) -> bool {
        *self.0.get_or_insert(!current)
    }

    pub fn state(&self) -> Option<bool> {
        self.0
    }
}

/// State of a pointer drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drag {
    pub button: PointerButton,
    pub latch: ToggleLatch,
    /// Whether an undo snapshot was already taken for this drag.
    pub recorded: bool,
}

impl Drag {
    pub fn new(button: PointerButton) -> Self {
        Self {
            button,
            latch: ToggleLatch::default(),
            recorded: false,
        }
    }
}
