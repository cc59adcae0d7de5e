// src/grid/cell.rs

//! A single grid cell and the boundary regions attached to it.

use bitflags::bitflags;
use log::trace;

use crate::color::{Ink, CLEAR_COLOR_INDEX};
use crate::grid::edges::Stroke;
use crate::grid::{Edit, EntryMode};
use crate::layout::{RegionGeometry, RegionKind, Side};
use crate::symbols::{self, is_symbol_code};

/// Text or a symbol code written into a container, with its ink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mark {
    pub text: String,
    pub ink: Ink,
    /// Draw a white backing square behind the mark.
    pub background: bool,
}

/// A container holding at most one plain text and one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    pub text: Option<Mark>,
    pub symbol: Option<Mark>,
}

impl Content {
    /// The plain text, or `""`.
    pub fn text_str(&self) -> &str {
        self.text.as_ref().map_or("", |m| m.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.symbol.is_none()
    }
}

bitflags! {
    /// A set of digits 1 to 9; iteration is always ascending.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DigitSet: u16 {
        const ONE = 1 << 1;
        const TWO = 1 << 2;
        const THREE = 1 << 3;
        const FOUR = 1 << 4;
        const FIVE = 1 << 5;
        const SIX = 1 << 6;
        const SEVEN = 1 << 7;
        const EIGHT = 1 << 8;
        const NINE = 1 << 9;
    }
}

impl DigitSet {
    pub fn from_digit(digit: u8) -> Option<Self> {
        (1..=9).contains(&digit).then(|| Self::from_bits_truncate(1 << digit))
    }

    pub fn from_digits(digits: &[u8]) -> Self {
        digits.iter().filter_map(|&d| Self::from_digit(d)).collect()
    }

    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=9u8).filter(move |&d| self.bits() & (1 << d) != 0)
    }

    /// The digits concatenated in ascending order, e.g. `"139"`.
    pub fn to_text(&self) -> String {
        self.digits().map(|d| char::from(b'0' + d)).collect()
    }

    /// Applies one center/corner keystroke: empty text clears the set, a
    /// single digit 1-9 toggles that digit, anything else leaves it alone.
    fn apply_keystroke(self, text: &str) -> Self {
        if text.is_empty() {
            return Self::empty();
        }
        match text.parse::<u8>().ok().and_then(Self::from_digit) {
            Some(digit) => self ^ digit,
            None => self,
        }
    }
}

/// Whether a cell's normal content is an author-placed clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockType {
    #[default]
    None,
    /// Written while authoring; solvers cannot change it.
    Normal,
}

/// Mutable state of one boundary region. Geometry lives in the `Layout`;
/// edge lines live in the grid's `EdgeMap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRegion {
    pub index: usize,
    pub kind: RegionKind,
    pub side: Option<Side>,
    pub content: Content,
    pub centerline: Option<Stroke>,
    pub cross: bool,
}

impl BoundaryRegion {
    fn new(geometry: &RegionGeometry) -> Self {
        Self {
            index: geometry.index,
            kind: geometry.kind,
            side: geometry.side,
            content: Content::default(),
            centerline: None,
            cross: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty() && self.centerline.is_none() && !self.cross
    }
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub main_grid: bool,
    pub lock: LockType,
    /// Normal text and the cell symbol.
    pub content: Content,
    /// Palette index the author last wrote plain text with.
    pub author_color: u8,
    pub center: DigitSet,
    /// Corner marks, ascending, at most `corner_slots` long.
    pub corner: Vec<u8>,
    pub corner_slots: usize,
    pub solver_fill: Option<u8>,
    pub author_fill: Option<u8>,
    pub cross: bool,
    pub boundaries: Vec<BoundaryRegion>,
}

impl Cell {
    pub fn new(x: usize, y: usize, main_grid: bool, corner_slots: usize, regions: &[RegionGeometry]) -> Self {
        Self {
            x,
            y,
            main_grid,
            lock: LockType::None,
            content: Content::default(),
            author_color: 0,
            center: DigitSet::empty(),
            corner: Vec::new(),
            corner_slots,
            solver_fill: None,
            author_fill: None,
            cross: false,
            boundaries: regions.iter().map(BoundaryRegion::new).collect(),
        }
    }

    pub fn normal_text(&self) -> &str {
        self.content.text_str()
    }

    pub fn is_locked(&self) -> bool {
        self.lock == LockType::Normal
    }

    pub fn boundary(&self, index: usize) -> Option<&BoundaryRegion> {
        self.boundaries.get(index)
    }

    pub(super) fn boundary_mut(&mut self, index: usize) -> Option<&mut BoundaryRegion> {
        self.boundaries.get_mut(index)
    }

    /// Applies a normal, center, corner or color write to the cell itself.
    /// Guards have already been checked by the grid.
    pub(super) fn apply(&mut self, edit: &Edit<'_>) {
        match edit.mode {
            EntryMode::Normal => {
                let symbol = is_symbol_code(edit.text);
                let ink = if edit.authoring {
                    self.lock = if edit.text.is_empty() {
                        LockType::None
                    } else {
                        LockType::Normal
                    };
                    if !symbol {
                        self.author_color = edit.color;
                    }
                    Ink::Palette(edit.color)
                } else {
                    Ink::Solver
                };
                symbols::set_symbol(&mut self.content, edit.text, ink, edit.background, edit.multi_digit);
                // A digit replaces pencil marks; a symbol sits alongside them.
                if !symbol {
                    self.center = DigitSet::empty();
                    self.corner.clear();
                }
            }
            EntryMode::Center => {
                if self.normal_text().is_empty() {
                    self.center = self.center.apply_keystroke(edit.text);
                } else {
                    trace!("Center mark ignored on filled cell ({}, {})", self.x, self.y);
                }
            }
            EntryMode::Corner => {
                if self.normal_text().is_empty() {
                    let toggled = DigitSet::from_digits(&self.corner).apply_keystroke(edit.text);
                    self.corner = toggled.digits().take(self.corner_slots).collect();
                } else {
                    trace!("Corner mark ignored on filled cell ({}, {})", self.x, self.y);
                }
            }
            EntryMode::Color => {
                let fill = (edit.color != CLEAR_COLOR_INDEX).then_some(edit.color);
                if edit.authoring {
                    self.author_fill = fill;
                } else {
                    self.solver_fill = fill;
                }
            }
            EntryMode::Reset => self.reset(edit.authoring),
        }
    }

    /// Clears solver state; an authoring reset also clears locked content.
    pub(super) fn reset(&mut self, authoring: bool) {
        self.center = DigitSet::empty();
        if !self.is_locked() || authoring {
            self.content = Content::default();
        }
        self.corner.clear();
        self.solver_fill = None;
        self.cross = false;
        for boundary in &mut self.boundaries {
            boundary.centerline = None;
            boundary.cross = false;
        }
        if authoring {
            self.lock = LockType::None;
            self.author_fill = None;
            self.content.symbol = None;
            for boundary in &mut self.boundaries {
                boundary.content = Content::default();
            }
        }
    }
}
