// src/color.rs

//! Defines the drawing palette (`PALETTE`), the `Rgba` color type and the
//! `Ink` a piece of cell content is written with.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with a straight (non-premultiplied) alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Composites this color over an opaque white background and returns the
    /// resulting opaque color.
    ///
    /// Palette entries are half transparent so that fills can stack; strokes
    /// and glyphs use the composited value so overlapping segments of the same
    /// shape do not darken where they cross.
    pub fn premultiplied(self) -> Self {
        self.over(Rgba::WHITE)
    }

    /// Composites this color over `background` (whose own alpha is ignored).
    pub fn over(self, background: Rgba) -> Self {
        let a = self.a.clamp(0.0, 1.0);
        let blend = |c: u8, bg: u8| -> u8 {
            (c as f32 * a + bg as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8
        };
        Rgba::opaque(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// The drawing palette. Indices are what the editor, the cell store and the
/// serialized format exchange; index 2 is fully transparent and acts as the
/// "clear" sentinel for color fills.
pub const PALETTE: [Rgba; 9] = [
    Rgba::new(0, 0, 0, 1.0),
    Rgba::new(207, 207, 207, 0.5),
    Rgba::new(255, 255, 255, 0.0),
    Rgba::new(163, 224, 72, 0.5),
    Rgba::new(210, 59, 231, 0.5),
    Rgba::new(235, 117, 50, 0.5),
    Rgba::new(226, 38, 31, 0.5),
    Rgba::new(247, 208, 56, 0.5),
    Rgba::new(52, 187, 230, 0.5),
];

/// Palette index that removes a color fill instead of painting one.
pub const CLEAR_COLOR_INDEX: u8 = 2;

/// Fixed ink for everything a solver writes.
pub const SOLVER_INK: Rgba = Rgba::opaque(29, 106, 229);

/// Highlight drawn behind marked (selected) cells.
pub const MARK_COLOR: Rgba = Rgba::new(247, 208, 56, 0.5);

/// Looks up a palette entry, falling back to black for unknown indices.
pub fn palette_color(index: u8) -> Rgba {
    PALETTE.get(index as usize).copied().unwrap_or_else(|| {
        warn!("Palette index {} out of range, using black.", index);
        PALETTE[0]
    })
}

/// Which ink a piece of text, symbol or line was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ink {
    /// The solver's fixed ink (`SOLVER_INK`).
    #[default]
    Solver,
    /// A palette entry chosen while authoring.
    Palette(u8),
}

impl Ink {
    /// The color content in this ink is drawn with.
    pub fn rgba(self) -> Rgba {
        match self {
            Ink::Solver => SOLVER_INK,
            Ink::Palette(index) => palette_color(index).premultiplied(),
        }
    }

    pub fn palette_index(self) -> Option<u8> {
        match self {
            Ink::Solver => None,
            Ink::Palette(index) => Some(index),
        }
    }
}
