// src/lib.rs

//! Interactive grid-puzzle canvas: construct puzzles with clues, symbols,
//! edges, cages and paths, solve them with pencil marks and colors, and
//! share them as compact URL codes.

pub mod codec;
pub mod color;
pub mod config;
pub mod decoration;
pub mod editor;
pub mod grid;
pub mod history;
pub mod keys;
pub mod layout;
pub mod renderer;
pub mod scene;
pub mod symbols;

pub use codec::{decode, encode, PuzzleRecord};
pub use config::{Config, GridConfig, GridConfigPatch, ModeConfig};
pub use editor::{Editor, EditorInput, Mode, PointerButton, PointerEvent, PointerKind};
pub use scene::Surface;
