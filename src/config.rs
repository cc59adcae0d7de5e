// src/config.rs

//! Defines the configuration structures for the puzzle canvas.
//!
//! Every struct deserializes from JSON with per-field defaults, so a
//! configuration file only needs to name the settings it changes.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::decoration::{CageStyle, PathStyle};
use crate::editor::Mode;
use crate::scene::LineWeight;

// --- Top-Level Configuration Structure ---

/// Root configuration: grid geometry, the initial input mode and where
/// generated share links point to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub mode: ModeConfig,
    /// Origin prepended to generated share links, without a trailing slash.
    pub url_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            mode: ModeConfig::default(),
            url_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration JSON")
    }

    /// Loads a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json(&text)
    }
}

// --- Grid Configuration ---

/// How the thin grid lines are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    #[default]
    Lines,
    Dash,
    Dots,
}

impl GridStyle {
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::Lines => "lines",
            GridStyle::Dash => "dash",
            GridStyle::Dots => "dots",
        }
    }
}

impl fmt::Display for GridStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "lines" => GridStyle::Lines,
            "dash" => GridStyle::Dash,
            "dots" => GridStyle::Dots,
            other => bail!("unknown grid style '{}'", other),
        })
    }
}

/// Geometry of the puzzle grid.
///
/// `width`/`height` count the main (solvable) grid only; the four margins add
/// clue cells around it. Divider spacings select which interior lines are
/// drawn fat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Edge length of one square cell in pixels.
    pub cell_size: u32,
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub div_width: u32,
    pub div_height: u32,
    pub style: GridStyle,
    pub left_diagonal: bool,
    pub right_diagonal: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 64,
            width: 9,
            height: 9,
            left: 0,
            right: 0,
            top: 0,
            bottom: 0,
            div_width: 3,
            div_height: 3,
            style: GridStyle::Lines,
            left_diagonal: false,
            right_diagonal: false,
        }
    }
}

impl GridConfig {
    /// Total columns including margins.
    pub fn total_width(&self) -> usize {
        [self.left, self.width, self.right]
            .iter()
            .fold(0usize, |sum, &n| sum.saturating_add(n as usize))
    }

    /// Total rows including margins.
    pub fn total_height(&self) -> usize {
        [self.top, self.height, self.bottom]
            .iter()
            .fold(0usize, |sum, &n| sum.saturating_add(n as usize))
    }
}

/// A partial grid update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfigPatch {
    pub cell_size: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub top: Option<u32>,
    pub bottom: Option<u32>,
    pub div_width: Option<u32>,
    pub div_height: Option<u32>,
    pub style: Option<GridStyle>,
    pub left_diagonal: Option<bool>,
    pub right_diagonal: Option<bool>,
}

impl GridConfigPatch {
    /// Returns `base` with every field set in this patch replaced.
    pub fn apply_to(&self, base: &GridConfig) -> GridConfig {
        GridConfig {
            cell_size: self.cell_size.unwrap_or(base.cell_size),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            left: self.left.unwrap_or(base.left),
            right: self.right.unwrap_or(base.right),
            top: self.top.unwrap_or(base.top),
            bottom: self.bottom.unwrap_or(base.bottom),
            div_width: self.div_width.unwrap_or(base.div_width),
            div_height: self.div_height.unwrap_or(base.div_height),
            style: self.style.unwrap_or(base.style),
            left_diagonal: self.left_diagonal.unwrap_or(base.left_diagonal),
            right_diagonal: self.right_diagonal.unwrap_or(base.right_diagonal),
        }
    }
}

// --- Input Mode Configuration ---

/// The input mode together with the style choices each tool draws with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    pub mode: Mode,
    /// Solving instead of authoring: writes use the solver ink and cannot
    /// touch locked clues.
    pub solve_mode: bool,
    pub cage_style: CageStyle,
    pub path_style: PathStyle,
    /// Weight of edge lines and centerlines.
    pub line_weight: LineWeight,
    /// Keystrokes append to existing text instead of replacing it.
    pub multi_digit: bool,
    /// Draw a white backing square behind entered text and symbols.
    pub number_background: bool,
    /// Symbol page digits are entered from; 0 means plain digits.
    pub symbol_page: u8,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            solve_mode: false,
            cage_style: CageStyle::Dash,
            path_style: PathStyle::Thermo,
            line_weight: LineWeight::Fat,
            multi_digit: false,
            number_background: false,
            symbol_page: 0,
        }
    }
}
