// src/decoration/mod.rs

//! Decorations: cages (outlined cell sets) and paths (styled polylines
//! through cell centers).
//!
//! A decoration only stores its style, palette color and cells; geometry is
//! derived on demand from the `Layout`.

pub mod cage;
pub mod path;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::layout::Layout;
use crate::scene::Primitive;

/// How a cage outline is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CageStyle {
    /// Dashed outline inset from the cell sides.
    #[default]
    Dash,
    /// Solid outline flush with the cell sides.
    Edge,
}

impl CageStyle {
    pub fn name(self) -> &'static str {
        match self {
            CageStyle::Dash => "dash",
            CageStyle::Edge => "edge",
        }
    }
}

impl FromStr for CageStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(match s {
            "dash" => CageStyle::Dash,
            "edge" => CageStyle::Edge,
            other => bail!("unknown cage style '{}'", other),
        })
    }
}

/// How a path is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// Bulb at the start, thick rounded line.
    #[default]
    Thermo,
    Thin,
    Medium,
    Fat,
    /// Colored band with a white core and round ends.
    RoundBorder,
    /// Colored band with a white core and square ends.
    Border,
    RoundFill,
    SquareFill,
    Arrow,
    /// Arrow starting from a white circle.
    ArrowCircle,
    /// Closed outline through the cell centers.
    Polygon,
    /// Filled closed outline through the cell centers.
    PolygonFill,
}

impl PathStyle {
    pub const ALL: [PathStyle; 12] = [
        PathStyle::Thermo,
        PathStyle::Thin,
        PathStyle::Medium,
        PathStyle::Fat,
        PathStyle::RoundBorder,
        PathStyle::Border,
        PathStyle::RoundFill,
        PathStyle::SquareFill,
        PathStyle::Arrow,
        PathStyle::ArrowCircle,
        PathStyle::Polygon,
        PathStyle::PolygonFill,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathStyle::Thermo => "thermo",
            PathStyle::Thin => "thin",
            PathStyle::Medium => "medium",
            PathStyle::Fat => "fat",
            PathStyle::RoundBorder => "roundborder",
            PathStyle::Border => "border",
            PathStyle::RoundFill => "roundfill",
            PathStyle::SquareFill => "squarefill",
            PathStyle::Arrow => "arrow",
            PathStyle::ArrowCircle => "arrowcircle",
            PathStyle::Polygon => "polygon",
            PathStyle::PolygonFill => "polygonfill",
        }
    }
}

impl FromStr for PathStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match PathStyle::ALL.iter().find(|style| style.name() == s) {
            Some(style) => Ok(*style),
            None => bail!("unknown path style '{}'", s),
        }
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A committed or in-progress decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// An unordered set of cells; insertion order is kept only so the
    /// serialized form is stable.
    Cage {
        style: CageStyle,
        color: u8,
        cells: Vec<(usize, usize)>,
    },
    /// An ordered list of cells.
    Path {
        style: PathStyle,
        color: u8,
        cells: Vec<(usize, usize)>,
    },
}

impl Decoration {
    pub fn cage(style: CageStyle, color: u8, start: (usize, usize)) -> Self {
        Decoration::Cage { style, color, cells: vec![start] }
    }

    pub fn path(style: PathStyle, color: u8, start: (usize, usize)) -> Self {
        Decoration::Path { style, color, cells: vec![start] }
    }

    pub fn cells(&self) -> &[(usize, usize)] {
        match self {
            Decoration::Cage { cells, .. } | Decoration::Path { cells, .. } => cells,
        }
    }

    pub fn color(&self) -> u8 {
        match self {
            Decoration::Cage { color, .. } | Decoration::Path { color, .. } => *color,
        }
    }

    pub fn contains(&self, cell: (usize, usize)) -> bool {
        self.cells().contains(&cell)
    }

    /// Extends the decoration during a drag. A cage ignores cells it already
    /// owns; a path ignores a repeat of its last cell. Returns whether a cell
    /// was added.
    pub fn extend(&mut self, cell: (usize, usize)) -> bool {
        match self {
            Decoration::Cage { cells, .. } => {
                if cells.contains(&cell) {
                    return false;
                }
                cells.push(cell);
            }
            Decoration::Path { cells, .. } => {
                if cells.last() == Some(&cell) {
                    return false;
                }
                cells.push(cell);
            }
        }
        true
    }

    /// Geometry of this decoration.
    pub fn primitives(&self, layout: &Layout) -> Vec<Primitive> {
        match self {
            Decoration::Cage { style, color, cells } => cage::cage(cells, *style, *color, layout),
            Decoration::Path { style, color, cells } => path::path(cells, *style, *color, layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn cage_extension_ignores_owned_cells() {
        let mut cage = Decoration::cage(CageStyle::Dash, 0, (1, 1));
        assert!(cage.extend((1, 2)));
        assert!(!cage.extend((1, 1)));
        assert_eq!(cage.cells(), &[(1, 1), (1, 2)]);
    }

    #[test]
    fn path_may_revisit_cells_but_not_repeat_the_last() {
        let mut path = Decoration::path(PathStyle::Thin, 3, (0, 0));
        assert!(path.extend((0, 1)));
        assert!(!path.extend((0, 1)));
        assert!(path.extend((0, 0)));
        assert_eq!(path.cells(), &[(0, 0), (0, 1), (0, 0)]);
        assert_eq!(path.color(), 3);
    }

    #[test]
    fn style_names_parse_back() {
        for style in PathStyle::ALL {
            assert_eq!(style.name().parse::<PathStyle>().unwrap(), style);
        }
        assert_eq!("edge".parse::<CageStyle>().unwrap(), CageStyle::Edge);
        assert!("zigzag".parse::<PathStyle>().is_err());
    }
}
