// src/layout.rs
//
// Layout - grid geometry.
//
// Single source of truth for "where is cell (x, y)?", "which cell or
// boundary region is under this pixel?" and for the per-cell catalogue of
// boundary regions. Everything here is pure arithmetic on the grid config.

use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, GridStyle};

/// A point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The role of a boundary region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Small squares in the four corners of the cell.
    Corner,
    /// Small squares centered on each side, inside the cell.
    Side,
    /// Quarter-cell squares.
    Quarter,
    /// Thin strips lying on the cell's sides, used for edge lines.
    Edge,
    /// Small squares straddling grid vertices and side midpoints.
    Boundary,
    /// Large squares straddling grid vertices and side midpoints.
    #[serde(rename = "bigboundary")]
    BigBoundary,
}

/// A side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

/// Placement of one boundary region, relative to its cell's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionGeometry {
    /// Position in the cell's region list; stable for a given grid shape.
    pub index: usize,
    pub kind: RegionKind,
    /// Which side the region belongs to, for side and edge regions.
    pub side: Option<Side>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RegionGeometry {
    /// Edge length of the square glyph box drawn inside this region.
    pub fn size(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn contains(&self, local: Point) -> bool {
        local.x >= self.x
            && local.x < self.x + self.width
            && local.y >= self.y
            && local.y < self.y + self.height
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Outside,
    /// Anywhere in a cell.
    Cell { x: usize, y: usize },
    /// The inner part of a cell, away from its sides. Paths only extend here
    /// so that a diagonal drag does not clip the corner of a neighbour.
    CellInner { x: usize, y: usize },
    Boundary { x: usize, y: usize, index: usize },
}

impl HitTarget {
    /// The cell this target belongs to.
    pub fn cell(&self) -> Option<(usize, usize)> {
        match *self {
            HitTarget::Outside => None,
            HitTarget::Cell { x, y }
            | HitTarget::CellInner { x, y }
            | HitTarget::Boundary { x, y, .. } => Some((x, y)),
        }
    }
}

/// Weight of a grid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLineWeight {
    Thin,
    Fat,
}

/// One interior grid line or diagonal, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    pub weight: GridLineWeight,
    pub style: GridStyle,
}

/// Geometric layout of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Edge length of a cell in pixels.
    pub cell_size: f32,
    /// Columns including margins.
    pub cols: usize,
    /// Rows including margins.
    pub rows: usize,
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
    div_width: usize,
    div_height: usize,
    style: GridStyle,
    left_diagonal: bool,
    right_diagonal: bool,
}

impl Layout {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            cell_size: config.cell_size as f32,
            cols: config.total_width(),
            rows: config.total_height(),
            left: config.left as usize,
            right: config.right as usize,
            top: config.top as usize,
            bottom: config.bottom as usize,
            div_width: config.div_width as usize,
            div_height: config.div_height as usize,
            style: config.style,
            left_diagonal: config.left_diagonal,
            right_diagonal: config.right_diagonal,
        }
    }

    pub fn main_cols(&self) -> usize {
        self.cols.saturating_sub(self.left + self.right)
    }

    pub fn main_rows(&self) -> usize {
        self.rows.saturating_sub(self.top + self.bottom)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    /// Whether `(x, y)` lies in the main grid rather than a margin.
    pub fn is_main_grid(&self, x: usize, y: usize) -> bool {
        x >= self.left && x < self.left + self.main_cols() && y >= self.top && y < self.top + self.main_rows()
    }

    fn is_last_main_col(&self, x: usize) -> bool {
        self.main_cols() > 0 && x == self.left + self.main_cols() - 1
    }

    fn is_last_main_row(&self, y: usize) -> bool {
        self.main_rows() > 0 && y == self.top + self.main_rows() - 1
    }

    /// Total canvas size in pixels.
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.cols as f32 * self.cell_size, self.rows as f32 * self.cell_size)
    }

    pub fn cell_origin(&self, x: usize, y: usize) -> Point {
        Point::new(x as f32 * self.cell_size, y as f32 * self.cell_size)
    }

    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        let half = self.cell_size / 2.0;
        self.cell_origin(x, y).offset(half, half)
    }

    /// Inset of cage outlines from the cell sides.
    pub fn corner_offset(&self) -> f32 {
        self.cell_size * 0.08
    }

    /// Inset of the inner hover area from the cell sides.
    pub fn hover_offset(&self) -> f32 {
        self.cell_size * 0.2
    }

    /// Edge length of one corner-mark slot.
    pub fn corner_mark_size(&self) -> f32 {
        self.cell_size * 0.25
    }

    /// Number of corner-mark slots a cell offers.
    pub fn corner_mark_capacity(&self, x: usize, y: usize) -> usize {
        if self.is_main_grid(x, y) {
            8
        } else {
            0
        }
    }

    /// Top-left corners of the corner-mark slots relative to the cell origin:
    /// the four corners clockwise from top-left, then the side midpoints
    /// clockwise from top.
    pub fn corner_mark_slots(&self) -> [Point; 8] {
        let cs = self.cell_size;
        let size = self.corner_mark_size();
        let co = cs * 0.03;
        let far = cs - size - co;
        let mid = cs / 2.0 - size / 2.0;
        [
            Point::new(co, co),
            Point::new(far, co),
            Point::new(far, far),
            Point::new(co, far),
            Point::new(mid, co),
            Point::new(far, mid),
            Point::new(mid, far),
            Point::new(co, mid),
        ]
    }

    /// The boundary regions of cell `(x, y)`, in index order.
    ///
    /// Edge, boundary and big-boundary regions on the right and bottom of a
    /// cell only exist for the last main-grid column and row; everywhere else
    /// those positions belong to the neighbour's left/top regions.
    pub fn regions(&self, x: usize, y: usize) -> Vec<RegionGeometry> {
        let cs = self.cell_size;
        let last_col = self.is_last_main_col(x);
        let last_row = self.is_last_main_row(y);
        let mut regions = Vec::with_capacity(32);
        let mut add = |kind: RegionKind, side: Option<Side>, x: f32, y: f32, width: f32, height: f32| {
            let index = regions.len();
            regions.push(RegionGeometry { index, kind, side, x, y, width, height });
        };

        // Corners and sides, inset from the cell border.
        let bc = cs * 0.04;
        let bsize = cs * 0.4;
        let far = cs - bsize - bc;
        let mid = cs / 2.0 - bsize / 2.0;
        for (px, py) in [(bc, bc), (far, bc), (bc, far), (far, far)] {
            add(RegionKind::Corner, None, px, py, bsize, bsize);
        }
        add(RegionKind::Side, Some(Side::Left), bc, mid, bsize, bsize);
        add(RegionKind::Side, Some(Side::Top), mid, bc, bsize, bsize);
        add(RegionKind::Side, Some(Side::Right), far, mid, bsize, bsize);
        add(RegionKind::Side, Some(Side::Bottom), mid, far, bsize, bsize);

        let qsize = cs * 0.4;
        let qc = cs * 0.05;
        let qfar = cs - qsize - qc;
        for (px, py) in [(qc, qc), (qfar, qc), (qc, qfar), (qfar, qfar)] {
            add(RegionKind::Quarter, None, px, py, qsize, qsize);
        }

        // Edge strips centered on the cell sides.
        let ew = cs * 0.3;
        let eh = cs * 0.7;
        let eo = ew / 2.0;
        add(RegionKind::Edge, Some(Side::Left), -eo, eo, ew, eh);
        add(RegionKind::Edge, Some(Side::Top), eo, -eo, eh, ew);
        if last_col {
            add(RegionKind::Edge, Some(Side::Right), cs - eo, eo, ew, eh);
        }
        if last_row {
            add(RegionKind::Edge, Some(Side::Bottom), eo, cs - eo, eh, ew);
        }

        // Squares straddling the top-left vertex and the left/top midpoints.
        for (kind, size) in [(RegionKind::Boundary, cs * 0.4), (RegionKind::BigBoundary, cs * 0.8)] {
            let h = size / 2.0;
            add(kind, None, -h, -h, size, size);
            add(kind, None, -h, cs / 2.0 - h, size, size);
            add(kind, None, cs / 2.0 - h, -h, size, size);
            if last_col {
                add(kind, None, cs - h, -h, size, size);
                add(kind, None, cs - h, cs / 2.0 - h, size, size);
            }
            if last_row {
                add(kind, None, -h, cs - h, size, size);
                add(kind, None, cs / 2.0 - h, cs - h, size, size);
                add(kind, None, cs - h, cs - h, size, size);
            }
        }

        regions
    }

    /// Converts a canvas pixel position to cell coordinates.
    pub fn pixel_to_cell(&self, point: Point) -> Option<(usize, usize)> {
        if point.x < 0.0 || point.y < 0.0 || self.cell_size <= 0.0 {
            return None;
        }
        let x = (point.x / self.cell_size) as usize;
        let y = (point.y / self.cell_size) as usize;
        self.contains(x, y).then_some((x, y))
    }

    /// Finds what lies under `point`.
    ///
    /// Boundary regions of the given `kinds` win over cells; regions overlap
    /// neighbouring cells, so the 3x3 neighbourhood is searched and the region
    /// whose center is nearest is returned.
    pub fn hit_test(&self, point: Point, kinds: &[RegionKind]) -> HitTarget {
        if !kinds.is_empty() {
            if let Some(hit) = self.hit_region(point, kinds) {
                return hit;
            }
        }
        let Some((x, y)) = self.pixel_to_cell(point) else {
            return HitTarget::Outside;
        };
        let origin = self.cell_origin(x, y);
        let ho = self.hover_offset();
        let (lx, ly) = (point.x - origin.x, point.y - origin.y);
        if lx >= ho && lx < self.cell_size - ho && ly >= ho && ly < self.cell_size - ho {
            HitTarget::CellInner { x, y }
        } else {
            HitTarget::Cell { x, y }
        }
    }

    fn hit_region(&self, point: Point, kinds: &[RegionKind]) -> Option<HitTarget> {
        let cx = (point.x / self.cell_size).floor() as isize;
        let cy = (point.y / self.cell_size).floor() as isize;
        let mut best: Option<(f32, HitTarget)> = None;
        for y in (cy - 1)..=(cy + 1) {
            for x in (cx - 1)..=(cx + 1) {
                if x < 0 || y < 0 || !self.contains(x as usize, y as usize) {
                    continue;
                }
                let (x, y) = (x as usize, y as usize);
                let origin = self.cell_origin(x, y);
                let local = Point::new(point.x - origin.x, point.y - origin.y);
                for region in self.regions(x, y) {
                    if !kinds.contains(&region.kind) || !region.contains(local) {
                        continue;
                    }
                    let distance = region.center().distance_to(local);
                    if best.map_or(true, |(d, _)| distance < d) {
                        best = Some((distance, HitTarget::Boundary { x, y, index: region.index }));
                    }
                }
            }
        }
        best.map(|(_, hit)| hit)
    }

    /// Interior grid lines and diagonals of the main grid. Every `div`-th
    /// line is fat; the outer frame is not included.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let cs = self.cell_size;
        let x0 = self.left as f32 * cs;
        let y0 = self.top as f32 * cs;
        let (w, h) = (self.main_cols(), self.main_rows());
        let x1 = x0 + w as f32 * cs;
        let y1 = y0 + h as f32 * cs;
        let weight = |i: usize, div: usize| {
            if div > 0 && i % div == 0 {
                GridLineWeight::Fat
            } else {
                GridLineWeight::Thin
            }
        };
        let mut lines = Vec::with_capacity(w + h + 2);
        for i in 1..w {
            let x = x0 + i as f32 * cs;
            lines.push(GridLine {
                from: Point::new(x, y0),
                to: Point::new(x, y1),
                weight: weight(i, self.div_width),
                style: self.style,
            });
        }
        for j in 1..h {
            let y = y0 + j as f32 * cs;
            lines.push(GridLine {
                from: Point::new(x0, y),
                to: Point::new(x1, y),
                weight: weight(j, self.div_height),
                style: self.style,
            });
        }
        if self.left_diagonal {
            lines.push(GridLine {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
                weight: GridLineWeight::Thin,
                style: GridStyle::Lines,
            });
        }
        if self.right_diagonal {
            lines.push(GridLine {
                from: Point::new(x1, y0),
                to: Point::new(x0, y1),
                weight: GridLineWeight::Thin,
                style: GridStyle::Lines,
            });
        }
        lines
    }

    /// Main-grid frame as (origin, width, height).
    pub fn frame(&self) -> (Point, f32, f32) {
        let cs = self.cell_size;
        (
            self.cell_origin(self.left, self.top),
            self.main_cols() as f32 * cs,
            self.main_rows() as f32 * cs,
        )
    }
}
