// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` turns the editing session's state into primitive groups on
//! a `Surface`. It keeps the node ids it created, one small set per cell plus
//! one for the grid lines and one per decoration, so that after an edit only
//! the dirty cells and, if needed, the decoration layer are replaced.

use anyhow::Result;
use log::{debug, trace, warn};
use std::collections::HashMap;

use crate::color::{palette_color, Rgba, MARK_COLOR, SOLVER_INK};
use crate::decoration::Decoration;
use crate::editor::Selection;
use crate::grid::{Cell, Content, Grid};
use crate::layout::{GridLineWeight, Layout, Point, Side};
use crate::config::GridStyle;
use crate::scene::{Layer, NodeId, Primitive, ShapeStyle, Surface};
use crate::symbols::{draw_symbol, GlyphBox, CROSS_CODE};

const NORMAL_FONT: f32 = 0.7;
const CENTER_FONT: f32 = 0.3;

/// Everything one draw call looks at.
pub struct Frame<'a> {
    pub grid: &'a Grid,
    pub decorations: &'a [Decoration],
    /// The cage or path being dragged out, drawn above committed ones.
    pub pending: Option<&'a Decoration>,
    pub selection: &'a Selection,
    /// Cells whose visuals changed since the last frame.
    pub dirty_cells: &'a [(usize, usize)],
    pub decorations_dirty: bool,
    /// Clear the surface and draw everything.
    pub full: bool,
}

/// Retained-mode renderer for the puzzle canvas.
#[derive(Debug, Default)]
pub struct Renderer {
    grid_node: Option<NodeId>,
    cell_nodes: HashMap<(usize, usize), Vec<NodeId>>,
    decoration_nodes: Vec<NodeId>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a frame. Flushes the surface only if something was redrawn.
    ///
    /// Returns whether the surface was flushed.
    pub fn draw(&mut self, surface: &mut dyn Surface, frame: &Frame<'_>) -> Result<bool> {
        let layout = frame.grid.layout();
        if layout.cols == 0 || layout.rows == 0 {
            return Ok(false);
        }

        let mut cells_drawn = 0usize;
        let mut decorations_drawn = false;
        if frame.full {
            surface.clear();
            self.cell_nodes.clear();
            self.decoration_nodes.clear();
            self.grid_node = Some(surface.add(Layer::Grid, grid_primitives(layout)));
            for cell in frame.grid.cells() {
                self.draw_cell(surface, frame, cell);
                cells_drawn += 1;
            }
            self.draw_decorations(surface, frame);
            decorations_drawn = true;
        } else {
            for &(x, y) in frame.dirty_cells {
                let Some(cell) = frame.grid.cell(x, y) else {
                    warn!("Renderer: dirty cell ({}, {}) is outside the grid. Skipping.", x, y);
                    continue;
                };
                self.remove_cell(surface, (x, y));
                self.draw_cell(surface, frame, cell);
                cells_drawn += 1;
            }
            if frame.decorations_dirty {
                for node in self.decoration_nodes.drain(..) {
                    surface.remove(node);
                }
                self.draw_decorations(surface, frame);
                decorations_drawn = true;
            }
        }

        if cells_drawn == 0 && !decorations_drawn {
            trace!("Renderer: nothing to draw.");
            return Ok(false);
        }
        debug!(
            "Renderer: redrew {} cells{}{}",
            cells_drawn,
            if decorations_drawn { " and decorations" } else { "" },
            if frame.full { " (full)" } else { "" }
        );
        surface.flush()?;
        Ok(true)
    }

    /// Number of nodes currently owned by `cell`.
    pub fn cell_node_count(&self, cell: (usize, usize)) -> usize {
        self.cell_nodes.get(&cell).map_or(0, Vec::len)
    }

    pub fn decoration_node_count(&self) -> usize {
        self.decoration_nodes.len()
    }

    fn remove_cell(&mut self, surface: &mut dyn Surface, cell: (usize, usize)) {
        if let Some(nodes) = self.cell_nodes.remove(&cell) {
            for node in nodes {
                surface.remove(node);
            }
        }
    }

    fn draw_cell(&mut self, surface: &mut dyn Surface, frame: &Frame<'_>, cell: &Cell) {
        let layout = frame.grid.layout();
        let mut nodes = Vec::new();
        for (layer, group) in [
            (Layer::Fills, fill_primitives(layout, frame.selection, cell)),
            (Layer::Content, content_primitives(layout, cell)),
            (Layer::Overlay, overlay_primitives(frame.grid, frame.selection, cell)),
        ] {
            if !group.is_empty() {
                nodes.push(surface.add(layer, group));
            }
        }
        if !nodes.is_empty() {
            self.cell_nodes.insert((cell.x, cell.y), nodes);
        }
    }

    fn draw_decorations(&mut self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        let layout = frame.grid.layout();
        for decoration in frame.decorations.iter().chain(frame.pending) {
            let group = decoration.primitives(layout);
            if !group.is_empty() {
                self.decoration_nodes.push(surface.add(Layer::Decorations, group));
            }
        }
    }
}

/// The main-grid frame plus interior lines and diagonals.
fn grid_primitives(layout: &Layout) -> Vec<Primitive> {
    let cs = layout.cell_size;
    let fat = cs / 16.0;
    let (origin, width, height) = layout.frame();
    let mut out = vec![Primitive::Rect {
        origin,
        width,
        height,
        style: ShapeStyle::stroked(Rgba::BLACK, fat),
    }];
    for line in layout.grid_lines() {
        let style = match (line.weight, line.style) {
            (GridLineWeight::Fat, _) => ShapeStyle::stroked(Rgba::BLACK, fat),
            (GridLineWeight::Thin, GridStyle::Lines) => ShapeStyle::stroked(Rgba::BLACK, 1.0),
            (GridLineWeight::Thin, GridStyle::Dash) => ShapeStyle::stroked(Rgba::BLACK, 1.0).with_dash(4.0),
            (GridLineWeight::Thin, GridStyle::Dots) => ShapeStyle::stroked(Rgba::BLACK, 1.0).with_dash(1.0),
        };
        out.push(Primitive::line(line.from, line.to, style));
    }
    out
}

fn cell_rect(origin: Point, size: f32, style: ShapeStyle) -> Primitive {
    Primitive::Rect {
        origin,
        width: size,
        height: size,
        style,
    }
}

/// Author fill, solver fill and the selection highlight.
fn fill_primitives(layout: &Layout, selection: &Selection, cell: &Cell) -> Vec<Primitive> {
    let origin = layout.cell_origin(cell.x, cell.y);
    let cs = layout.cell_size;
    let mut out = Vec::new();
    for fill in [cell.author_fill, cell.solver_fill].into_iter().flatten() {
        out.push(cell_rect(origin, cs, ShapeStyle::filled(palette_color(fill))));
    }
    if selection.is_marked(cell.x, cell.y) {
        out.push(cell_rect(origin, cs, ShapeStyle::filled(MARK_COLOR)));
    }
    out
}

/// Text and symbol of a container, drawn into `bx`.
fn draw_content(content: &Content, bx: &GlyphBox, font_size: f32) -> Vec<Primitive> {
    let mut out = Vec::new();
    for mark in [&content.symbol, &content.text].into_iter().flatten() {
        out.extend(draw_symbol(&mark.text, mark.ink.rgba(), bx, font_size, mark.background));
    }
    out
}

/// Normal content, pencil marks and the cell cross.
fn content_primitives(layout: &Layout, cell: &Cell) -> Vec<Primitive> {
    let origin = layout.cell_origin(cell.x, cell.y);
    let cs = layout.cell_size;
    let bx = GlyphBox::square(origin, cs);
    let mut out = draw_content(&cell.content, &bx, cs * NORMAL_FONT);

    if !cell.center.is_empty() {
        out.push(Primitive::Text {
            origin,
            width: cs,
            height: cs,
            font_size: cs * CENTER_FONT,
            text: cell.center.to_text(),
            color: SOLVER_INK,
        });
    }

    let size = layout.corner_mark_size();
    for (digit, slot) in cell.corner.iter().zip(layout.corner_mark_slots()) {
        out.push(Primitive::Text {
            origin: origin.offset(slot.x, slot.y),
            width: size,
            height: size,
            font_size: size,
            text: digit.to_string(),
            color: SOLVER_INK,
        });
    }

    if cell.cross {
        out.extend(draw_symbol(CROSS_CODE, SOLVER_INK, &bx, cs * NORMAL_FONT, false));
    }
    out
}

/// Boundary content, edges, centerlines, boundary crosses and the selected
/// boundary outline.
fn overlay_primitives(grid: &Grid, selection: &Selection, cell: &Cell) -> Vec<Primitive> {
    let layout = grid.layout();
    let origin = layout.cell_origin(cell.x, cell.y);
    let cs = layout.cell_size;
    let selected = selection.boundary().filter(|&(x, y, _)| (x, y) == (cell.x, cell.y));
    let has_edges = grid.edges().for_cell(cell.x, cell.y).next().is_some();
    if selected.is_none() && !has_edges && cell.boundaries.iter().all(|b| b.is_blank()) {
        return Vec::new();
    }

    let geometry = layout.regions(cell.x, cell.y);
    let mut out = Vec::new();
    for boundary in &cell.boundaries {
        let Some(region) = geometry.get(boundary.index) else {
            continue;
        };
        let bx = GlyphBox::square(origin.offset(region.x, region.y), region.size());
        if !boundary.content.is_empty() {
            out.extend(draw_content(&boundary.content, &bx, region.size() * NORMAL_FONT));
        }
        if let (Some(stroke), Some(side)) = (boundary.centerline, boundary.side) {
            if let Some(to) = neighbour_center(layout, cell, side) {
                let style = ShapeStyle::stroked(stroke.ink.rgba(), stroke.weight.width(cs)).round();
                out.push(Primitive::line(layout.cell_center(cell.x, cell.y), to, style));
            }
        }
        if boundary.cross {
            out.extend(draw_symbol(CROSS_CODE, SOLVER_INK, &bx, region.size() * NORMAL_FONT, false));
        }
    }

    for (&(_, _, index), edge) in grid.edges().for_cell(cell.x, cell.y) {
        let Some(side) = cell.boundary(index).and_then(|b| b.side) else {
            continue;
        };
        let (from, to) = match side {
            Side::Left => ((0.0, 0.0), (0.0, cs)),
            Side::Top => ((0.0, 0.0), (cs, 0.0)),
            Side::Right => ((cs, 0.0), (cs, cs)),
            Side::Bottom => ((0.0, cs), (cs, cs)),
        };
        let style = ShapeStyle::stroked(edge.stroke.ink.rgba(), edge.stroke.weight.width(cs)).round();
        out.push(Primitive::line(
            origin.offset(from.0, from.1),
            origin.offset(to.0, to.1),
            style,
        ));
    }

    if let Some((_, _, index)) = selected {
        if let Some(region) = geometry.get(index) {
            out.push(Primitive::Rect {
                origin: origin.offset(region.x, region.y),
                width: region.width,
                height: region.height,
                style: ShapeStyle::stroked(Rgba::RED, cs / 32.0),
            });
        }
    }
    out
}

fn neighbour_center(layout: &Layout, cell: &Cell, side: Side) -> Option<Point> {
    let (x, y) = (cell.x, cell.y);
    let (nx, ny) = match side {
        Side::Left => (x.checked_sub(1)?, y),
        Side::Top => (x, y.checked_sub(1)?),
        Side::Right => (x + 1, y),
        Side::Bottom => (x, y + 1),
    };
    layout.contains(nx, ny).then(|| layout.cell_center(nx, ny))
}

#[cfg(test)]
mod tests;
