// src/renderer/tests.rs

use crate::color::{Ink, MARK_COLOR};
use crate::config::GridConfig;
use crate::decoration::{CageStyle, Decoration};
use crate::editor::Selection;
use crate::grid::{Edit, EntryMode, Grid, Position, Stroke};
use crate::layout::{Layout, Point};
use crate::renderer::{Frame, Renderer};
use crate::scene::mock::RecordingSurface;
use crate::scene::{Layer, LineWeight, Primitive, ShapeStyle};
use test_log::test;

// --- Test Helpers ---

fn small_grid() -> Grid {
    Grid::new(Layout::new(&GridConfig {
        cell_size: 10,
        width: 3,
        height: 3,
        div_width: 0,
        div_height: 0,
        ..GridConfig::default()
    }))
}

fn frame<'a>(
    grid: &'a Grid,
    decorations: &'a [Decoration],
    selection: &'a Selection,
    dirty: &'a [(usize, usize)],
    full: bool,
) -> Frame<'a> {
    Frame {
        grid,
        decorations,
        pending: None,
        selection,
        dirty_cells: dirty,
        decorations_dirty: false,
        full,
    }
}

fn full_draw(renderer: &mut Renderer, surface: &mut RecordingSurface, grid: &mut Grid, selection: &Selection) {
    grid.take_dirty_cells();
    assert!(renderer.draw(surface, &frame(grid, &[], selection, &[], true)).unwrap());
}

// --- Tests ---

#[test]
fn full_draw_clears_and_draws_grid_lines() {
    let mut grid = small_grid();
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &Selection::new());

    assert_eq!(surface.clear_count(), 1);
    assert_eq!(surface.flush_count(), 1);
    // Frame plus two vertical and two horizontal thin lines.
    let grid_prims = surface.primitives_on(Layer::Grid);
    assert_eq!(grid_prims.len(), 5);
    assert!(matches!(grid_prims[0], Primitive::Rect { width, .. } if (*width - 30.0).abs() < 1e-4));
    // Empty cells draw nothing.
    assert_eq!(surface.node_count(), 1);
}

#[test]
fn nothing_dirty_means_no_flush() {
    let mut grid = small_grid();
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &Selection::new());

    let selection = Selection::new();
    assert!(!renderer.draw(&mut surface, &frame(&grid, &[], &selection, &[], false)).unwrap());
    assert_eq!(surface.flush_count(), 1);
}

#[test]
fn dirty_cells_are_replaced_not_duplicated() {
    let mut grid = small_grid();
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    let selection = Selection::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &selection);

    grid.set_cell(Position::Cell { x: 1, y: 1 }, &Edit::new(EntryMode::Normal, "7"));
    let dirty = grid.take_dirty_cells();
    assert_eq!(dirty, vec![(1, 1)]);
    renderer.draw(&mut surface, &frame(&grid, &[], &selection, &dirty, false)).unwrap();
    assert_eq!(surface.texts_on(Layer::Content), vec!["7".to_string()]);

    grid.set_cell(Position::Cell { x: 1, y: 1 }, &Edit::new(EntryMode::Normal, "8"));
    let dirty = grid.take_dirty_cells();
    renderer.draw(&mut surface, &frame(&grid, &[], &selection, &dirty, false)).unwrap();
    assert_eq!(surface.texts_on(Layer::Content), vec!["8".to_string()]);
    assert_eq!(renderer.cell_node_count((1, 1)), 1);
}

#[test]
fn pencil_marks_are_drawn_in_solver_ink() {
    let mut grid = small_grid();
    for digit in ["9", "1", "3"] {
        grid.set_cell(Position::Cell { x: 0, y: 0 }, &Edit::new(EntryMode::Center, digit).solving());
    }
    for digit in ["4", "2"] {
        grid.set_cell(Position::Cell { x: 2, y: 0 }, &Edit::new(EntryMode::Corner, digit).solving());
    }
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &Selection::new());

    let mut texts = surface.texts_on(Layer::Content);
    texts.sort();
    assert_eq!(texts, vec!["139", "2", "4"]);
}

#[test]
fn marked_cells_get_the_highlight() {
    let mut grid = small_grid();
    let mut selection = Selection::new();
    selection.mark((2, 2));
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &selection);

    let fills = surface.primitives_on(Layer::Fills);
    assert_eq!(fills.len(), 1);
    assert_eq!(
        fills[0],
        &Primitive::Rect {
            origin: Point::new(20.0, 20.0),
            width: 10.0,
            height: 10.0,
            style: ShapeStyle::filled(MARK_COLOR),
        }
    );
}

#[test]
fn edges_and_centerlines_go_to_the_overlay() {
    let mut grid = small_grid();
    let stroke = Stroke { weight: LineWeight::Fat, ink: Ink::Palette(0) };
    // Left edge of (1, 0): a border line plus a centerline to (0, 0).
    assert!(grid.set_edge((1, 0, 12), true, stroke, true));
    assert!(grid.set_centerline((1, 0, 12), true, stroke));
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    full_draw(&mut renderer, &mut surface, &mut grid, &Selection::new());

    let lines: Vec<_> = surface
        .primitives_on(Layer::Overlay)
        .into_iter()
        .filter_map(|p| match p {
            Primitive::Polyline { points, .. } => Some(points.clone()),
            _ => None,
        })
        .collect();
    assert!(lines.contains(&vec![Point::new(10.0, 0.0), Point::new(10.0, 10.0)]));
    assert!(lines.contains(&vec![Point::new(15.0, 5.0), Point::new(5.0, 5.0)]));
}

#[test]
fn decorations_redraw_only_when_dirty() {
    let mut grid = small_grid();
    let selection = Selection::new();
    let decorations = vec![Decoration::cage(CageStyle::Edge, 0, (0, 0))];
    let mut renderer = Renderer::new();
    let mut surface = RecordingSurface::new();
    grid.take_dirty_cells();
    renderer.draw(&mut surface, &frame(&grid, &decorations, &selection, &[], true)).unwrap();
    assert_eq!(renderer.decoration_node_count(), 1);
    assert_eq!(surface.primitives_on(Layer::Decorations).len(), 4);

    let mut next = frame(&grid, &[], &selection, &[], false);
    next.decorations_dirty = true;
    assert!(renderer.draw(&mut surface, &next).unwrap());
    assert_eq!(renderer.decoration_node_count(), 0);
    assert!(surface.primitives_on(Layer::Decorations).is_empty());
}
