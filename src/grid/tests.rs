// src/grid/tests.rs

//! Unit tests for the cell store: the `set_cell` state machine, boundary
//! toggles, snapshots and the sudoku check.

use crate::color::{Ink, CLEAR_COLOR_INDEX};
use crate::config::GridConfig;
use crate::grid::validator::check_sudoku;
use crate::grid::{DigitSet, Edit, EntryMode, Grid, LockType, Position, Stroke};
use crate::layout::Layout;
use crate::scene::LineWeight;
use test_log::test;

// --- Test Helpers ---

fn grid_9x9() -> Grid {
    Grid::new(Layout::new(&GridConfig::default()))
}

fn grid_with_margin() -> Grid {
    Grid::new(Layout::new(&GridConfig {
        width: 4,
        height: 4,
        left: 1,
        top: 1,
        ..GridConfig::default()
    }))
}

fn at(x: usize, y: usize) -> Position {
    Position::Cell { x, y }
}

fn fat() -> Stroke {
    Stroke { weight: LineWeight::Fat, ink: Ink::Palette(0) }
}

/// Fills the main grid with a valid sudoku solution.
fn fill_solution(grid: &mut Grid) {
    for r in 0..9 {
        for c in 0..9 {
            let digit = ((r * 3 + r / 3 + c) % 9 + 1).to_string();
            assert!(grid.set_cell(at(c, r), &Edit::new(EntryMode::Normal, &digit)));
        }
    }
}

// --- Normal mode ---

#[test]
fn authoring_write_locks_the_cell_with_its_color() {
    let mut grid = grid_9x9();
    assert!(grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5").with_color(4)));
    let cell = grid.cell(0, 0).unwrap();
    assert_eq!(cell.normal_text(), "5");
    assert_eq!(cell.lock, LockType::Normal);
    assert_eq!(cell.author_color, 4);
    assert_eq!(cell.content.text.as_ref().unwrap().ink, Ink::Palette(4));
}

#[test]
fn clearing_an_authored_cell_unlocks_it() {
    let mut grid = grid_9x9();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5"));
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, ""));
    assert_eq!(grid.cell(0, 0).unwrap().lock, LockType::None);
    assert!(grid.cell(0, 0).unwrap().content.is_empty());
}

#[test]
fn solver_cannot_overwrite_a_locked_clue() {
    let mut grid = grid_9x9();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5"));
    assert!(!grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "7").solving()));
    assert!(!grid.set_cell(at(0, 0), &Edit::new(EntryMode::Center, "7").solving()));
    assert_eq!(grid.cell(0, 0).unwrap().normal_text(), "5");
}

#[test]
fn solver_may_color_a_locked_clue() {
    let mut grid = grid_9x9();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5"));
    assert!(grid.set_cell(at(0, 0), &Edit::new(EntryMode::Color, "").solving().with_color(3)));
    let cell = grid.cell(0, 0).unwrap();
    assert_eq!(cell.solver_fill, Some(3));
    assert_eq!(cell.author_fill, None);
}

#[test]
fn solver_digits_use_solver_ink() {
    let mut grid = grid_9x9();
    grid.set_cell(at(2, 2), &Edit::new(EntryMode::Normal, "3").solving().with_color(6));
    let cell = grid.cell(2, 2).unwrap();
    assert_eq!(cell.content.text.as_ref().unwrap().ink, Ink::Solver);
    assert_eq!(cell.lock, LockType::None);
}

#[test]
fn normal_digit_clears_pencil_marks_but_symbol_does_not() {
    let mut grid = grid_9x9();
    let solve = |mode, text| Edit::new(mode, text).solving();
    grid.set_cell(at(1, 1), &solve(EntryMode::Center, "3"));
    grid.set_cell(at(1, 1), &solve(EntryMode::Corner, "4"));
    grid.set_cell(at(1, 1), &Edit::new(EntryMode::Normal, "#11"));
    assert_eq!(grid.cell(1, 1).unwrap().center.to_text(), "3");
    assert_eq!(grid.cell(1, 1).unwrap().corner, vec![4]);

    grid.set_cell(at(1, 1), &Edit::new(EntryMode::Normal, "5"));
    let cell = grid.cell(1, 1).unwrap();
    assert!(cell.center.is_empty());
    assert!(cell.corner.is_empty());
    assert_eq!(cell.content.symbol.as_ref().unwrap().text, "#11");
}

#[test]
fn multi_digit_appends() {
    let mut grid = grid_with_margin();
    let mut edit = Edit::new(EntryMode::Normal, "1");
    edit.multi_digit = true;
    grid.set_cell(at(0, 2), &edit);
    edit.text = "2";
    grid.set_cell(at(0, 2), &edit);
    assert_eq!(grid.cell(0, 2).unwrap().normal_text(), "12");
}

// --- Center and corner marks ---

#[test]
fn center_marks_toggle_and_stay_ascending() {
    let mut grid = grid_9x9();
    for d in ["7", "2", "9", "2"] {
        grid.set_cell(at(4, 4), &Edit::new(EntryMode::Center, d).solving());
    }
    assert_eq!(grid.cell(4, 4).unwrap().center.to_text(), "79");

    // Non-digits and zero leave the set alone; empty text clears it.
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Center, "a").solving());
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Center, "0").solving());
    assert_eq!(grid.cell(4, 4).unwrap().center, DigitSet::from_digits(&[7, 9]));
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Center, "").solving());
    assert!(grid.cell(4, 4).unwrap().center.is_empty());
}

#[test]
fn marks_are_ignored_on_filled_cells() {
    let mut grid = grid_9x9();
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Normal, "6").solving());
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Center, "1").solving());
    grid.set_cell(at(4, 4), &Edit::new(EntryMode::Corner, "1").solving());
    let cell = grid.cell(4, 4).unwrap();
    assert!(cell.center.is_empty());
    assert!(cell.corner.is_empty());
}

#[test]
fn corner_marks_are_capped_by_slot_count() {
    let mut grid = grid_9x9();
    for d in 1..=9 {
        grid.set_cell(at(0, 0), &Edit::new(EntryMode::Corner, &d.to_string()).solving());
    }
    assert_eq!(grid.cell(0, 0).unwrap().corner, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn margin_cells_accept_only_normal_solver_writes() {
    let mut grid = grid_with_margin();
    assert!(!grid.cell(0, 0).unwrap().main_grid);
    assert!(!grid.set_cell(at(0, 0), &Edit::new(EntryMode::Center, "1").solving()));
    assert!(!grid.set_cell(at(0, 0), &Edit::new(EntryMode::Color, "").solving().with_color(3)));
    assert!(grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "1").solving()));

    // Authoring may write corner marks there, but a margin cell has no slots.
    assert!(grid.set_cell(at(0, 1), &Edit::new(EntryMode::Corner, "1")));
    assert!(grid.cell(0, 1).unwrap().corner.is_empty());
}

// --- Color mode ---

#[test]
fn clear_color_index_removes_the_fill() {
    let mut grid = grid_9x9();
    grid.set_cell(at(3, 3), &Edit::new(EntryMode::Color, "").with_color(5));
    assert_eq!(grid.cell(3, 3).unwrap().author_fill, Some(5));
    grid.set_cell(at(3, 3), &Edit::new(EntryMode::Color, "").with_color(CLEAR_COLOR_INDEX));
    assert_eq!(grid.cell(3, 3).unwrap().author_fill, None);
}

// --- Boundaries ---

#[test]
fn boundary_writes_land_in_the_region() {
    let mut grid = grid_9x9();
    let pos = Position::Boundary { x: 2, y: 2, index: 0 };
    assert!(grid.set_cell(pos, &Edit::new(EntryMode::Normal, "#44").with_color(6).with_background(true)));
    let region = grid.region(2, 2, 0).unwrap();
    let symbol = region.content.symbol.as_ref().unwrap();
    assert_eq!((symbol.text.as_str(), symbol.ink, symbol.background), ("#44", Ink::Palette(6), true));
    assert!(grid.cell(2, 2).unwrap().content.is_empty());

    assert!(!grid.set_cell(pos, &Edit::new(EntryMode::Center, "1")));
    assert!(!grid.set_cell(Position::Boundary { x: 2, y: 2, index: 99 }, &Edit::new(EntryMode::Normal, "1")));
}

#[test]
fn edges_only_exist_on_edge_regions() {
    let mut grid = grid_9x9();
    assert!(!grid.set_edge((1, 1, 0), true, fat(), true));
    assert!(grid.set_edge((1, 1, 12), true, fat(), true));
    assert!(grid.has_edge((1, 1, 12)));
    assert!(!grid.set_edge((1, 1, 12), true, fat(), true));
}

#[test]
fn solver_cannot_remove_locked_edges() {
    let mut grid = grid_9x9();
    grid.set_edge((1, 1, 12), true, fat(), true);
    assert!(!grid.set_edge((1, 1, 12), false, fat(), false));
    assert!(grid.has_edge((1, 1, 12)));

    grid.set_edge((1, 1, 13), true, fat(), false);
    assert!(grid.set_edge((1, 1, 13), false, fat(), false));
}

#[test]
fn centerlines_skip_the_main_grid_border() {
    let mut grid = grid_9x9();
    // Left edge of column 0 and top edge of row 0 lie on the frame.
    assert!(!grid.set_centerline((0, 3, 12), true, fat()));
    assert!(!grid.set_centerline((3, 0, 13), true, fat()));
    // Right and bottom edges only exist on the last column/row, also on the frame.
    let last = grid.region(8, 8, 14).unwrap();
    assert_eq!(last.kind, crate::layout::RegionKind::Edge);
    assert!(!grid.set_centerline((8, 8, 14), true, fat()));

    assert!(grid.set_centerline((3, 3, 12), true, fat()));
    assert!(grid.has_centerline((3, 3, 12)));
    assert!(grid.set_centerline((3, 3, 12), false, fat()));
    assert!(!grid.has_centerline((3, 3, 12)));
}

#[test]
fn crosses_toggle_on_cells_and_regions() {
    let mut grid = grid_9x9();
    assert!(grid.set_cell_cross(2, 2, true));
    assert!(!grid.set_cell_cross(2, 2, true));
    assert!(grid.set_boundary_cross((2, 2, 16), true));
    assert!(grid.has_boundary_cross((2, 2, 16)));
}

// --- Reset ---

#[test]
fn solver_reset_keeps_authored_content() {
    let mut grid = grid_9x9();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5"));
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Color, "").with_color(3));
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Color, "").solving().with_color(4));
    grid.set_edge((0, 0, 13), true, fat(), true);
    grid.set_edge((0, 0, 12), true, fat(), false);
    grid.set_cell(at(1, 0), &Edit::new(EntryMode::Normal, "2").solving());
    grid.set_cell_cross(0, 0, true);

    for pos in [at(0, 0), at(1, 0)] {
        assert!(grid.set_cell(pos, &Edit::new(EntryMode::Reset, "").solving()));
    }
    let clue = grid.cell(0, 0).unwrap();
    assert_eq!(clue.normal_text(), "5");
    assert_eq!(clue.author_fill, Some(3));
    assert_eq!(clue.solver_fill, None);
    assert!(!clue.cross);
    assert!(grid.has_edge((0, 0, 13)));
    assert!(!grid.has_edge((0, 0, 12)));
    assert_eq!(grid.cell(1, 0).unwrap().normal_text(), "");
}

#[test]
fn authoring_reset_clears_everything() {
    let mut grid = grid_9x9();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "5"));
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, "#11"));
    grid.set_cell(Position::Boundary { x: 0, y: 0, index: 1 }, &Edit::new(EntryMode::Normal, "3"));
    grid.set_edge((0, 0, 13), true, fat(), true);

    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Reset, ""));
    let cell = grid.cell(0, 0).unwrap();
    assert!(cell.content.is_empty());
    assert_eq!(cell.lock, LockType::None);
    assert!(cell.boundaries.iter().all(|b| b.is_blank()));
    assert!(grid.edges().is_empty());
}

// --- Dirty tracking and snapshots ---

#[test]
fn writes_mark_cells_dirty_once() {
    let mut grid = grid_9x9();
    grid.set_cell(at(1, 2), &Edit::new(EntryMode::Normal, "1"));
    grid.set_cell(at(1, 2), &Edit::new(EntryMode::Normal, "2"));
    grid.set_edge((3, 3, 12), true, fat(), true);
    assert_eq!(grid.take_dirty_cells(), vec![(1, 2), (3, 3)]);
    assert!(grid.take_dirty_cells().is_empty());
}

#[test]
fn snapshot_restores_cells_and_edges() {
    let mut grid = grid_9x9();
    grid.set_cell(at(1, 1), &Edit::new(EntryMode::Normal, "4"));
    let snapshot = grid.snapshot();

    grid.set_cell(at(1, 1), &Edit::new(EntryMode::Normal, "8"));
    grid.set_edge((1, 1, 12), true, fat(), true);
    grid.restore(&snapshot);

    assert_eq!(grid.cell(1, 1).unwrap().normal_text(), "4");
    assert!(grid.edges().is_empty());
    assert_eq!(grid.snapshot(), snapshot);
}

#[test]
fn snapshot_from_another_shape_is_ignored() {
    let mut grid = grid_9x9();
    grid.set_cell(at(1, 1), &Edit::new(EntryMode::Normal, "4"));
    let foreign = grid_with_margin().snapshot();
    grid.restore(&foreign);
    assert_eq!(grid.cell(1, 1).unwrap().normal_text(), "4");
}

// --- Sudoku check ---

#[test]
fn solved_grid_checks_ok() {
    let mut grid = grid_9x9();
    fill_solution(&mut grid);
    assert_eq!(check_sudoku(&grid), (true, "OK".to_string()));
}

#[test]
fn non_sudoku_geometry_is_rejected() {
    let grid = grid_with_margin();
    assert_eq!(check_sudoku(&grid), (false, "not sudoku".to_string()));
}

#[test]
fn first_empty_cell_is_reported() {
    let mut grid = grid_9x9();
    fill_solution(&mut grid);
    grid.set_cell(at(4, 2), &Edit::new(EntryMode::Normal, ""));
    grid.set_cell(at(1, 6), &Edit::new(EntryMode::Normal, ""));
    let (ok, message) = check_sudoku(&grid);
    assert!(!ok);
    assert_eq!(message, "empty cell at row 3, column 5");
}

#[test]
fn letters_are_invalid_digits_not_empty_cells() {
    let mut grid = grid_9x9();
    fill_solution(&mut grid);
    grid.set_cell(at(2, 1), &Edit::new(EntryMode::Normal, "A"));
    assert_eq!(
        check_sudoku(&grid),
        (false, "invalid digit 'A' at row 2, column 3".to_string())
    );
    grid.set_cell(at(2, 1), &Edit::new(EntryMode::Normal, "12"));
    assert_eq!(
        check_sudoku(&grid),
        (false, "invalid digit '12' at row 2, column 3".to_string())
    );
}

#[test]
fn duplicate_in_a_row_is_reported_before_columns() {
    let mut grid = grid_9x9();
    fill_solution(&mut grid);
    let neighbour = grid.cell(1, 4).unwrap().normal_text().to_string();
    grid.set_cell(at(0, 4), &Edit::new(EntryMode::Normal, &neighbour));
    assert_eq!(check_sudoku(&grid), (false, "bad row 5".to_string()));
}

#[test]
fn swapped_cells_break_columns_only() {
    let mut grid = grid_9x9();
    fill_solution(&mut grid);
    let a = grid.cell(0, 0).unwrap().normal_text().to_string();
    let b = grid.cell(1, 0).unwrap().normal_text().to_string();
    grid.set_cell(at(0, 0), &Edit::new(EntryMode::Normal, &b));
    grid.set_cell(at(1, 0), &Edit::new(EntryMode::Normal, &a));
    assert_eq!(check_sudoku(&grid), (false, "bad column 1".to_string()));
}
