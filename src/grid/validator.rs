// src/grid/validator.rs

//! Sudoku solution check for a 9x9 main grid.

use log::debug;

use crate::grid::Grid;

const SIZE: usize = 9;

/// Checks the main grid as a completed sudoku.
///
/// Returns `(true, "OK")`, or `false` with a message naming the first empty
/// or non-digit cell (row-major, 1-based) or the first row, then column, then
/// box that is not a permutation of 1 to 9.
pub fn check_sudoku(grid: &Grid) -> (bool, String) {
    let layout = grid.layout();
    if layout.main_cols() != SIZE || layout.main_rows() != SIZE {
        return (false, "not sudoku".to_string());
    }

    let mut values = [[0u8; SIZE]; SIZE];
    for (row, line) in values.iter_mut().enumerate() {
        for (col, value) in line.iter_mut().enumerate() {
            let text = grid
                .cell(layout.left + col, layout.top + row)
                .map_or("", |cell| cell.normal_text());
            if text.is_empty() {
                debug!("Check stopped at empty cell r{}c{}", row + 1, col + 1);
                return (false, format!("empty cell at row {}, column {}", row + 1, col + 1));
            }
            match text.parse::<u8>() {
                Ok(digit) if (1..=9).contains(&digit) => *value = digit,
                _ => {
                    debug!("Check stopped at non-digit '{}' in r{}c{}", text, row + 1, col + 1);
                    return (
                        false,
                        format!("invalid digit '{}' at row {}, column {}", text, row + 1, col + 1),
                    );
                }
            }
        }
    }

    let rows: Vec<Vec<u8>> = (0..SIZE).map(|r| values[r].to_vec()).collect();
    let cols: Vec<Vec<u8>> = (0..SIZE).map(|c| (0..SIZE).map(|r| values[r][c]).collect()).collect();
    let boxes: Vec<Vec<u8>> = (0..SIZE)
        .map(|b| {
            let (r0, c0) = ((b / 3) * 3, (b % 3) * 3);
            (0..SIZE).map(|i| values[r0 + i / 3][c0 + i % 3]).collect()
        })
        .collect();

    for (name, groups) in [("row", &rows), ("column", &cols), ("box", &boxes)] {
        if let Some(bad) = groups.iter().position(|g| !is_permutation(g)) {
            return (false, format!("bad {} {}", name, bad + 1));
        }
    }
    (true, "OK".to_string())
}

fn is_permutation(group: &[u8]) -> bool {
    let mut seen = [false; SIZE + 1];
    for &d in group {
        let d = d as usize;
        if d == 0 || d > SIZE || seen[d] {
            return false;
        }
        seen[d] = true;
    }
    true
}
