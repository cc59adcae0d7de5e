// src/editor/input_handler.rs

use log::{debug, trace};

use super::{Drag, Editor, Mode, PointerButton, PointerEvent, PointerKind};
use crate::color::Ink;
use crate::decoration::Decoration;
use crate::grid::{EdgeKey, Stroke};
use crate::keys::{KeySymbol, Modifiers};
use crate::layout::{HitTarget, RegionKind};
use crate::symbols::keystroke_text;

pub(super) fn process_pointer(editor: &mut Editor, event: PointerEvent) {
    match event.kind {
        PointerKind::Down => pointer_down(editor, event),
        PointerKind::Move => pointer_move(editor, event),
        PointerKind::Up => pointer_up(editor),
    }
}

fn pointer_down(editor: &mut Editor, event: PointerEvent) {
    if event.target == HitTarget::Outside {
        trace!("Pointer down outside the grid; clearing selection.");
        editor.cancel_drag();
        editor.clear_selection();
        return;
    }
    let mode = editor.mode.mode;
    editor.drag = Some(Drag::new(event.button));
    debug!("Drag started: {:?} button in {:?} mode at {:?}", event.button, mode, event.target);

    if event.button == PointerButton::Right {
        if mode == Mode::Cross {
            toggle_cross(editor, event.target);
        }
        return;
    }

    if !event.modifiers.contains(Modifiers::SHIFT) {
        editor.clear_selection();
    }
    if let Some(cell) = event.target.cell() {
        editor.cursor = Some(cell);
    }

    match mode {
        Mode::Path | Mode::Cage => {
            let Some(cell) = event.target.cell() else {
                return;
            };
            editor.pending = Some(match mode {
                Mode::Path => Decoration::path(editor.mode.path_style, editor.color, cell),
                _ => Decoration::cage(editor.mode.cage_style, editor.color, cell),
            });
            editor.decorations_dirty = true;
        }
        Mode::Edge | Mode::Cross => toggle_edge(editor, event.target),
        Mode::CenterLine => toggle_centerline(editor, event.target),
        Mode::Boundary(_) => {
            if let HitTarget::Boundary { x, y, index } = event.target {
                editor.select_boundary((x, y, index));
            }
        }
        Mode::Normal | Mode::Center | Mode::Corner | Mode::Color => {
            if let Some(cell) = event.target.cell() {
                editor.mark_cell(cell);
            }
        }
    }
}

fn pointer_move(editor: &mut Editor, event: PointerEvent) {
    let Some(drag) = editor.drag else {
        return;
    };
    let mode = editor.mode.mode;
    match (drag.button, mode) {
        (PointerButton::Right, Mode::Cross) => toggle_cross(editor, event.target),
        (PointerButton::Right, _) => {}
        // Paths only follow the inner part of a cell so diagonal moves do not
        // pick up the corner of a neighbour.
        (PointerButton::Left, Mode::Path) => {
            if let HitTarget::CellInner { x, y } = event.target {
                extend_pending(editor, (x, y));
            }
        }
        (PointerButton::Left, Mode::Cage) => {
            if let HitTarget::Cell { x, y } | HitTarget::CellInner { x, y } = event.target {
                extend_pending(editor, (x, y));
            }
        }
        (PointerButton::Left, Mode::Edge | Mode::Cross) => toggle_edge(editor, event.target),
        (PointerButton::Left, Mode::CenterLine) => toggle_centerline(editor, event.target),
        (PointerButton::Left, Mode::Boundary(_)) => {}
        (PointerButton::Left, _) => {
            if let Some(cell) = event.target.cell() {
                editor.cursor = Some(cell);
                editor.mark_cell(cell);
            }
        }
    }
}

fn pointer_up(editor: &mut Editor) {
    if editor.drag.take().is_none() {
        return;
    }
    if let Some(decoration) = editor.pending.take() {
        let before = editor.snapshot();
        debug!("Committing decoration with {} cells", decoration.cells().len());
        editor.decorations.push(decoration);
        editor.history.record(before);
        editor.decorations_dirty = true;
    }
    trace!("Drag ended.");
}

fn extend_pending(editor: &mut Editor, cell: (usize, usize)) {
    if editor.pending.as_mut().is_some_and(|d| d.extend(cell)) {
        editor.decorations_dirty = true;
    }
}

fn edge_stroke(editor: &Editor) -> Stroke {
    Stroke {
        weight: editor.mode.line_weight,
        ink: if editor.is_authoring() {
            Ink::Palette(editor.color)
        } else {
            Ink::Solver
        },
    }
}

/// The target as a region key, if it is a region of `kind`.
fn region_key(editor: &Editor, target: HitTarget, kind: RegionKind) -> Option<EdgeKey> {
    let HitTarget::Boundary { x, y, index } = target else {
        return None;
    };
    editor
        .grid
        .region(x, y, index)
        .is_some_and(|r| r.kind == kind)
        .then_some((x, y, index))
}

/// Resolves the drag's latch against a region's current state.
fn latched(editor: &mut Editor, current: bool) -> Option<bool> {
    let drag = editor.drag.as_mut()?;
    let first = drag.latch.state().is_none();
    let on = drag.latch.resolve(current);
    if first {
        debug!("Toggle latch set to {}", if on { "add" } else { "remove" });
    }
    Some(on)
}

fn toggle_edge(editor: &mut Editor, target: HitTarget) {
    let Some(key) = region_key(editor, target, RegionKind::Edge) else {
        return;
    };
    let current = editor.grid.has_edge(key);
    let Some(on) = latched(editor, current) else {
        return;
    };
    let stroke = edge_stroke(editor);
    let authoring = editor.is_authoring();
    editor.drag_edit(|grid| grid.set_edge(key, on, stroke, authoring));
}

fn toggle_centerline(editor: &mut Editor, target: HitTarget) {
    let Some(key) = region_key(editor, target, RegionKind::Edge) else {
        return;
    };
    let current = editor.grid.has_centerline(key);
    let Some(on) = latched(editor, current) else {
        return;
    };
    let stroke = edge_stroke(editor);
    editor.drag_edit(|grid| grid.set_centerline(key, on, stroke));
}

fn toggle_cross(editor: &mut Editor, target: HitTarget) {
    match target {
        HitTarget::Boundary { x, y, index } => {
            let key = (x, y, index);
            let current = editor.grid.has_boundary_cross(key);
            let Some(on) = latched(editor, current) else {
                return;
            };
            editor.drag_edit(|grid| grid.set_boundary_cross(key, on));
        }
        HitTarget::Cell { x, y } | HitTarget::CellInner { x, y } => {
            let current = editor.grid.cell(x, y).is_some_and(|c| c.cross);
            let Some(on) = latched(editor, current) else {
                return;
            };
            editor.drag_edit(|grid| grid.set_cell_cross(x, y, on));
        }
        HitTarget::Outside => {}
    }
}

pub(super) fn process_key(editor: &mut Editor, symbol: KeySymbol, modifiers: Modifiers) {
    if symbol.is_modifier() {
        return;
    }
    if modifiers.intersects(Modifiers::CONTROL | Modifiers::SUPER) {
        match symbol {
            KeySymbol::Char(c) if c.eq_ignore_ascii_case(&'z') => {
                if modifiers.contains(Modifiers::SHIFT) {
                    editor.redo();
                } else {
                    editor.undo();
                }
            }
            KeySymbol::Char(c) if c.eq_ignore_ascii_case(&'y') => {
                editor.redo();
            }
            other => trace!("Ignoring shortcut {:?} with {:?}", other, modifiers),
        }
        return;
    }

    match symbol {
        KeySymbol::Delete | KeySymbol::Backspace => editor.delete_selection(),
        KeySymbol::Escape => editor.clear_selection(),
        KeySymbol::Left | KeySymbol::Right | KeySymbol::Up | KeySymbol::Down => {
            if let Some(direction) = symbol.direction() {
                move_cursor(editor, direction, modifiers.contains(Modifiers::SHIFT));
            }
        }
        KeySymbol::Char(c) => match symbol.digit() {
            Some(digit) => digit_key(editor, digit),
            None => char_key(editor, c),
        },
        other => trace!("Unhandled key {:?}", other),
    }
}

fn digit_key(editor: &mut Editor, digit: u8) {
    if editor.mode.mode == Mode::Color {
        // Digit n picks palette entry n - 1.
        if digit > 0 {
            editor.set_color(digit - 1);
        }
        return;
    }
    let text = keystroke_text(editor.mode.symbol_page, digit);
    editor.set_number(&text);
}

fn char_key(editor: &mut Editor, c: char) {
    if editor.mode.solve_mode {
        let mode = match c.to_ascii_lowercase() {
            'z' => {
                editor.undo();
                return;
            }
            'q' => Mode::Normal,
            'w' => Mode::Center,
            'e' => Mode::Corner,
            'r' => Mode::Color,
            ' ' => editor.mode.mode.next_solve_mode(),
            other => {
                trace!("Ignoring '{}' while solving", other);
                return;
            }
        };
        let mut config = editor.mode.clone();
        config.mode = mode;
        editor.set_mode(config);
        return;
    }

    if c.is_alphabetic() {
        editor.set_number(&c.to_string());
    } else {
        trace!("Ignoring '{}'", c);
    }
}

/// Moves the cursor one cell, wrapping around the grid, and marks the new
/// cell. Without a cursor the first main-grid cell is selected.
fn move_cursor(editor: &mut Editor, (dx, dy): (isize, isize), extend: bool) {
    let layout = editor.grid.layout();
    let (cols, rows) = (layout.cols as isize, layout.rows as isize);
    if cols == 0 || rows == 0 {
        return;
    }
    let next = match editor.cursor {
        Some((x, y)) => (
            (x as isize + dx).rem_euclid(cols) as usize,
            (y as isize + dy).rem_euclid(rows) as usize,
        ),
        None if layout.contains(layout.left, layout.top) => (layout.left, layout.top),
        None => (0, 0),
    };
    if !extend {
        editor.clear_selection();
    }
    editor.cursor = Some(next);
    editor.mark_cell(next);
}
