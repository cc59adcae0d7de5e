// src/history.rs

//! Undo/redo stacks of whole-state snapshots.

use log::debug;

/// Two stacks of snapshots.
///
/// Callers record the state *before* each mutation. Undo and redo swap the
/// current state with the top of one stack and push it onto the other, so
/// an undo followed by a redo lands exactly where it started. Recording does
/// not clear the redo stack; only `clear` does.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: Vec<T>,
    redo: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the state from before a mutation.
    pub fn record(&mut self, before: T) {
        self.undo.push(before);
        debug!("History: recorded snapshot ({} undo, {} redo)", self.undo.len(), self.redo.len());
    }

    /// Returns the state to restore, or `None` (and drops `current`) when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn undo_walks_back_to_the_first_state() {
        let mut history = History::new();
        let mut state = 0;
        for next in 1..=3 {
            history.record(state);
            state = next;
        }
        while let Some(previous) = history.undo(state) {
            state = previous;
        }
        assert_eq!(state, 0);
        assert!(history.can_redo());
    }

    #[test]
    fn redo_after_undo_returns_to_the_same_state() {
        let mut history = History::new();
        history.record("a");
        let undone = history.undo("b").unwrap();
        assert_eq!(undone, "a");
        assert_eq!(history.redo(undone), Some("b"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_stacks_return_none() {
        let mut history: History<u8> = History::new();
        assert_eq!(history.undo(1), None);
        assert_eq!(history.redo(1), None);
    }

    #[test]
    fn recording_keeps_redo_until_clear() {
        let mut history = History::new();
        history.record(1);
        history.undo(2);
        history.record(5);
        assert!(history.can_redo());
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
