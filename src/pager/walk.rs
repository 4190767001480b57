//! The cursor traversal state machine
//!
//! Position once (first/last/seek per the window), then step in the
//! window's direction, feeding every hit through the skip/count gate and
//! the prefix bound. Both delivery modes and the executor's access paths
//! run this exact logic.

use crate::store::{KeyCursor, Row};

use super::errors::{PageError, PageResult};
use super::window::{Admission, Direction, SkipGate, Window};

#[derive(Clone, Copy)]
enum WalkState {
    Start,
    Active,
    Done,
}

/// A windowed walk over one cursor.
pub struct CursorWalk<C: KeyCursor> {
    cursor: C,
    window: Window,
    gate: SkipGate,
    state: WalkState,
}

impl<C: KeyCursor> CursorWalk<C> {
    /// Creates a walk; nothing touches the cursor until the first
    /// [`CursorWalk::next_row`].
    pub fn new(cursor: C, window: Window) -> Self {
        let gate = SkipGate::new(&window);
        Self {
            cursor,
            window,
            gate,
            state: WalkState::Start,
        }
    }

    /// The next emitted row. `Ok(None)` once the window is satisfied, the
    /// cursor is exhausted, or a prefix mismatch ends the sequence;
    /// [`PageError::NotFound`] when an anchor seek finds nothing.
    pub fn next_row(&mut self) -> PageResult<Option<Row>> {
        loop {
            let row = match self.state {
                WalkState::Done => return Ok(None),
                WalkState::Start => {
                    let initial = self.initial()?;
                    self.state = WalkState::Active;
                    match initial {
                        Some(row) => row,
                        None => {
                            self.state = WalkState::Done;
                            return Ok(None);
                        }
                    }
                }
                WalkState::Active => match self.advance() {
                    Some(row) => row,
                    None => {
                        self.state = WalkState::Done;
                        return Ok(None);
                    }
                },
            };

            match self.gate.admit() {
                Admission::Skip => continue,
                Admission::Done => {
                    self.state = WalkState::Done;
                    return Ok(None);
                }
                Admission::Emit => {
                    if let Some(prefix) = &self.window.prefix {
                        if !self.cursor.has_prefix(&row.key, prefix) {
                            self.state = WalkState::Done;
                            return Ok(None);
                        }
                    }
                    return Ok(Some(row));
                }
            }
        }
    }

    fn initial(&mut self) -> PageResult<Option<Row>> {
        if let Some(anchor) = &self.window.anchor {
            return match self.cursor.seek(anchor) {
                Some(row) => Ok(Some(row)),
                None => Err(PageError::NotFound {
                    key: anchor.clone(),
                }),
            };
        }
        if let Some(prefix) = &self.window.prefix {
            return Ok(self.cursor.seek(prefix));
        }
        Ok(match self.window.direction {
            Direction::Forward => self.cursor.first(),
            Direction::Backward => self.cursor.last(),
        })
    }

    fn advance(&mut self) -> Option<Row> {
        match self.window.direction {
            Direction::Forward => self.cursor.next(),
            Direction::Backward => self.cursor.prev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryCursor, MemoryStore, StoreRead};

    fn numbered_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        for key in ["1", "2", "3", "4", "5", "6", "7"] {
            store.insert_json(key, &serde_json::json!({ "id": key }));
        }
        store
    }

    fn keys(walk: &mut CursorWalk<MemoryCursor>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(row) = walk.next_row().unwrap() {
            out.push(row.key);
        }
        out
    }

    #[test]
    fn test_forward_window() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::forward(3));
        assert_eq!(keys(&mut walk), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_backward_window() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::backward(3));
        assert_eq!(keys(&mut walk), vec!["7", "6", "5"]);
    }

    #[test]
    fn test_before_anchor_inclusive() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::before("5", 3));
        assert_eq!(keys(&mut walk), vec!["5", "4", "3"]);
    }

    #[test]
    fn test_after_anchor_inclusive() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::after("5", 3));
        assert_eq!(keys(&mut walk), vec!["5", "6", "7"]);
    }

    #[test]
    fn test_anchor_past_end_not_found() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::after("9", 3));
        assert_eq!(
            walk.next_row(),
            Err(PageError::NotFound { key: "9".into() })
        );
    }

    #[test]
    fn test_exhaustion_ends_without_error() {
        let store = numbered_store();
        let mut walk = CursorWalk::new(store.cursor(), Window::forward(100));
        assert_eq!(keys(&mut walk).len(), 7);
        // walking a finished sequence stays finished
        assert_eq!(walk.next_row(), Ok(None));
    }

    #[test]
    fn test_empty_store_empty_sequence() {
        let store = MemoryStore::new();
        let mut walk = CursorWalk::new(store.cursor(), Window::forward(3));
        assert_eq!(walk.next_row(), Ok(None));
    }

    #[test]
    fn test_skip_passes_rows() {
        let store = numbered_store();
        // skip = 3 passes two rows past the initial hit
        let mut walk = CursorWalk::new(store.cursor(), Window::forward(2).with_skip(3));
        assert_eq!(keys(&mut walk), vec!["3", "4"]);
    }

    #[test]
    fn test_prefix_bound() {
        let mut store = MemoryStore::new();
        for key in ["post:1", "post:2", "post:3", "user:1", "user:2"] {
            store.insert_json(key, &serde_json::json!({ "id": key }));
        }

        let mut walk = CursorWalk::new(store.cursor(), Window::prefixed("post:", 10));
        assert_eq!(keys(&mut walk), vec!["post:1", "post:2", "post:3"]);
    }

    #[test]
    fn test_prefix_count_cap() {
        let mut store = MemoryStore::new();
        for key in ["post:1", "post:2", "post:3"] {
            store.insert_json(key, &serde_json::json!({ "id": key }));
        }

        let mut walk = CursorWalk::new(store.cursor(), Window::prefixed("post:", 2));
        assert_eq!(keys(&mut walk), vec!["post:1", "post:2"]);
    }

    #[test]
    fn test_prefix_no_match_is_empty() {
        let mut store = MemoryStore::new();
        store.insert_json("user:1", &serde_json::json!({ "id": "user:1" }));

        // seek lands on "user:1", which fails the prefix check immediately
        let mut walk = CursorWalk::new(store.cursor(), Window::prefixed("post:", 10));
        assert_eq!(walk.next_row(), Ok(None));
    }
}
