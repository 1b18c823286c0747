// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Snapshot trail for backtracking.
//!
//! The engine records the state it is about to change by pushing a copy of
//! it onto a trail. Backtracking pops entries until the trail is back at a
//! recorded depth, restoring the oldest popped copy. Frames and odometer
//! wheels are cheap to copy (sections are shared), so snapshots are plain
//! values and there is no per-field undo log.
//!
//! # Depth marks
//!
//! `len()` before a push is the mark for that push. Rewinding to a mark
//! undoes that push and everything pushed after it.

/// A stack of saved values with depth-based rewind.
#[derive(Debug, Clone)]
pub struct Trail<T> {
    /// Saved values, oldest first.
    entries: Vec<T>,
    /// High-water mark, for diagnostics.
    max_depth: usize,
}

impl<T> Trail<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(64),
            max_depth: 0,
        }
    }

    /// Save a value. Returns the mark to rewind to in order to undo it.
    pub fn push(&mut self, value: T) -> usize {
        let mark = self.entries.len();
        self.entries.push(value);
        self.max_depth = self.max_depth.max(self.entries.len());
        mark
    }

    /// Pop entries until the trail is `mark` deep, calling `restore` with
    /// each popped value, newest first. The last call therefore receives the
    /// value saved by the push that returned `mark`.
    ///
    /// # Panics
    ///
    /// Panics if the trail is already shallower than `mark`; that would mean
    /// a stack frame was popped twice.
    pub fn rewind_to(&mut self, mark: usize, mut restore: impl FnMut(T)) {
        assert!(
            mark <= self.entries.len(),
            "Trail rewind to {} but depth is only {}",
            mark,
            self.entries.len()
        );
        while self.entries.len() > mark {
            if let Some(value) = self.entries.pop() {
                restore(value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Self::new()
    }
}
