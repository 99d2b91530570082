//! Min-ordered set of active cursors
//!
//! `BinaryHeap` is a max-heap, so `HeapItem` reverses the comparison on
//! `(value, ordinal)`. Equal values come out in ascending source ordinal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::cursor::Cursor;
use crate::error::{MergeError, Result};

struct HeapItem<R> {
    cursor: Cursor<R>,
}

impl<R> HeapItem<R> {
    fn key(&self) -> (i64, usize) {
        (self.cursor.peek(), self.cursor.ordinal())
    }
}

impl<R> PartialEq for HeapItem<R> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<R> Eq for HeapItem<R> {}

impl<R> Ord for HeapItem<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other.key().cmp(&self.key())
    }
}

impl<R> PartialOrd for HeapItem<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Frontier<R> {
    heap: BinaryHeap<HeapItem<R>>,
}

impl<R> Frontier<R> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, cursor: Cursor<R>) {
        self.heap.push(HeapItem { cursor });
    }

    /// Remove the cursor holding the smallest value.
    ///
    /// An empty frontier is the merge's termination condition; the engine
    /// checks `is_empty` before calling.
    pub fn extract_min(&mut self) -> Result<Cursor<R>> {
        self.heap
            .pop()
            .map(|item| item.cursor)
            .ok_or(MergeError::EmptyFrontier)
    }

    pub fn peek_min(&self) -> Option<&Cursor<R>> {
        self.heap.peek().map(|item| &item.cursor)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of active cursors, which is also the number of open input handles
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<R> Default for Frontier<R> {
    fn default() -> Self {
        Self::new()
    }
}
