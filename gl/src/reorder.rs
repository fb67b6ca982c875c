//! Reordering intentions and moving a wrapping cursor over them

use tracing::debug;

use crate::domain::Intention;

/// Wrap `index` into `0..len`; an empty list pins to 0
pub fn wrap(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as isize) as usize
}

/// Focus position in a list that wraps at both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self, len: usize) {
        self.index = wrap(self.index as isize + 1, len);
    }

    pub fn prev(&mut self, len: usize) {
        self.index = wrap(self.index as isize - 1, len);
    }

    /// Point at `index`, wrapped into the list
    pub fn set(&mut self, index: usize, len: usize) {
        self.index = wrap(index as isize, len);
    }

    /// Re-wrap after the list changed length
    pub fn renormalize(&mut self, len: usize) {
        self.set(self.index, len);
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Rewrite positions to 0..N-1 in list order
pub fn renumber(list: &mut [Intention]) {
    for (i, intention) in list.iter_mut().enumerate() {
        intention.position = i as i64;
    }
}

/// Swap item `i` with the one above it; false at the top
pub fn move_up(list: &mut [Intention], i: usize) -> bool {
    if i == 0 || i >= list.len() {
        debug!(i, len = list.len(), "move_up: no-op");
        return false;
    }
    list.swap(i - 1, i);
    renumber(list);
    true
}

/// Swap item `i` with the one below it; false at the bottom
pub fn move_down(list: &mut [Intention], i: usize) -> bool {
    if i + 1 >= list.len() {
        debug!(i, len = list.len(), "move_down: no-op");
        return false;
    }
    list.swap(i, i + 1);
    renumber(list);
    true
}
