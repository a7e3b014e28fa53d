//! Cache Window
//!
//! Bounded model of the vertex cache during optimization. Entries are kept
//! most recent first. Every insertion goes to the front, even when the id is
//! already present, and is followed by trimming from the back; a vertex can
//! therefore occupy several slots until its older copies age out.

use std::collections::VecDeque;

/// Fixed-capacity, duplicate-tolerant FIFO of vertex ids
#[derive(Debug, Clone)]
pub struct CacheWindow {
    entries: VecDeque<u32>,
    capacity: usize,
}

impl CacheWindow {
    /// Create an empty window holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the front and trim to capacity.
    ///
    /// Returns the entry pushed off the back, if any.
    pub fn push_front(&mut self, v: u32) -> Option<u32> {
        self.entries.push_front(v);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Check if a vertex occupies any slot
    pub fn contains(&self, v: u32) -> bool {
        self.entries.contains(&v)
    }

    /// Entry at `slot`, front first
    pub fn get(&self, slot: usize) -> Option<u32> {
        self.entries.get(slot).copied()
    }

    /// Entries front to back
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }

    /// Snapshot of the entries front to back
    pub fn to_vec(&self) -> Vec<u32> {
        self.entries.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_insertion_order() {
        let mut window = CacheWindow::new(4);
        for v in [1, 2, 3] {
            assert_eq!(window.push_front(v), None);
        }
        assert_eq!(window.to_vec(), vec![3, 2, 1]);
        assert_eq!(window.get(0), Some(3));
        assert_eq!(window.get(3), None);
    }

    #[test]
    fn test_trims_from_back() {
        let mut window = CacheWindow::new(3);
        for v in [1, 2, 3] {
            window.push_front(v);
        }
        assert_eq!(window.push_front(4), Some(1));
        assert_eq!(window.push_front(5), Some(2));
        assert_eq!(window.to_vec(), vec![5, 4, 3]);
        assert_eq!(window.len(), window.capacity());
    }

    #[test]
    fn test_duplicates_kept_until_trimmed() {
        let mut window = CacheWindow::new(4);
        window.push_front(7);
        window.push_front(8);
        window.push_front(7);
        assert_eq!(window.to_vec(), vec![7, 8, 7]);

        window.push_front(9);
        assert_eq!(window.push_front(10), Some(7));
        assert_eq!(window.to_vec(), vec![10, 9, 7, 8]);
        assert!(window.contains(7));
    }

    #[test]
    fn test_zero_capacity() {
        let mut window = CacheWindow::new(0);
        assert_eq!(window.push_front(1), Some(1));
        assert!(window.is_empty());
    }
}
