//! Bounded most-recently-used list.

use std::collections::VecDeque;

/// Most-recent-first list without duplicates, capped at `limit` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyList<T> {
    items: VecDeque<T>,
    limit: usize,
}

impl<T: PartialEq + Clone> RecencyList<T> {
    /// A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            items: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Restore from a stored sequence (most recent first). Later duplicates
    /// are dropped and the tail beyond `limit` is cut.
    pub fn from_items(limit: usize, items: impl IntoIterator<Item = T>) -> Self {
        let mut list = Self::new(limit);
        for item in items {
            if list.items.len() == list.limit {
                break;
            }
            if !list.items.contains(&item) {
                list.items.push_back(item);
            }
        }
        list
    }

    /// Insert at the front, moving an existing entry instead of duplicating it.
    pub fn touch(&mut self, item: T) {
        if let Some(pos) = self.items.iter().position(|i| *i == item) {
            self.items.remove(pos);
        }
        self.items.push_front(item);
        self.items.truncate(self.limit);
    }

    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn most_recent(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reselect_moves_to_front() {
        let mut list = RecencyList::new(5);
        list.touch("A");
        list.touch("B");
        list.touch("A");
        assert_eq!(list.to_vec(), vec!["A", "B"]);
        assert_eq!(list.most_recent(), Some(&"A"));
    }

    #[test]
    fn bounded_to_limit() {
        let mut list = RecencyList::new(3);
        for item in ["a", "b", "c", "d"] {
            list.touch(item);
        }
        assert_eq!(list.to_vec(), vec!["d", "c", "b"]);
        assert_eq!(list.limit(), 3);
    }

    #[test]
    fn from_items_dedups_and_truncates() {
        let list = RecencyList::from_items(2, ["x", "x", "y", "z"]);
        assert_eq!(list.to_vec(), vec!["x", "y"]);

        let zero = RecencyList::<&str>::new(0);
        assert_eq!(zero.limit(), 1);
    }

    #[test]
    fn remove_entry() {
        let mut list = RecencyList::from_items(5, ["a", "b"]);
        assert!(list.remove(&"a"));
        assert!(!list.remove(&"a"));
        assert_eq!(list.to_vec(), vec!["b"]);
        assert_eq!(list.iter().count(), 1);
    }
}
