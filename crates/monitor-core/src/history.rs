use std::collections::VecDeque;

/// Payloads sent so far, most recent first, with an up/down recall pointer.
///
/// The pointer is `None` while the user edits the live buffer and otherwise
/// indexes `entries` counting back from the most recent payload.
#[derive(Debug, Clone)]
pub struct SendHistory {
    entries: VecDeque<Vec<u8>>,
    capacity: usize,
    pointer: Option<usize>,
}

impl SendHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(128)),
            capacity: capacity.max(1),
            pointer: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    /// Entry under the pointer, if any.
    pub fn current(&self) -> Option<&[u8]> {
        self.pointer.and_then(|i| self.get(i))
    }

    /// Record a sent payload and return to the live buffer.
    pub fn push(&mut self, payload: Vec<u8>) {
        self.pointer = None;
        if self.entries.front() == Some(&payload) {
            return;
        }
        self.entries.push_front(payload);
        self.entries.truncate(self.capacity);
    }

    /// Step toward older entries. Returns whether the pointer moved.
    pub fn up(&mut self) -> bool {
        let next = match self.pointer {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return false;
        }
        self.pointer = Some(next);
        true
    }

    /// Step toward the live buffer. Returns whether the pointer moved.
    pub fn down(&mut self) -> bool {
        match self.pointer {
            None => false,
            Some(0) => {
                self.pointer = None;
                true
            }
            Some(i) => {
                self.pointer = Some(i - 1);
                true
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn history(items: &[&[u8]]) -> SendHistory {
        let mut h = SendHistory::new(10);
        for item in items {
            h.push(item.to_vec());
        }
        h
    }

    #[test]
    fn test_most_recent_first() {
        let h = history(&[b"one", b"two"]);
        assert_eq!(h.get(0), Some(&b"two"[..]));
        assert_eq!(h.get(1), Some(&b"one"[..]));
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut h = history(&[b"a", b"b", b"c"]);

        assert!(!h.down());
        assert_eq!(h.pointer(), None);

        assert!(h.up());
        assert!(h.up());
        assert!(h.up());
        assert_eq!(h.pointer(), Some(2));
        assert_eq!(h.current(), Some(&b"a"[..]));
        assert!(!h.up());
        assert_eq!(h.pointer(), Some(2));

        for _ in 0..3 {
            assert!(h.down());
        }
        assert_eq!(h.pointer(), None);
        assert!(!h.down());
    }

    #[test]
    fn test_up_on_empty_history() {
        let mut h = SendHistory::new(10);
        assert!(!h.up());
        assert_eq!(h.pointer(), None);
        assert!(h.current().is_none());
    }

    #[test]
    fn test_push_resets_pointer() {
        let mut h = history(&[b"a", b"b"]);
        h.up();
        h.push(b"c".to_vec());
        assert_eq!(h.pointer(), None);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut h = history(&[b"a", b"a", b"b", b"a"]);
        assert_eq!(h.len(), 3);
        h.push(b"a".to_vec());
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = SendHistory::new(2);
        h.push(b"1".to_vec());
        h.push(b"2".to_vec());
        h.push(b"3".to_vec());
        assert_eq!(h.len(), 2);
        assert_eq!(h.get(1), Some(&b"2"[..]));
    }
}
