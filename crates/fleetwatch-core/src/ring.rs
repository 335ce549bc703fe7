//! Fixed-capacity, most-recent-first buffers for alerts and the mission log.

use std::collections::VecDeque;

use crate::models::LogEntry;

/// Insertion-ordered buffer that evicts the oldest entry past capacity.
/// Newest entries sit at the front, matching display order.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Insert at the front; drop from the back once over capacity.
    pub fn push(&mut self, item: T) {
        self.items.push_front(item);
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Newest-to-oldest, same order the panels render.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl RingBuffer<LogEntry> {
    /// Newline-joined `"<timestamp> <message>"` lines, newest first,
    /// consistent with the rendered order.
    pub fn export_text(&self) -> String {
        self.items
            .iter()
            .map(|entry| {
                format!(
                    "{} {}",
                    entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                    entry.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogLevel;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut buf = RingBuffer::new(5);
        for i in 0..6 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 5);
        let items: Vec<_> = buf.iter().copied().collect();
        // 0 was pushed first and must be gone.
        assert_eq!(items, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buf = RingBuffer::new(3);
        buf.push("a");
        buf.push("b");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 3);
    }

    #[test]
    fn export_matches_display_order() {
        let mut log = RingBuffer::new(10);
        log.push(LogEntry::new("first", LogLevel::Info));
        log.push(LogEntry::new("second", LogLevel::Info));

        let text = log.export_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("second"));
        assert!(lines[1].ends_with("first"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = RingBuffer::new(0);
        buf.push(1);
        assert_eq!(buf.len(), 1);
    }
}
