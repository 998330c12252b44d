use crate::scheduler::Delay;
use std::collections::VecDeque;

#[derive(Debug)]
struct Entry<T> {
    item: T,
    remaining: Delay,
}

/// Queue ordered ascending by remaining delay.
///
/// Remaining delays are relative to the moment the current head was extracted: every
/// [`pop`](TurnQueue::pop) subtracts the popped entry's delay from all others. Entries with
/// equal delay leave in insertion order.
///
/// ```
/// use tileport::scheduler::TurnQueue;
///
/// let mut queue = TurnQueue::new();
/// queue.push("a", 100);
/// queue.push("b", 50);
/// queue.push("c", 50);
///
/// assert_eq!(queue.pop(), Some(("b", 50)));
/// assert_eq!(queue.pop(), Some(("c", 0)));
/// assert_eq!(queue.pop(), Some(("a", 50)));
/// assert_eq!(queue.pop(), None);
/// ```
#[derive(Debug)]
pub struct TurnQueue<T> {
    entries: VecDeque<Entry<T>>,
}

impl<T> Default for TurnQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TurnQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Inserts `item` after every entry whose remaining delay is at most `delay`.
    pub fn push(&mut self, item: T, delay: Delay) {
        let at = self
            .entries
            .iter()
            .position(|e| e.remaining > delay)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Entry { item, remaining: delay });
    }

    /// Removes the head and re-bases every other entry on it. Returns the item with the delay
    /// it still had when extracted.
    pub fn pop(&mut self) -> Option<(T, Delay)> {
        let head = self.entries.pop_front()?;
        for entry in self.entries.iter_mut() {
            entry.remaining = entry.remaining.saturating_sub(head.remaining);
        }
        Some((head.item, head.remaining))
    }

    /// Removes the first entry matching `pred` without re-basing the others.
    pub fn remove_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<(T, Delay)> {
        let at = self.entries.iter().position(|e| pred(&e.item))?;
        self.entries.remove(at).map(|e| (e.item, e.remaining))
    }

    pub fn peek(&self) -> Option<(&T, Delay)> {
        self.entries.front().map(|e| (&e.item, e.remaining))
    }

    /// Entries from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = (&T, Delay)> {
        self.entries.iter().map(|e| (&e.item, e.remaining))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn delays<T: Copy>(queue: &TurnQueue<T>) -> Vec<(T, Delay)> {
        queue.iter().map(|(item, d)| (*item, d)).collect()
    }

    #[test]
    fn head_extraction_rebases_the_rest() {
        let mut queue = TurnQueue::new();
        queue.push('A', 100);
        queue.push('B', 50);
        queue.push('C', 50);

        assert_eq!(delays(&queue), vec![('B', 50), ('C', 50), ('A', 100)]);
        assert_eq!(queue.pop(), Some(('B', 50)));
        assert_eq!(delays(&queue), vec![('C', 0), ('A', 50)]);
    }

    #[test]
    fn zero_delay_goes_after_other_zeros() {
        let mut queue = TurnQueue::new();
        queue.push(1, 0);
        queue.push(2, 5);
        queue.push(3, 0);
        queue.push(4, 0);

        assert_eq!(delays(&queue), vec![(1, 0), (3, 0), (4, 0), (2, 5)]);
    }

    #[test]
    fn remove_keeps_remaining_delays() {
        let mut queue = TurnQueue::new();
        queue.push('x', 10);
        queue.push('y', 20);

        assert_eq!(queue.remove_by(|c| *c == 'x'), Some(('x', 10)));
        assert_eq!(queue.remove_by(|c| *c == 'x'), None);
        assert_eq!(queue.peek(), Some((&'y', 20)));
    }

    #[test]
    fn pops_in_absolute_time_order() {
        let mut rng = rand::rng();
        let mut queue = TurnQueue::new();
        let mut absolute = Vec::new();
        for i in 0..200usize {
            let delay = rng.random_range(0..1000);
            queue.push(i, delay);
            absolute.push((delay, i));
        }
        // A stable sort by delay is exactly the expected order, ties by insertion.
        absolute.sort_by_key(|(delay, _)| *delay);

        let mut now = 0;
        let mut popped = Vec::new();
        while let Some((item, delay)) = queue.pop() {
            now += delay;
            popped.push((now, item));
        }
        assert_eq!(popped, absolute);
    }
}
