//! First-in first-out selection, O(V³).

use std::collections::VecDeque;

use super::ActiveNodes;

#[derive(Debug, Default, Clone)]
pub struct FifoQueue {
    queue: VecDeque<usize>,
}

impl ActiveNodes for FifoQueue {
    fn clear(&mut self, _levels: usize) {
        self.queue.clear();
    }

    #[inline]
    fn insert(&mut self, v: usize, _height: usize) {
        self.queue.push_back(v);
    }

    #[inline]
    fn pop(&mut self, _height: &[usize]) -> Option<usize> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_in_first_out() {
        let mut q = FifoQueue::default();
        q.clear(4);
        q.insert(2, 3);
        q.insert(0, 1);
        let h = [1, 1, 3];
        assert_eq!(q.pop(&h), Some(2));
        assert_eq!(q.pop(&h), Some(0));
        assert_eq!(q.pop(&h), None);
    }
}
