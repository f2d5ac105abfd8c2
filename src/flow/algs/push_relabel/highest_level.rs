//! Highest-label selection, O(V²·√E).

use super::ActiveNodes;

/// Buckets of active nodes indexed by height.
#[derive(Debug, Default, Clone)]
pub struct HighestLevel {
    buckets: Vec<Vec<usize>>,
    highest: usize,
}

impl ActiveNodes for HighestLevel {
    fn clear(&mut self, levels: usize) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.buckets.resize_with(levels, Vec::new);
        self.highest = 0;
    }

    fn insert(&mut self, v: usize, height: usize) {
        if height >= self.buckets.len() {
            // dead nodes are never discharged
            return;
        }
        self.buckets[height].push(v);
        self.highest = self.highest.max(height);
    }

    fn pop(&mut self, height: &[usize]) -> Option<usize> {
        loop {
            let bucket = self.buckets.get_mut(self.highest)?;
            match bucket.pop() {
                // entries whose node moved since insertion are stale
                Some(v) if height[v] == self.highest => return Some(v),
                Some(_) => {}
                None if self.highest == 0 => return None,
                None => self.highest -= 1,
            }
        }
    }
}
