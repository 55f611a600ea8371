//! Path Index Counter
//!
//! Next unused position index per origin path. Owned by the patch
//! coordinator and handed to each phase explicitly.

use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone)]
pub struct PathCounters {
    next: FxHashMap<String, u32>,
}

impl PathCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the counter for `path` at the start of a patch cycle.
    pub fn reset(&mut self, path: &str) {
        self.next.insert(path.to_string(), 0);
    }

    /// Return the next index for `path` and advance the counter.
    pub fn next(&mut self, path: &str) -> u32 {
        let slot = self.next.entry(path.to_string()).or_insert(0);
        let index = *slot;
        *slot += 1;
        index
    }

    /// Next index for `path` without advancing.
    pub fn peek(&self, path: &str) -> u32 {
        self.next.get(path).copied().unwrap_or(0)
    }

    /// Forget every path (full reload).
    pub fn clear(&mut self) {
        self.next.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_per_path() {
        let mut counters = PathCounters::new();
        assert_eq!(counters.next("/a"), 0);
        assert_eq!(counters.next("/a"), 1);
        assert_eq!(counters.next("/b"), 0);
        assert_eq!(counters.peek("/a"), 2);
        assert_eq!(counters.peek("/missing"), 0);
    }

    #[test]
    fn test_reset_and_clear() {
        let mut counters = PathCounters::new();
        counters.next("/a");
        counters.next("/a");
        counters.reset("/a");
        assert_eq!(counters.next("/a"), 0);

        counters.next("/b");
        counters.clear();
        assert_eq!(counters.peek("/a"), 0);
        assert_eq!(counters.peek("/b"), 0);
    }
}
