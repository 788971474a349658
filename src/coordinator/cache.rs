use std::collections::VecDeque;

/// Number of results kept before the oldest is evicted.
pub const CACHE_CAPACITY: usize = 10;

/// Bounded fingerprint → result store.
///
/// Eviction follows insertion order only: a lookup never refreshes an entry.
#[derive(Debug, Clone)]
pub struct ResultCache<V> {
    entries: VecDeque<(String, V)>,
    capacity: usize,
}

impl<V: Clone> ResultCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Stores `value` under `fingerprint` as the newest entry.
    ///
    /// An existing entry for the same fingerprint is replaced.
    pub fn add(&mut self, fingerprint: &str, value: V) {
        self.entries.retain(|(key, _)| key != fingerprint);
        self.entries.push_back((fingerprint.to_string(), value));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Looks up `fingerprint` without changing the eviction order.
    pub fn lookup(&self, fingerprint: &str) -> Option<V> {
        self.entries
            .iter()
            .find(|(key, _)| key == fingerprint)
            .map(|(_, value)| value.clone())
    }

    /// Drops every entry.
    pub fn purge(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_insert() {
        let mut cache = ResultCache::new();
        for i in 1..=11 {
            cache.add(&format!("fp{i}"), i);
        }

        assert_eq!(cache.len(), CACHE_CAPACITY);
        assert_eq!(cache.lookup("fp1"), None);
        for i in 2..=11 {
            assert_eq!(cache.lookup(&format!("fp{i}")), Some(i));
        }
    }

    #[test]
    fn test_lookup_does_not_refresh() {
        let mut cache = ResultCache::with_capacity(2);
        cache.add("a", 1);
        cache.add("b", 2);
        assert_eq!(cache.lookup("a"), Some(1));
        cache.add("c", 3);
        assert_eq!(cache.lookup("a"), None);
        assert_eq!(cache.lookup("b"), Some(2));
    }

    #[test]
    fn test_re_add_replaces() {
        let mut cache = ResultCache::with_capacity(2);
        cache.add("a", 1);
        cache.add("b", 2);
        cache.add("a", 10);
        assert_eq!(cache.len(), 2);
        cache.add("c", 3);
        assert_eq!(cache.lookup("a"), Some(10));
        assert_eq!(cache.lookup("b"), None);
    }

    #[test]
    fn test_purge() {
        let mut cache = ResultCache::new();
        cache.add("a", "x".to_string());
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup("a"), None);
    }
}
