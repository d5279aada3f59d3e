use std::collections::HashMap;
use std::hash::Hash;

struct Entry<V> {
    value: V,
    last_used: u64,
}

/// Bounded map that evicts the least recently used entry once full.
/// Recency is a monotonic stamp bumped on every access, so eviction is
/// a linear scan for the minimum; capacities here are small enough that
/// this beats carrying a linked structure around.
pub struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        LruCache {
            capacity,
            tick: 0,
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a value and marks it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|entry| {
            entry.last_used = tick;
            &entry.value
        })
    }

    /// Inserts a value, evicting the least recently used entry if the
    /// cache is at capacity and the key is new.
    pub fn insert(&mut self, key: K, value: V) {
        self.tick += 1;
        let tick = self.tick;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                self.entries.remove(&oldest);
            }
        }

        self.entries.insert(
            key,
            Entry {
                value,
                last_used: tick,
            },
        );
    }
}
