//! # Prompt Result Cache
//!
//! A fixed-capacity, least-recently-used store for resolved filters, keyed by the
//! normalized prompt. Both `get` and `set` refresh an entry's recency; `has` does not.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

/// A bounded key/value store with strict least-recently-used eviction.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, Slot<V>>,
    // Recency stamp -> key. The smallest stamp is the eviction candidate.
    order: BTreeMap<u64, K>,
    clock: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Returns the stored value and marks it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let stamp = self.next_stamp();
        let slot = self.entries.get_mut(key)?;
        self.order.remove(&slot.stamp);
        slot.stamp = stamp;
        self.order.insert(stamp, key.clone());
        Some(&slot.value)
    }

    /// Inserts or replaces a value, evicting the least recently used entry when full.
    pub fn set(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let stamp = self.next_stamp();
        if let Some(slot) = self.entries.get_mut(&key) {
            self.order.remove(&slot.stamp);
            slot.value = value;
            slot.stamp = stamp;
            self.order.insert(stamp, key);
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.order.insert(stamp, key.clone());
        self.entries.insert(key, Slot { value, stamp });
    }

    /// Membership test that leaves recency untouched.
    pub fn has(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.order.pop_first() {
            self.entries.remove(&key);
        }
    }
}
