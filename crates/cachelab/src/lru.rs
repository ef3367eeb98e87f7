//! LRU (Least Recently Used) cache engine
//!
//! Slot arena plus an intrusive doubly-linked recency list addressed by
//! slot index, so move-to-front and evict-tail are O(1) without any
//! pointer-chasing allocation per entry.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

/// One resident entry plus its links in the recency list
struct Slot<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity cache with strict LRU eviction
///
/// `head` is the most-recently-used entry, `tail` the least-recently-used.
/// Every `get` or `put` that touches a key relinks it to the head.
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    slots: Vec<Option<Slot<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// Callers validate the capacity before construction; see
    /// [`CacheService::create_cache`](crate::CacheService::create_cache).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be at least 1");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            capacity,
        }
    }

    /// Look up a key, promoting it to most-recently-used on a hit
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if let Some(&idx) = self.map.get(key) {
            self.move_to_front(idx);
            self.slots[idx].as_ref().map(|slot| &slot.value)
        } else {
            None
        }
    }

    /// Insert or update a key, promoting it to most-recently-used
    ///
    /// Updating a resident key never evicts. Inserting a new key into a
    /// full cache evicts the tail first; the evicted pair is returned so
    /// callers can count evictions.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(slot) = &mut self.slots[idx] {
                slot.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_tail()
        } else {
            None
        };

        let idx = self.alloc_slot();
        self.slots[idx] = Some(Slot {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.slots[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        evicted
    }

    /// Whether a key is resident, without touching recency order
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Number of resident entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries, fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over resident entries from most- to least-recently-used
    ///
    /// Purely observational; recency order is not disturbed.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cache: self,
            next: self.head,
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already MRU
        }

        self.unlink(idx);

        if let Some(slot) = &mut self.slots[idx] {
            slot.prev = None;
            slot.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.slots[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(slot) = &self.slots[idx] {
            (slot.prev, slot.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_slot) = &mut self.slots[prev_idx] {
                    prev_slot.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_slot) = &mut self.slots[next_idx] {
                    next_slot.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn evict_tail(&mut self) -> Option<(K, V)> {
        let tail_idx = self.tail?;
        // Unlink while the slot is still occupied; the tail pointer must
        // move to the predecessor before the slot index is recycled.
        self.unlink(tail_idx);
        let slot = self.slots[tail_idx].take()?;
        self.map.remove(&slot.key);
        self.free.push(tail_idx);
        Some((slot.key, slot.value))
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(None);
            idx
        }
    }
}

/// Iterator over cache entries in recency order (MRU first)
pub struct Iter<'a, K, V> {
    cache: &'a LruCache<K, V>,
    next: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let slot = self.cache.slots[idx].as_ref()?;
        self.next = slot.next;
        Some((&slot.key, &slot.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_mru_first(cache: &LruCache<i64, i64>) -> Vec<i64> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2);

        cache.put(1, 10);
        cache.put(2, 20);

        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.get(&2), Some(&20));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2);

        cache.put(1, 10);
        cache.put(2, 20);
        let evicted = cache.put(3, 30); // Evicts 1

        assert_eq!(evicted, Some((1, 10)));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&20));
        assert_eq!(cache.get(&3), Some(&30));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_promotes_to_mru() {
        let mut cache = LruCache::new(2);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.get(&1); // 1 becomes MRU
        let evicted = cache.put(3, 30); // Evicts 2, not 1

        assert_eq!(evicted, Some((2, 20)));
        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_put_resident_never_evicts() {
        let mut cache = LruCache::new(2);

        cache.put(1, 10);
        cache.put(2, 20);
        let evicted = cache.put(1, 11); // Update at capacity

        assert_eq!(evicted, None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(&11));
        assert_eq!(keys_mru_first(&cache), vec![1, 2]);
    }

    #[test]
    fn test_eviction_leaves_other_keys_untouched() {
        let mut cache = LruCache::new(3);

        cache.put(1, 10);
        cache.put(2, 20);
        cache.put(3, 30);
        let evicted = cache.put(4, 40); // 1 is LRU

        assert_eq!(evicted, Some((1, 10)));
        assert_eq!(keys_mru_first(&cache), vec![4, 3, 2]);
    }

    #[test]
    fn test_repeated_get_is_idempotent() {
        let mut cache = LruCache::new(3);

        cache.put(1, 10);
        cache.put(2, 20);

        for _ in 0..5 {
            assert_eq!(cache.get(&2), Some(&20));
            assert_eq!(cache.len(), 2);
            assert_eq!(keys_mru_first(&cache), vec![2, 1]);
        }
    }

    #[test]
    fn test_reverse_gets_reverse_recency_order() {
        let n = 5;
        let mut cache = LruCache::new(n as usize);

        for k in 0..n {
            cache.put(k, k * 10);
        }
        // MRU -> LRU is insertion order reversed: [4, 3, 2, 1, 0]
        assert_eq!(keys_mru_first(&cache), vec![4, 3, 2, 1, 0]);

        let mut hits = 0;
        for k in (0..n).rev() {
            if cache.get(&k).is_some() {
                hits += 1;
            }
        }

        assert_eq!(hits, n);
        assert_eq!(keys_mru_first(&cache), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = LruCache::new(1);

        cache.put(1, 10);
        assert_eq!(cache.put(2, 20), Some((1, 10)));
        assert_eq!(cache.len(), 1);
        assert_eq!(keys_mru_first(&cache), vec![2]);
    }

    #[test]
    fn test_slot_reuse_across_evictions() {
        let mut cache = LruCache::new(2);

        for k in 0..100 {
            cache.put(k, k);
        }

        // Arena never grows beyond capacity plus the free list churn
        assert_eq!(cache.len(), 2);
        assert!(cache.slots.len() <= 3);
        assert_eq!(keys_mru_first(&cache), vec![99, 98]);
    }
}
