//! O(1) least-frequently-used tracking.

use std::collections::HashMap;
use std::hash::Hash;

/// Arena slot: a node in one of the per-frequency lists.
#[derive(Debug)]
struct Node<K> {
    key: Option<K>,
    freq: u64,
    prev: usize,
    next: usize,
}

/// Sentinel pair delimiting one frequency's list.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    head: usize,
    tail: usize,
}

/// Frequency tracker over codebook entries.
///
/// Every tracked key sits in the doubly-linked list of its current use
/// count; `min_freq` caches the lowest non-empty frequency. Buckets are
/// created on demand and kept for the tracker's lifetime, so an emptied
/// bucket simply reads as empty.
///
/// `min_freq` is not repaired when `remove` empties its bucket: `find_lfu`
/// tolerates an empty minimum bucket by returning `None`, and the next
/// new-key `use_key` resets `min_freq` to 1. In the codec every eviction is
/// immediately followed by a fresh insertion, so the counter recovers; both
/// sides of the codec must follow that same sequence to stay in step.
#[derive(Debug)]
pub struct LfuTracker<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
    map: HashMap<K, usize>,
    buckets: HashMap<u64, Bucket>,
    min_freq: u64,
}

impl<K: Eq + Hash + Clone> LfuTracker<K> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        LfuTracker {
            nodes: Vec::new(),
            free: Vec::new(),
            map: HashMap::new(),
            buckets: HashMap::new(),
            min_freq: 0,
        }
    }

    /// Record a use of `key`. A new key starts at frequency 1 and resets
    /// `min_freq`; an existing key moves up one frequency bucket.
    pub fn use_key(&mut self, key: &K) {
        if let Some(&idx) = self.map.get(key) {
            let old_freq = self.nodes[idx].freq;
            self.unlink(idx);
            if old_freq == self.min_freq && self.bucket_is_empty(old_freq) {
                self.min_freq = old_freq + 1;
            }
            let new_freq = old_freq + 1;
            self.nodes[idx].freq = new_freq;
            let bucket = self.bucket(new_freq);
            self.push_front(bucket, idx);
        } else {
            let idx = self.alloc(key.clone());
            self.map.insert(key.clone(), idx);
            let bucket = self.bucket(1);
            self.push_front(bucket, idx);
            self.min_freq = 1;
        }
    }

    /// The first key in the minimum-frequency bucket, or `None` when that
    /// bucket is missing or empty.
    pub fn find_lfu(&self) -> Option<&K> {
        let bucket = self.buckets.get(&self.min_freq)?;
        let first = self.nodes[bucket.head].next;
        if first == bucket.tail {
            return None;
        }
        self.nodes[first].key.as_ref()
    }

    /// Stop tracking `key`. `min_freq` is deliberately left alone.
    pub fn remove(&mut self, key: &K) {
        if let Some(idx) = self.map.remove(key) {
            self.unlink(idx);
            self.nodes[idx].key = None;
            self.free.push(idx);
        }
    }

    /// Whether `key` is tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// The current frequency of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|&idx| self.nodes[idx].freq)
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The sentinel pair for `freq`, created on first use.
    fn bucket(&mut self, freq: u64) -> Bucket {
        if let Some(&bucket) = self.buckets.get(&freq) {
            return bucket;
        }
        let head = self.alloc_sentinel();
        let tail = self.alloc_sentinel();
        self.nodes[head].next = tail;
        self.nodes[tail].prev = head;
        let bucket = Bucket { head, tail };
        self.buckets.insert(freq, bucket);
        bucket
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        match self.buckets.get(&freq) {
            Some(bucket) => self.nodes[bucket.head].next == bucket.tail,
            None => true,
        }
    }

    fn alloc(&mut self, key: K) -> usize {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx].key = Some(key);
            self.nodes[idx].freq = 1;
            idx
        } else {
            self.nodes.push(Node {
                key: Some(key),
                freq: 1,
                prev: 0,
                next: 0,
            });
            self.nodes.len() - 1
        }
    }

    fn alloc_sentinel(&mut self) -> usize {
        self.nodes.push(Node {
            key: None,
            freq: 0,
            prev: 0,
            next: 0,
        });
        self.nodes.len() - 1
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn push_front(&mut self, bucket: Bucket, idx: usize) {
        let first = self.nodes[bucket.head].next;
        self.nodes[idx].prev = bucket.head;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[bucket.head].next = idx;
    }
}

impl<K: Eq + Hash + Clone> Default for LfuTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
