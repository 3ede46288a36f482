//! Key History Module
//!
//! Per-key access bookkeeping used to pick eviction victims.

use std::collections::HashMap;
use std::hash::Hash;

// == Key Record ==
/// Access bookkeeping for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    /// Sequence number of the most recent access
    pub last_access: u64,
    /// Number of recorded accesses
    pub access_count: u64,
}

// == Key History ==
/// Tracks recency and frequency of key lookups.
///
/// Every `update` advances a tracker-wide sequence counter, so no two
/// records ever share a `last_access` value. Both victim queries are
/// therefore deterministic regardless of hash iteration order.
#[derive(Debug)]
pub struct KeyHistory<K> {
    /// Records of keys that have been looked up
    records: HashMap<K, KeyRecord>,
    /// Last issued sequence number
    clock: u64,
}

impl<K> Default for KeyHistory<K> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            clock: 0,
        }
    }
}

impl<K> KeyHistory<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    // == Update ==
    /// Records one access to `key`.
    ///
    /// Creates the record on first access.
    pub fn update(&mut self, key: &K) {
        self.clock += 1;
        let now = self.clock;

        match self.records.get_mut(key) {
            Some(record) => {
                record.last_access = now;
                record.access_count += 1;
            }
            None => {
                self.records.insert(
                    key.clone(),
                    KeyRecord {
                        last_access: now,
                        access_count: 1,
                    },
                );
            }
        }
    }

    // == Find LRU Key ==
    /// Returns the key with the oldest access, or None if nothing is tracked.
    pub fn find_lru_key(&self) -> Option<K> {
        self.records
            .iter()
            .min_by_key(|(_, record)| record.last_access)
            .map(|(key, _)| key.clone())
    }

    // == Find LFU Key ==
    /// Returns the key with the fewest accesses, or None if nothing is tracked.
    ///
    /// Ties go to the key whose last access is oldest.
    pub fn find_lfu_key(&self) -> Option<K> {
        self.records
            .iter()
            .min_by_key(|(_, record)| (record.access_count, record.last_access))
            .map(|(key, _)| key.clone())
    }

    // == Purge ==
    /// Drops all bookkeeping for `key`. No-op for untracked keys.
    pub fn purge(&mut self, key: &K) {
        self.records.remove(key);
    }

    // == Retain ==
    /// Keeps only the records whose key satisfies `keep`.
    ///
    /// Returns the number of records dropped.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|key, _| keep(key));
        before - self.records.len()
    }

    // == Clear ==
    /// Forgets every record. The sequence counter keeps running.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    // == Record ==
    pub fn record(&self, key: &K) -> Option<&KeyRecord> {
        self.records.get(key)
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
