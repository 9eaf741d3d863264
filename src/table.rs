use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::common::{Key, RunLimits};

/// One distinct key and its occurrence count.
#[derive(Debug, Clone)]
pub struct Entry {
    key: Key,
    count: usize,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// The result of merging one key occurrence into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Incremented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OverflowKind {
    #[error("distinct key capacity reached")]
    DistinctKeys,
    #[error("per-key occurrence capacity reached")]
    KeyOccurrences,
}

/// A table update rejected for capacity reasons, reported at the end of the
/// run so the totals are never silently wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overflow {
    pub kind: OverflowKind,
    pub key: Key,
    pub mapper: usize,
}

impl std::fmt::Display for Overflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mapper {} rejected \"{}\": {}",
            self.mapper, self.key, self.kind
        )
    }
}

/// Key → occurrence-count store shared by mappers, the shuffle stage and
/// reducers. Holds at most one entry per key.
pub struct IntermediateTable {
    entries: Vec<Entry>,
    limits: RunLimits,
}

impl IntermediateTable {
    pub fn new(limits: RunLimits) -> Self {
        Self {
            entries: Vec::new(),
            limits,
        }
    }

    /// Records one occurrence of `key`: increments the existing entry or
    /// inserts a fresh one with count 1. Capacity violations leave the table
    /// untouched.
    pub fn merge(&mut self, key: &str) -> Result<MergeOutcome, OverflowKind> {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
        {
            if entry.count >= self.limits.max_occurrences_per_key {
                return Err(OverflowKind::KeyOccurrences);
            }
            entry.count += 1;
            return Ok(MergeOutcome::Incremented);
        }

        if self.entries.len() >= self.limits.max_distinct_keys {
            return Err(OverflowKind::DistinctKeys);
        }
        self.entries.push(Entry {
            key: key.to_string(),
            count: 1,
        });
        Ok(MergeOutcome::Inserted)
    }

    /// Reorders entries into a deterministic total order. Keys are canonical
    /// lowercase, so byte order is the case-insensitive order.
    pub fn sort_by_key(&mut self) {
        self.entries.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// Total across every entry matching `key`, compared case-insensitively.
    /// Scans the whole table rather than assuming a single match, so a
    /// sharded layout with several entries per key would still sum correctly.
    pub fn total_for(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(Entry::count)
            .sum()
    }

    /// Keys in current entry order.
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Copy of the entries in current order, for reporting.
    pub fn snapshot(&self) -> Vec<(Key, usize)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.clone(), entry.count))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The single lock guarding the intermediate table. Every access path (mapper
/// merge, shuffle reorder, reducer read) goes through `lock`, so none of them
/// can interleave with another unsynchronized.
#[derive(Clone)]
pub struct SharedTable(Arc<Mutex<IntermediateTable>>);

impl SharedTable {
    pub fn new(limits: RunLimits) -> Self {
        Self(Arc::new(Mutex::new(IntermediateTable::new(limits))))
    }

    pub fn lock(&self) -> MutexGuard<'_, IntermediateTable> {
        self.0.lock().expect("intermediate table lock poisoned")
    }
}
