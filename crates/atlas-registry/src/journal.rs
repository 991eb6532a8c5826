//! # Write Journal
//!
//! Keyed stores that remember the prior value of every key written while a
//! transaction is open. A failed operation is undone by replaying the
//! journal backwards, in time proportional to the keys it touched rather
//! than to the size of the registry.
//!
//! Small fixed-size state (guards, proxy metadata, the module table length)
//! is captured whole when a transaction opens; only the unbounded maps are
//! journaled per key.

use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Module state that can open, undo and close a transaction.
pub trait Transactional {
    /// State captured when the transaction opens.
    type Snapshot;

    /// Open a transaction.
    fn begin(&mut self) -> Self::Snapshot;

    /// Undo every write made since `begin`.
    fn rollback(&mut self, snapshot: Self::Snapshot);

    /// Keep every write made since `begin`.
    fn commit(&mut self);
}

/// Ordered map whose writes can be undone while a transaction is open.
///
/// Outside a transaction writes are applied directly and nothing is
/// recorded.
#[derive(Debug, Clone)]
pub struct JournaledMap<K, V> {
    entries: BTreeMap<K, V>,
    undo: Vec<(K, Option<V>)>,
    recording: bool,
}

impl<K, V> Default for JournaledMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            undo: Vec::new(),
            recording: false,
        }
    }
}

impl<K: Ord + Clone, V: Clone> JournaledMap<K, V> {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)
    }

    /// Whether `key` holds a value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Writes recorded since the open transaction began.
    pub fn pending_writes(&self) -> usize {
        self.undo.len()
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prior = self.entries.insert(key.clone(), value);
        if self.recording {
            self.undo.push((key, prior.clone()));
        }
        prior
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let prior = self.entries.remove(key);
        if self.recording && prior.is_some() {
            self.undo.push((key.clone(), prior.clone()));
        }
        prior
    }
}

impl<K: Ord + Clone, V: Clone> Transactional for JournaledMap<K, V> {
    type Snapshot = ();

    fn begin(&mut self) {
        self.undo.clear();
        self.recording = true;
    }

    fn rollback(&mut self, _snapshot: ()) {
        while let Some((key, prior)) = self.undo.pop() {
            match prior {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
        self.recording = false;
    }

    fn commit(&mut self) {
        self.undo.clear();
        self.recording = false;
    }
}
