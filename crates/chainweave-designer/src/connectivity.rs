//! Chain-link connectivity analysis.
//!
//! Rings on adjacent lattice cells are linked into one chain. This module
//! derives the linked components of a ring collection with a disjoint-set
//! forest over hex adjacency. It is a read-only view: stored cluster ids are
//! bookkeeping and are not rewritten from it.

use std::collections::{BTreeMap, HashMap};

use crate::lattice::CellKey;
use crate::ring_store::RingStore;

/// Disjoint-set forest with path halving and union by size.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. Returns false when already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

/// Linked components of a ring collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// Each component's keys in row-major order. Components are ordered by
    /// their smallest key.
    pub groups: Vec<Vec<CellKey>>,
}

impl Components {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index into `groups` of the component containing `key`.
    pub fn component_of(&self, key: CellKey) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.binary_search(&key).is_ok())
    }

    pub fn largest(&self) -> Option<&[CellKey]> {
        self.groups.iter().max_by_key(|g| g.len()).map(|g| g.as_slice())
    }
}

/// Groups the occupied cells of `store` into chain-linked components.
pub fn linked_components(store: &RingStore) -> Components {
    let keys = store.sorted_keys();
    let index: HashMap<CellKey, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let mut sets = DisjointSet::new(keys.len());

    for (i, key) in keys.iter().enumerate() {
        for neighbor in key.adjacent() {
            if let Some(&j) = index.get(&neighbor) {
                sets.union(i, j);
            }
        }
    }

    // Keys are sorted, so each group fills in row-major order and groups are
    // keyed by the first member seen.
    let mut by_root: BTreeMap<usize, Vec<CellKey>> = BTreeMap::new();
    let mut first_seen: HashMap<usize, usize> = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        let root = sets.find(i);
        let slot = *first_seen.entry(root).or_insert(i);
        by_root.entry(slot).or_default().push(*key);
    }

    Components {
        groups: by_root.into_values().collect(),
    }
}
