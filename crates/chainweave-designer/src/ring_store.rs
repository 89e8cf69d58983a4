//! Sparse ring collection and the placement state machine.
//!
//! Each cell is either empty or holds one ring:
//!
//! ```text
//! Empty --place--> Occupied(color, cluster) --place other color--> Occupied(new color, same cluster)
//!   ^                                                                     |
//!   +--------------------------------erase--------------------------------+
//! ```
//!
//! New rings consume the next value of a monotonically increasing cluster
//! counter. Ids are never reused, even after the ring that carried one is
//! erased.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use chainweave_core::{ProjectError, RingEvent};

use crate::color::HexColor;
use crate::lattice::{CellKey, LatticeSpan};

/// A placed ring. Position is derived from its key and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    pub color: HexColor,
    pub cluster: u64,
}

/// What a single placement did to its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The cell was empty; a new ring with a fresh cluster id was created.
    Created { cluster: u64 },
    /// The cell held a ring of another color; its cluster id was kept.
    Recolored { cluster: u64, previous: HexColor },
    /// The cell already held a ring of this color.
    Unchanged,
}

/// Counts of what a bulk operation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub created: usize,
    pub recolored: usize,
    pub erased: usize,
    pub unchanged: usize,
}

impl BulkSummary {
    pub fn record(&mut self, outcome: PlacementOutcome) {
        match outcome {
            PlacementOutcome::Created { .. } => self.created += 1,
            PlacementOutcome::Recolored { .. } => self.recolored += 1,
            PlacementOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// True when the collection was modified.
    pub fn changed(&self) -> bool {
        self.created + self.recolored + self.erased > 0
    }

    /// Change notification for a collection that now holds `total` rings.
    pub fn to_event(&self, total: usize) -> RingEvent {
        RingEvent::Changed {
            created: self.created,
            recolored: self.recolored,
            erased: self.erased,
            total,
        }
    }
}

/// Sparse, unbounded map from lattice cell to ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingStore {
    rings: HashMap<CellKey, Ring>,
    next_cluster: u64,
}

fn exhausted(field: &str, context: &str, value: u64) -> ProjectError {
    ProjectError::InvalidField {
        field: field.to_string(),
        context: context.to_string(),
        reason: format!("{} leaves no cluster id to assign", value),
    }
}

impl RingStore {
    pub fn new() -> Self {
        Self {
            rings: HashMap::new(),
            next_cluster: 1,
        }
    }

    /// Rebuilds a store from persisted rings. The counter is raised past every
    /// stored cluster id so restored ids are never handed out again.
    ///
    /// `u64::MAX` is reserved: a ring carrying it, or a counter already at it,
    /// leaves no id to hand out next.
    pub fn from_rings<I>(rings: I, next_cluster: u64) -> Result<Self, ProjectError>
    where
        I: IntoIterator<Item = (CellKey, Ring)>,
    {
        if next_cluster == u64::MAX {
            return Err(exhausted("nextCluster", "project", next_cluster));
        }
        let mut floor = 1;
        let mut map = HashMap::new();
        for (key, ring) in rings {
            let after = ring
                .cluster
                .checked_add(1)
                .ok_or_else(|| exhausted("cluster", &format!("ring {}", key), ring.cluster))?;
            floor = floor.max(after);
            map.insert(key, ring);
        }
        Ok(Self {
            rings: map,
            next_cluster: next_cluster.max(floor),
        })
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn get(&self, key: CellKey) -> Option<&Ring> {
        self.rings.get(&key)
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.rings.contains_key(&key)
    }

    /// Cluster id the next created ring will receive.
    pub fn next_cluster(&self) -> u64 {
        self.next_cluster
    }

    /// Unordered iteration. Use [`RingStore::snapshot`] when order matters.
    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Ring)> {
        self.rings.iter()
    }

    /// All keys in row-major order.
    pub fn sorted_keys(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.rings.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Copy of the collection in row-major order.
    pub fn snapshot(&self) -> Vec<(CellKey, Ring)> {
        let mut rings: Vec<(CellKey, Ring)> = self.rings.iter().map(|(k, r)| (*k, *r)).collect();
        rings.sort_unstable_by_key(|(k, _)| *k);
        rings
    }

    /// Extent of the occupied cells, `None` when empty.
    pub fn span(&self) -> Option<LatticeSpan> {
        LatticeSpan::from_keys(self.rings.keys().copied())
    }

    /// Creates or recolors the ring at `key`.
    pub fn place(&mut self, key: CellKey, color: HexColor) -> PlacementOutcome {
        match self.rings.get_mut(&key) {
            Some(ring) if ring.color == color => PlacementOutcome::Unchanged,
            Some(ring) => {
                let previous = ring.color;
                ring.color = color;
                PlacementOutcome::Recolored {
                    cluster: ring.cluster,
                    previous,
                }
            }
            None => {
                let cluster = self.next_cluster;
                // Loaded stores start below u64::MAX, so the cap is never hit in practice.
                self.next_cluster = self.next_cluster.saturating_add(1);
                self.rings.insert(key, Ring { color, cluster });
                PlacementOutcome::Created { cluster }
            }
        }
    }

    /// Changes the color of an existing ring only. Returns `None` for an empty cell.
    pub fn recolor(&mut self, key: CellKey, color: HexColor) -> Option<PlacementOutcome> {
        if self.rings.contains_key(&key) {
            Some(self.place(key, color))
        } else {
            None
        }
    }

    pub fn erase(&mut self, key: CellKey) -> Option<Ring> {
        self.rings.remove(&key)
    }

    /// Places `color` on every key, in row-major order.
    pub fn place_many(&mut self, keys: &BTreeSet<CellKey>, color: HexColor) -> BulkSummary {
        let mut summary = BulkSummary::default();
        for key in keys {
            summary.record(self.place(*key, color));
        }
        debug!(
            "Bulk place {}: +{} ~{} ={}",
            color, summary.created, summary.recolored, summary.unchanged
        );
        summary
    }

    /// Erases every key, in row-major order. Empty cells count as unchanged.
    pub fn erase_many(&mut self, keys: &BTreeSet<CellKey>) -> BulkSummary {
        let mut summary = BulkSummary::default();
        for key in keys {
            if self.erase(*key).is_some() {
                summary.erased += 1;
            } else {
                summary.unchanged += 1;
            }
        }
        debug!("Bulk erase: -{} ={}", summary.erased, summary.unchanged);
        summary
    }

    /// Writes back precomputed colors for existing rings. Keys without a ring
    /// are ignored; updates are applied in row-major order.
    pub fn recolor_many<I>(&mut self, updates: I) -> BulkSummary
    where
        I: IntoIterator<Item = (CellKey, HexColor)>,
    {
        let mut updates: Vec<(CellKey, HexColor)> = updates.into_iter().collect();
        updates.sort_by_key(|(k, _)| *k);
        let mut summary = BulkSummary::default();
        for (key, color) in updates {
            if let Some(outcome) = self.recolor(key, color) {
                summary.record(outcome);
            }
        }
        summary
    }

    /// Removes every ring. The cluster counter keeps counting.
    pub fn clear(&mut self) -> usize {
        let removed = self.rings.len();
        self.rings.clear();
        removed
    }
}

impl Default for RingStore {
    fn default() -> Self {
        Self::new()
    }
}
