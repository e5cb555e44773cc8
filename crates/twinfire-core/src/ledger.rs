//! Idempotency ledger for lingering hazards.
//!
//! A missile blast stays live for several ticks. Each `(hazard, target)` pair
//! it resolves is recorded here so later ticks of the same blast skip that
//! target. Entries for a hazard are retired when the hazard leaves the arena,
//! and the whole ledger is cleared when a new boss context begins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Set of `(hazard, target)` pairs already resolved.
///
/// # Example
///
/// ```
/// use twinfire_core::entity::EntityId;
/// use twinfire_core::ledger::BlastLedger;
///
/// let mut ledger = BlastLedger::new();
/// let (missile, alien) = (EntityId::new(1), EntityId::new(2));
///
/// assert!(ledger.mark(missile, alien));
/// assert!(!ledger.mark(missile, alien));
///
/// ledger.retire_hazard(missile);
/// assert!(ledger.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlastLedger {
    handled: BTreeSet<(EntityId, EntityId)>,
}

impl BlastLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pair.
    ///
    /// # Returns
    ///
    /// `true` if the pair was new and should be resolved now, `false` if it
    /// was already handled.
    pub fn mark(&mut self, hazard: EntityId, target: EntityId) -> bool {
        self.handled.insert((hazard, target))
    }

    /// Returns `true` if the pair has been resolved.
    #[must_use]
    pub fn contains(&self, hazard: EntityId, target: EntityId) -> bool {
        self.handled.contains(&(hazard, target))
    }

    /// Drops every entry created by `hazard`.
    pub fn retire_hazard(&mut self, hazard: EntityId) {
        self.handled.retain(|(h, _)| *h != hazard);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.handled.clear();
    }

    /// Number of recorded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handled.len()
    }

    /// Returns `true` if no pairs are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    /// Recorded pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        self.handled.iter().copied()
    }
}
