//! Significance records and the debounced change queues in front of them.
//!
//! Records live in a dense `Vec` so a scoring snapshot can be captured in
//! record order and its results zipped straight back. A `HashMap` lookup maps
//! ids to record indices and is kept consistent across swap-removals.
//!
//! Registration changes never touch the records directly. They are queued and
//! applied together by [`Registry::reconcile`], removals first.

use std::collections::HashMap;

use crate::entity::{EntityId, Transform};

use super::tracked::{EntityRef, SignificanceTag};

/// Bookkeeping for one registered entity.
#[derive(Clone, Debug)]
pub struct SignificanceRecord {
  pub id: EntityId,
  pub entity: EntityRef,
  pub tag: SignificanceTag,
  /// Last applied score, in [0, 1].
  pub significance: f32,
}

impl SignificanceRecord {
  pub fn new(id: EntityId, entity: EntityRef, tag: SignificanceTag) -> Self {
    Self {
      id,
      entity,
      tag,
      significance: 0.0,
    }
  }

  #[inline]
  pub fn is_expired(&self) -> bool {
    self.entity.strong_count() == 0
  }
}

#[derive(Clone, Debug)]
struct PendingAdd {
  id: EntityId,
  entity: EntityRef,
  tag: SignificanceTag,
}

/// Counts from one [`Registry::reconcile`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
  pub added: usize,
  pub removed: usize,
  /// Records dropped because their entity went away without deregistering.
  pub expired: usize,
  /// Adds skipped as duplicates or expired before they could be applied.
  pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct Registry {
  records: Vec<SignificanceRecord>,
  lookup: HashMap<EntityId, usize>,
  pending_adds: Vec<PendingAdd>,
  pending_removes: Vec<EntityId>,
  dirty: bool,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn records(&self) -> &[SignificanceRecord] {
    &self.records
  }

  pub fn records_mut(&mut self) -> &mut [SignificanceRecord] {
    &mut self.records
  }

  pub fn get(&self, id: EntityId) -> Option<&SignificanceRecord> {
    self.lookup.get(&id).map(|&index| &self.records[index])
  }

  pub fn contains(&self, id: EntityId) -> bool {
    self.lookup.contains_key(&id)
  }

  /// Cached score, or `0.0` for unknown ids.
  pub fn significance(&self, id: EntityId) -> f32 {
    self.get(id).map_or(0.0, |record| record.significance)
  }

  /// Whether queued changes are waiting for [`Registry::reconcile`].
  pub fn has_pending_changes(&self) -> bool {
    self.dirty
  }

  pub fn pending_adds(&self) -> usize {
    self.pending_adds.len()
  }

  pub fn pending_removes(&self) -> usize {
    self.pending_removes.len()
  }

  /// Queue an addition. A second add for the same id before reconciliation
  /// replaces the first.
  pub fn queue_add(&mut self, id: EntityId, entity: EntityRef, tag: SignificanceTag) {
    let add = PendingAdd { id, entity, tag };
    match self.pending_adds.iter_mut().find(|pending| pending.id == id) {
      Some(pending) => *pending = add,
      None => self.pending_adds.push(add),
    }
    self.dirty = true;
  }

  /// Queue a removal and cancel any unapplied add for the same id.
  pub fn queue_remove(&mut self, id: EntityId) {
    self.pending_adds.retain(|pending| pending.id != id);
    if !self.pending_removes.contains(&id) {
      self.pending_removes.push(id);
    }
    self.dirty = true;
  }

  /// Apply queued removals, then queued additions, then drop expired records.
  ///
  /// Clears both queues and the dirty flag.
  pub fn reconcile(&mut self) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    let removes = std::mem::take(&mut self.pending_removes);
    let adds = std::mem::take(&mut self.pending_adds);
    self.records.reserve(adds.len().saturating_sub(removes.len()));
    self.lookup.reserve(adds.len().saturating_sub(removes.len()));

    for id in removes {
      if let Some(index) = self.lookup.get(&id).copied() {
        self.swap_remove(index);
        stats.removed += 1;
      }
    }

    for PendingAdd { id, entity, tag } in adds {
      if self.lookup.contains_key(&id) || entity.strong_count() == 0 {
        stats.skipped += 1;
        continue;
      }
      self.lookup.insert(id, self.records.len());
      self.records.push(SignificanceRecord::new(id, entity, tag));
      stats.added += 1;
    }

    let mut index = 0;
    while index < self.records.len() {
      if self.records[index].is_expired() {
        self.swap_remove(index);
        stats.expired += 1;
      } else {
        index += 1;
      }
    }

    self.dirty = false;
    stats
  }

  /// Current transform of every record, in record order.
  pub fn transforms(&self) -> Vec<Option<Transform>> {
    self
      .records
      .iter()
      .map(|record| record.entity.upgrade().map(|entity| entity.transform()))
      .collect()
  }

  /// Remove the record at `index`, moving the last record into its slot.
  fn swap_remove(&mut self, index: usize) -> SignificanceRecord {
    let removed = self.records.swap_remove(index);
    self.lookup.remove(&removed.id);
    if let Some(moved) = self.records.get(index) {
      self.lookup.insert(moved.id, index);
    }
    removed
  }

  /// Check that every record is indexed at its own position.
  #[cfg(test)]
  pub(crate) fn assert_consistent(&self) {
    assert_eq!(self.records.len(), self.lookup.len());
    for (index, record) in self.records.iter().enumerate() {
      assert_eq!(self.lookup.get(&record.id), Some(&index), "lookup out of sync for {:?}", record.id);
    }
  }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
