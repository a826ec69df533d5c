//! Scriptable tracked entity shared by the significance tests.

use std::sync::{Arc, Mutex};

use glam::Vec3;

use super::notification::Notification;
use super::tracked::{entity_ref, EntityRef, SignificanceListener, Trackable};
use crate::entity::{EntityId, EntityKind, Transform};

pub(crate) struct Probe {
  id: EntityId,
  kind: EntityKind,
  tracks_value: bool,
  transform: Mutex<Transform>,
  events: Mutex<Vec<Notification>>,
}

impl Probe {
  pub fn at(position: Vec3) -> Arc<Self> {
    Self::build(position, EntityKind::Actor, false)
  }

  /// A probe that asks for continuous value updates.
  pub fn tracking(position: Vec3) -> Arc<Self> {
    Self::build(position, EntityKind::Actor, true)
  }

  pub fn with_kind(kind: EntityKind) -> Arc<Self> {
    Self::build(Vec3::ZERO, kind, false)
  }

  fn build(position: Vec3, kind: EntityKind, tracks_value: bool) -> Arc<Self> {
    Arc::new(Self {
      id: EntityId::new(),
      kind,
      tracks_value,
      transform: Mutex::new(Transform::from_position(position)),
      events: Mutex::new(Vec::new()),
    })
  }

  pub fn id(&self) -> EntityId {
    self.id
  }

  pub fn move_to(&self, position: Vec3) {
    self.transform.lock().unwrap().position = position;
  }

  pub fn face(&self, forward: Vec3) {
    self.transform.lock().unwrap().forward = forward.normalize_or_zero();
  }

  /// Drain the notifications received so far.
  pub fn take_events(&self) -> Vec<Notification> {
    std::mem::take(&mut *self.events.lock().unwrap())
  }
}

impl Trackable for Probe {
  fn entity_id(&self) -> EntityId {
    self.id
  }

  fn kind(&self) -> EntityKind {
    self.kind
  }

  fn transform(&self) -> Transform {
    *self.transform.lock().unwrap()
  }

  fn tracks_value(&self) -> bool {
    self.tracks_value
  }

  fn listener(&self) -> Option<&dyn SignificanceListener> {
    Some(self)
  }
}

impl SignificanceListener for Probe {
  fn on_significance_changed(&self, significant: bool) {
    let event = if significant {
      Notification::BecameSignificant
    } else {
      Notification::BecameInsignificant
    };
    self.events.lock().unwrap().push(event);
  }

  fn on_significance_value_changed(&self, old: f32, new: f32) {
    self.events.lock().unwrap().push(Notification::ValueChanged { old, new });
  }
}

pub(crate) fn probe_ref(probe: &Arc<Probe>) -> EntityRef {
  entity_ref(probe)
}
