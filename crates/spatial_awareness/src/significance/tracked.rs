//! What the scheduler needs from tracked entities.

use std::sync::{Arc, Weak};

use crate::entity::{EntityId, EntityKind, Transform};

/// Category an entity is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignificanceTag {
  Gameplay,
  Rendering,
  Audio,
  /// Particle effects. Only the first scoring pass notifies these.
  Effects,
}

impl SignificanceTag {
  pub const ALL: [Self; 4] = [Self::Gameplay, Self::Rendering, Self::Audio, Self::Effects];

  /// Whether steady-state transitions are delivered for this category.
  #[inline]
  pub fn notifies_transitions(&self) -> bool {
    !matches!(self, Self::Effects)
  }
}

/// Receives significance transitions for one entity.
///
/// Called on the main line from [`SignificanceManager::update`](super::SignificanceManager::update).
pub trait SignificanceListener {
  /// The entity crossed zero, in either direction.
  fn on_significance_changed(&self, significant: bool);

  /// Both the old and new score are above zero. Only sent to entities whose
  /// [`Trackable::tracks_value`] is set.
  fn on_significance_value_changed(&self, _old: f32, _new: f32) {}
}

/// An entity the scheduler can score.
///
/// The scheduler holds entities through [`EntityRef`] and never extends their
/// lifetime.
pub trait Trackable: Send + Sync {
  fn entity_id(&self) -> EntityId;

  fn kind(&self) -> EntityKind {
    EntityKind::Actor
  }

  /// Current placement. Read on the main line when a scoring pass starts.
  fn transform(&self) -> Transform;

  /// Opt in to continuous value updates while significant.
  fn tracks_value(&self) -> bool {
    false
  }

  fn listener(&self) -> Option<&dyn SignificanceListener> {
    None
  }
}

/// Non-owning handle to a tracked entity.
pub type EntityRef = Weak<dyn Trackable>;

/// Downgrade a shared entity into an [`EntityRef`].
pub fn entity_ref<E: Trackable + 'static>(entity: &Arc<E>) -> EntityRef {
  let entity: Arc<dyn Trackable> = entity.clone();
  Arc::downgrade(&entity)
}
