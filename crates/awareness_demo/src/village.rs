//! A headless village: wandering villagers, static campfires and a camera
//! circling overhead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial_awareness::{
  entity_ref, Dispatch, EntityId, Octree, OctreeConfig, SignificanceError, SignificanceListener,
  SignificanceManager, SignificanceTag, Trackable, Transform,
};

/// Half size of the simulated area.
pub const HALF_EXTENT: f32 = 30000.0;

/// What the spatial index buckets residents by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
  Villager,
  Campfire,
}

impl Category {
  fn tag(&self) -> SignificanceTag {
    match self {
      Self::Villager => SignificanceTag::Gameplay,
      Self::Campfire => SignificanceTag::Effects,
    }
  }
}

// =============================================================================
// Transition counters
// =============================================================================

/// Notifications received across all residents.
#[derive(Debug, Default)]
pub struct Transitions {
  pub became_significant: AtomicU64,
  pub became_insignificant: AtomicU64,
  pub value_updates: AtomicU64,
}

impl Transitions {
  pub fn snapshot(&self) -> (u64, u64, u64) {
    (
      self.became_significant.load(Ordering::Relaxed),
      self.became_insignificant.load(Ordering::Relaxed),
      self.value_updates.load(Ordering::Relaxed),
    )
  }
}

// =============================================================================
// Resident - a tracked entity
// =============================================================================

pub struct Resident {
  id: EntityId,
  category: Category,
  transform: Mutex<Transform>,
  significant: AtomicBool,
  transitions: Arc<Transitions>,
}

impl Resident {
  fn new(category: Category, position: Vec3, transitions: Arc<Transitions>) -> Self {
    Self {
      id: EntityId::new(),
      category,
      transform: Mutex::new(Transform::from_position(position)),
      significant: AtomicBool::new(false),
      transitions,
    }
  }

  pub fn position(&self) -> Vec3 {
    self.transform().position
  }

  pub fn is_significant(&self) -> bool {
    self.significant.load(Ordering::Relaxed)
  }

  fn set_position(&self, position: Vec3) {
    self.transform.lock().unwrap_or_else(PoisonError::into_inner).position = position;
  }
}

impl Trackable for Resident {
  fn entity_id(&self) -> EntityId {
    self.id
  }

  fn transform(&self) -> Transform {
    *self.transform.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn tracks_value(&self) -> bool {
    self.category == Category::Villager
  }

  fn listener(&self) -> Option<&dyn SignificanceListener> {
    Some(self)
  }
}

impl SignificanceListener for Resident {
  fn on_significance_changed(&self, significant: bool) {
    self.significant.store(significant, Ordering::Relaxed);
    let counter = if significant {
      &self.transitions.became_significant
    } else {
      &self.transitions.became_insignificant
    };
    counter.fetch_add(1, Ordering::Relaxed);
  }

  fn on_significance_value_changed(&self, _old: f32, _new: f32) {
    self.transitions.value_updates.fetch_add(1, Ordering::Relaxed);
  }
}

// =============================================================================
// Camera - the viewpoint
// =============================================================================

pub struct Camera {
  id: EntityId,
  transform: Mutex<Transform>,
}

impl Camera {
  pub fn new() -> Self {
    Self {
      id: EntityId::new(),
      transform: Mutex::new(Transform::IDENTITY),
    }
  }

  /// Circle the origin at `radius`, facing along the direction of travel.
  pub fn orbit(&self, time: f32, radius: f32) {
    let angle = time * 0.2;
    let position = Vec3::new(angle.cos(), angle.sin(), 0.0) * radius;
    let forward = Vec3::new(-angle.sin(), angle.cos(), 0.0);
    *self.transform.lock().unwrap_or_else(PoisonError::into_inner) = Transform::new(position, forward);
  }
}

impl Default for Camera {
  fn default() -> Self {
    Self::new()
  }
}

impl Trackable for Camera {
  fn entity_id(&self) -> EntityId {
    self.id
  }

  fn transform(&self) -> Transform {
    *self.transform.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// =============================================================================
// Village
// =============================================================================

struct Walker {
  resident: Arc<Resident>,
  velocity: Vec3,
}

pub struct Village {
  index: Octree<EntityId, Category>,
  walkers: Vec<Walker>,
  campfires: Vec<Arc<Resident>>,
  transitions: Arc<Transitions>,
}

impl Village {
  /// Scatter `villagers` walkers and `campfires` static fires with a fixed seed.
  pub fn populate(villagers: usize, campfires: usize, seed: u64) -> Self {
    let mut rng = StdRng::seed_from_u64(seed);
    let transitions = Arc::new(Transitions::default());
    let mut index = Octree::with_config(Vec3::ZERO, Vec3::splat(HALF_EXTENT), OctreeConfig::RESET);

    let scatter = |rng: &mut StdRng| {
      Vec3::new(
        rng.random_range(-HALF_EXTENT..HALF_EXTENT),
        rng.random_range(-HALF_EXTENT..HALF_EXTENT),
        rng.random_range(0.0..200.0),
      )
    };

    let walkers = (0..villagers)
      .map(|_| {
        let resident = Arc::new(Resident::new(Category::Villager, scatter(&mut rng), transitions.clone()));
        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        Walker {
          resident,
          velocity: Vec3::new(heading.cos(), heading.sin(), 0.0) * rng.random_range(50.0f32..400.0),
        }
      })
      .collect::<Vec<_>>();

    let campfires = (0..campfires)
      .map(|_| Arc::new(Resident::new(Category::Campfire, scatter(&mut rng), transitions.clone())))
      .collect::<Vec<_>>();

    for resident in walkers.iter().map(|w| &w.resident).chain(&campfires) {
      index.insert(resident.id, resident.position(), resident.category);
    }

    tracing::info!(
      villagers = walkers.len(),
      campfires = campfires.len(),
      stats = ?index.stats(),
      "village populated"
    );

    Self {
      index,
      walkers,
      campfires,
      transitions,
    }
  }

  pub fn transitions(&self) -> &Transitions {
    &self.transitions
  }

  pub fn index(&self) -> &Octree<EntityId, Category> {
    &self.index
  }

  pub fn residents(&self) -> impl Iterator<Item = &Arc<Resident>> {
    self.walkers.iter().map(|w| &w.resident).chain(&self.campfires)
  }

  /// Register every resident with the significance manager.
  pub fn register_all<D: Dispatch>(&self, manager: &mut SignificanceManager<D>) -> Result<(), SignificanceError> {
    for resident in self.residents() {
      manager.register(entity_ref(resident), resident.category.tag())?;
    }
    Ok(())
  }

  /// Advance every villager by `dt` seconds, bouncing off the area edges.
  pub fn step(&mut self, dt: f32) {
    let limit = HALF_EXTENT * 0.999;
    for walker in &mut self.walkers {
      let old = walker.resident.position();
      let mut new = old + walker.velocity * dt;

      for axis in 0..2 {
        if new[axis].abs() > limit {
          walker.velocity[axis] = -walker.velocity[axis];
          new[axis] = new[axis].clamp(-limit, limit);
        }
      }

      if !self.index.relocate(&walker.resident.id, old, new, &Category::Villager) {
        tracing::warn!(id = ?walker.resident.id, ?old, ?new, "villager lost from the index");
      }
      walker.resident.set_position(new);
    }
  }

  /// Villagers within `radius` of `center` on the ground plane.
  pub fn villagers_near(&self, center: Vec2, radius: f32) -> usize {
    self.index.query(center, radius, Some(&Category::Villager)).len()
  }

  /// Send `count` villagers away: deregistered and removed from the index.
  pub fn evict<D: Dispatch>(&mut self, count: usize, manager: &mut SignificanceManager<D>) {
    let count = count.min(self.walkers.len());
    for walker in self.walkers.drain(..count) {
      let resident = &walker.resident;
      manager.deregister(resident.id);
      self.index.remove(&resident.id, resident.position(), &Category::Villager);
    }
    tracing::info!(count, remaining = self.walkers.len(), "villagers evicted");
  }

  /// Let `count` campfires burn out without telling anyone.
  pub fn abandon_campfires(&mut self, count: usize) {
    let count = count.min(self.campfires.len());
    for campfire in self.campfires.drain(..count) {
      self.index.remove(&campfire.id, campfire.position(), &Category::Campfire);
    }
    tracing::info!(count, remaining = self.campfires.len(), "campfires abandoned");
  }
}
