//! Significance Manager
//!
//! Owns the registry, the scoring timer and at most one in-flight scoring
//! pass. Everything except the pass itself runs on the main line through
//! [`SignificanceManager::update`].
//!
//! # Flow
//!
//! ```text
//! Main Thread                          Worker (Dispatch)
//! ┌──────────────────────┐
//! │ poll_results()       │◄─────────────────────┐
//! │ - cache scores       │                      │
//! │ - notify listeners   │                      │
//! ├──────────────────────┤                      │
//! │ reconcile()          │                      │
//! │ (if dirty, idle)     │                      │
//! ├──────────────────────┤                      │
//! │ timer fired?         │                      │
//! │ - capture snapshot   │   spawn    ┌─────────┴────────┐
//! │ - start pass         │──────────► │ snapshot.score() │
//! └──────────────────────┘            └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = SignificanceManager::new();
//! manager.initialize(entity_ref(&camera))?;
//! manager.register(entity_ref(&villager), SignificanceTag::Gameplay)?;
//!
//! // Each frame
//! manager.update(frame_delta);
//! let significance = manager.get_significance(villager.entity_id());
//! ```

use std::time::Duration;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};

use super::config::SignificanceConfig;
use super::notification::Notification;
use super::registry::Registry;
use super::scoring::{ScoringResult, ScoringSnapshot, Viewpoint};
use super::tracked::{EntityRef, SignificanceTag};
use crate::entity::EntityId;
use crate::error::SignificanceError;
use crate::threading::{Dispatch, RayonDispatch};
use crate::timer::RepeatingTimer;

/// Running counters for a manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignificanceStats {
	/// Scoring passes dispatched.
	pub cycles_started: u64,
	/// Scoring passes whose results were applied.
	pub cycles_completed: u64,
	/// Timer firings dropped (pass in flight or viewpoint gone).
	pub ticks_skipped: u64,
	/// Registry reconciliations performed.
	pub reconciliations: u64,
	/// Significant entities in the last applied pass.
	pub last_significant: usize,
	/// Duration of the last applied pass in microseconds.
	pub last_score_us: u64,
}

/// Periodic, off-thread significance scoring for registered entities.
///
/// Only one pass is ever in flight; timer firings during a pass are dropped,
/// never queued. Registration changes are queued and applied between passes.
pub struct SignificanceManager<D: Dispatch = RayonDispatch> {
	config: SignificanceConfig,
	dispatch: D,
	viewpoint: Option<EntityRef>,
	timer: RepeatingTimer,
	registry: Registry,
	/// Receiver for the in-flight pass.
	receiver: Option<Receiver<ScoringResult>>,
	first_pass_complete: bool,
	stats: SignificanceStats,
}

impl SignificanceManager {
	/// Create a manager that scores on rayon's global pool.
	pub fn new() -> Self {
		Self::with_config(SignificanceConfig::DEFAULT)
	}

	pub fn with_config(config: SignificanceConfig) -> Self {
		Self::with_dispatch(config, RayonDispatch)
	}
}

impl Default for SignificanceManager {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: Dispatch> SignificanceManager<D> {
	pub fn with_dispatch(config: SignificanceConfig, dispatch: D) -> Self {
		Self {
			config,
			dispatch,
			viewpoint: None,
			timer: RepeatingTimer::new(config.interval),
			registry: Registry::new(),
			receiver: None,
			first_pass_complete: false,
			stats: SignificanceStats::default(),
		}
	}

	pub fn config(&self) -> &SignificanceConfig {
		&self.config
	}

	pub fn stats(&self) -> SignificanceStats {
		self.stats
	}

	/// Number of registered entities (queued changes excluded).
	pub fn len(&self) -> usize {
		self.registry.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registry.is_empty()
	}

	pub fn is_initialized(&self) -> bool {
		self.viewpoint.is_some()
	}

	/// Check if a scoring pass is running.
	pub fn is_in_flight(&self) -> bool {
		self.receiver.is_some()
	}

	/// Whether registration changes are waiting to be applied.
	pub fn has_pending_changes(&self) -> bool {
		self.registry.has_pending_changes()
	}

	/// Bind the viewpoint and restart the scoring timer.
	///
	/// The timer starts primed, so the first `update` afterwards scores
	/// straight away. Calling again rebinds the viewpoint. Registered
	/// entities, cached scores and any in-flight pass are kept.
	pub fn initialize(&mut self, viewpoint: EntityRef) -> Result<(), SignificanceError> {
		if viewpoint.strong_count() == 0 {
			tracing::warn!("significance manager initialized with an expired viewpoint");
			return Err(SignificanceError::ViewpointUnavailable);
		}

		self.viewpoint = Some(viewpoint);
		self.timer = RepeatingTimer::primed(self.config.interval);
		tracing::debug!(interval = ?self.config.interval, "significance manager initialized");
		Ok(())
	}

	/// Queue `entity` for tracking under `tag`.
	///
	/// Takes effect at the next reconciliation. Bursts of registrations are
	/// applied together.
	pub fn register(&mut self, entity: EntityRef, tag: SignificanceTag) -> Result<(), SignificanceError> {
		let Some(strong) = entity.upgrade() else {
			return Err(SignificanceError::ExpiredEntity);
		};
		let id = strong.entity_id();
		if id.is_null() {
			return Err(SignificanceError::NullEntity);
		}
		if !strong.kind().is_spatial() {
			return Err(SignificanceError::NotSpatial(id));
		}
		drop(strong);

		self.registry.queue_add(id, entity, tag);
		tracing::trace!(?id, ?tag, "significance registration queued");
		Ok(())
	}

	/// Queue `id` for removal. Unknown ids are ignored at reconciliation.
	pub fn deregister(&mut self, id: EntityId) {
		self.registry.queue_remove(id);
		tracing::trace!(?id, "significance deregistration queued");
	}

	/// Cached significance of `id` from the last applied pass, or `0.0`.
	pub fn get_significance(&self, id: EntityId) -> f32 {
		self.registry.significance(id)
	}

	/// Advance the manager by one host frame.
	///
	/// Applies a finished pass, applies queued registration changes when no
	/// pass is running, then starts a pass if the timer fired.
	pub fn update(&mut self, delta: Duration) {
		self.poll_results();

		if self.registry.has_pending_changes() && !self.is_in_flight() {
			self.reconcile();
		}

		if !self.is_initialized() {
			return;
		}

		if self.timer.tick(delta) > 0 {
			self.start_cycle();
		}
	}

	fn reconcile(&mut self) {
		let stats = self.registry.reconcile();
		self.stats.reconciliations += 1;
		tracing::debug!(
			added = stats.added,
			removed = stats.removed,
			expired = stats.expired,
			skipped = stats.skipped,
			total = self.registry.len(),
			"significance registry reconciled"
		);
	}

	/// Start a scoring pass.
	///
	/// Returns `true` if started.
	fn start_cycle(&mut self) -> bool {
		if self.is_in_flight() {
			self.stats.ticks_skipped += 1;
			tracing::trace!("significance tick skipped: pass in flight");
			return false;
		}

		let Some(viewpoint) = self.viewpoint.as_ref().and_then(|viewpoint| viewpoint.upgrade()) else {
			self.stats.ticks_skipped += 1;
			tracing::debug!("significance tick skipped: viewpoint expired");
			return false;
		};

		if self.registry.is_empty() {
			return false;
		}

		let snapshot = ScoringSnapshot {
			viewpoint: Viewpoint::from(viewpoint.transform()),
			transforms: self.registry.transforms(),
			falloff: self.config.falloff,
		};
		drop(viewpoint);

		let (sender, receiver) = channel::bounded(1);
		self.receiver = Some(receiver);
		self.stats.cycles_started += 1;

		self.dispatch.spawn(Box::new(move || {
			// Ignore send error (receiver dropped = manager gone)
			let _ = sender.send(snapshot.score());
		}));

		true
	}

	/// Poll for a finished pass (non-blocking) and apply it.
	///
	/// Returns `true` if results were applied.
	fn poll_results(&mut self) -> bool {
		let Some(receiver) = self.receiver.as_ref() else {
			return false;
		};

		match receiver.try_recv() {
			Ok(result) => {
				self.receiver = None;
				self.apply_results(result);
				true
			}
			Err(TryRecvError::Empty) => false,
			Err(TryRecvError::Disconnected) => {
				self.receiver = None;
				tracing::warn!("significance pass ended without a result");
				false
			}
		}
	}

	fn apply_results(&mut self, result: ScoringResult) {
		let first_pass = !self.first_pass_complete;
		let mut notified = 0usize;

		for (record, &score) in self.registry.records_mut().iter_mut().zip(&result.scores) {
			let Some(entity) = record.entity.upgrade() else {
				continue;
			};

			let notification = if first_pass {
				Some(Notification::initial(score))
			} else {
				Notification::between(record.significance, score, record.tag, entity.tracks_value())
			};

			if let (Some(notification), Some(listener)) = (notification, entity.listener()) {
				notification.deliver(listener);
				notified += 1;
			}

			record.significance = score;
		}

		self.first_pass_complete = true;
		self.stats.cycles_completed += 1;
		self.stats.last_significant = result.significant;
		self.stats.last_score_us = result.elapsed_us;

		tracing::debug!(
			entities = result.scores.len(),
			significant = result.significant,
			notified,
			first_pass,
			score_us = result.elapsed_us,
			"significance pass applied"
		);
	}
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
