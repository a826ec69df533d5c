//! Background work dispatch.
//!
//! The significance manager hands each scoring pass to a [`Dispatch`] and
//! receives the result through a channel it polls on the main line.
//!
//! - [`RayonDispatch`]: rayon's global thread pool via `rayon::spawn`
//!   (native, wasm-bindgen-rayon, emscripten with pthreads)
//! - [`InlineDispatch`]: runs the job immediately on the calling thread, for
//!   hosts without worker threads
//! - [`QueuedDispatch`]: holds jobs until the host runs them, for hosts that
//!   pump their own workers (and for deterministic tests)
//!
//! # Usage
//!
//! ```ignore
//! let dispatch = QueuedDispatch::new();
//! let mut manager = SignificanceManager::with_dispatch(config, dispatch.clone());
//!
//! // Later, on a worker of the host's choosing:
//! dispatch.run_pending();
//! ```

use std::sync::{Arc, Mutex, PoisonError};

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fire-and-forget execution of background work.
pub trait Dispatch {
  /// Run `job` off the main line (or inline, depending on the implementation).
  fn spawn(&self, job: Job);
}

/// Dispatch onto rayon's global thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonDispatch;

impl Dispatch for RayonDispatch {
  fn spawn(&self, job: Job) {
    rayon::spawn(job);
  }
}

/// Run jobs synchronously on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineDispatch;

impl Dispatch for InlineDispatch {
  fn spawn(&self, job: Job) {
    job();
  }
}

/// Queue jobs until [`QueuedDispatch::run_pending`] is called.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct QueuedDispatch {
  jobs: Arc<Mutex<Vec<Job>>>,
}

impl QueuedDispatch {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of jobs waiting to run.
  pub fn pending_count(&self) -> usize {
    self.jobs.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Run every queued job in submission order. Returns how many ran.
  ///
  /// Jobs queued while running are left for the next call.
  pub fn run_pending(&self) -> usize {
    let jobs = std::mem::take(&mut *self.jobs.lock().unwrap_or_else(PoisonError::into_inner));
    let count = jobs.len();
    for job in jobs {
      job();
    }
    count
  }
}

impl Dispatch for QueuedDispatch {
  fn spawn(&self, job: Job) {
    self.jobs.lock().unwrap_or_else(PoisonError::into_inner).push(job);
  }
}

// =============================================================================
// Tests
// =============================================================================
