//! awareness_demo - headless driver for the spatial awareness subsystem
//!
//! Simulates a village of wandering villagers and static campfires while a
//! camera circles overhead. Every frame villagers move through the octree and
//! the significance manager is advanced; a summary is logged periodically.
//!
//! Usage:
//! - `awareness_demo [frames]` (default 1800, i.e. 30 s at 60 Hz)
//! - `RUST_LOG=spatial_awareness=debug` for per-pass logs

mod village;

use std::time::Duration;

use spatial_awareness::{entity_ref, SignificanceManager};
use village::{Camera, Village};

/// Fixed simulation step (60 Hz).
const FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_FRAMES: u32 = 1800;

const VILLAGERS: usize = 5_000;
const CAMPFIRES: usize = 500;
const SEED: u64 = 0x5eed;

/// Radius of the camera's orbit around the village centre.
const ORBIT_RADIUS: f32 = 12_000.0;
/// Radius for the "who is nearby" index query.
const NEARBY_RADIUS: f32 = 3_000.0;
const REPORT_EVERY: u32 = 300;

fn main() -> eyre::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::from_default_env().add_directive("awareness_demo=info".parse()?),
    )
    .init();

  let frames = match std::env::args().nth(1) {
    Some(arg) => arg.parse::<u32>()?,
    None => DEFAULT_FRAMES,
  };

  let camera = std::sync::Arc::new(Camera::new());
  let mut village = Village::populate(VILLAGERS, CAMPFIRES, SEED);
  let mut significance = SignificanceManager::new();
  significance.initialize(entity_ref(&camera))?;
  village.register_all(&mut significance)?;

  for frame in 0..frames {
    let time = frame as f32 * FRAME.as_secs_f32();
    camera.orbit(time, ORBIT_RADIUS);
    village.step(FRAME.as_secs_f32());
    significance.update(FRAME);

    if frame == frames / 2 {
      village.evict(VILLAGERS / 10, &mut significance);
      village.abandon_campfires(CAMPFIRES / 5);
    }

    if frame % REPORT_EVERY == 0 {
      report(frame, &camera, &village, &significance);
    }

    // Give the scoring pass a chance to land, as a real frame would.
    std::thread::sleep(Duration::from_micros(500));
  }

  // Let the last pass finish before the final report.
  while significance.is_in_flight() {
    significance.update(Duration::ZERO);
    std::thread::yield_now();
  }
  report(frames, &camera, &village, &significance);

  let stats = significance.stats();
  let (gained, lost, updates) = village.transitions().snapshot();
  tracing::info!(
    cycles = stats.cycles_completed,
    skipped = stats.ticks_skipped,
    reconciliations = stats.reconciliations,
    gained,
    lost,
    updates,
    "simulation finished"
  );

  Ok(())
}

fn report(frame: u32, camera: &Camera, village: &Village, significance: &SignificanceManager) {
  use spatial_awareness::Trackable;

  let viewpoint = camera.transform().position;
  let nearby = village.villagers_near(viewpoint.truncate(), NEARBY_RADIUS);
  let significant = village.residents().filter(|resident| resident.is_significant()).count();
  let stats = significance.stats();
  let index = village.index().stats();

  tracing::info!(
    frame,
    tracked = significance.len(),
    significant,
    nearby,
    last_pass_us = stats.last_score_us,
    index_nodes = index.nodes,
    index_depth = index.max_depth_reached,
    "village report"
  );
}
