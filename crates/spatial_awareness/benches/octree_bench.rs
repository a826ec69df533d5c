//! Spatial index and scoring benchmarks.
//!
//! - **insert**: populate an index from scratch (subdivision cost included)
//! - **query**: radius queries of growing size against a populated index
//! - **relocate**: move every entity a short distance
//! - **score**: one background significance pass over a snapshot

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::{Vec2, Vec3};
use spatial_awareness::{
  octree::{Octree, OctreeConfig},
  significance::{Falloff, ScoringSnapshot, Viewpoint},
  Transform,
};

const HALF_EXTENT: f32 = 20000.0;
const COUNTS: [usize; 3] = [1_000, 10_000, 50_000];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Category {
  Villager,
  Prop,
}

// =============================================================================
// Deterministic scatter
// =============================================================================

/// Cheap integer hash mapped to [-1, 1].
fn unit(seed: u32) -> f32 {
  let mut x = seed.wrapping_mul(0x9E37_79B9);
  x ^= x >> 16;
  x = x.wrapping_mul(0x85EB_CA6B);
  x ^= x >> 13;
  (x as f32 / u32::MAX as f32) * 2.0 - 1.0
}

fn scatter(count: usize) -> Vec<Vec3> {
  (0..count as u32)
    .map(|i| Vec3::new(unit(i * 3), unit(i * 3 + 1), unit(i * 3 + 2)) * (HALF_EXTENT * 0.99))
    .collect()
}

fn category(i: usize) -> Category {
  if i % 4 == 0 {
    Category::Prop
  } else {
    Category::Villager
  }
}

fn populated(positions: &[Vec3]) -> Octree<u32, Category> {
  let mut tree = Octree::with_config(Vec3::ZERO, Vec3::splat(HALF_EXTENT), OctreeConfig::RESET);
  for (i, &position) in positions.iter().enumerate() {
    tree.insert(i as u32 + 1, position, category(i));
  }
  tree
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_insert(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_insert");

  for count in COUNTS {
    let positions = scatter(count);
    group.throughput(Throughput::Elements(count as u64));
    group.bench_with_input(BenchmarkId::from_parameter(count), &positions, |b, positions| {
      b.iter(|| black_box(populated(positions)))
    });
  }

  group.finish();
}

fn bench_query(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_query_10k");
  let tree = populated(&scatter(10_000));
  let mut out = Vec::new();

  for radius in [500.0f32, 2000.0, 8000.0] {
    group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
      b.iter(|| {
        out.clear();
        tree.query_into(black_box(Vec2::ZERO), radius, Some(&Category::Villager), &mut out);
        black_box(out.len())
      })
    });
  }

  group.finish();
}

fn bench_relocate(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_relocate");
  let count = 10_000;
  let positions = scatter(count);
  let step = Vec3::new(150.0, -75.0, 0.0);
  group.throughput(Throughput::Elements(count as u64));

  group.bench_function("10k", |b| {
    b.iter_batched(
      || populated(&positions),
      |mut tree| {
        for (i, &position) in positions.iter().enumerate() {
          let target = (position + step).clamp(Vec3::splat(-HALF_EXTENT), Vec3::splat(HALF_EXTENT));
          tree.relocate(&(i as u32 + 1), position, target, &category(i));
        }
        tree
      },
      criterion::BatchSize::LargeInput,
    )
  });

  group.finish();
}

fn bench_score(c: &mut Criterion) {
  let mut group = c.benchmark_group("significance_score");

  for count in COUNTS {
    let snapshot = ScoringSnapshot {
      viewpoint: Viewpoint::new(Vec3::ZERO, Vec3::X),
      transforms: scatter(count).into_iter().map(|p| Some(Transform::from_position(p))).collect(),
      falloff: Falloff::DEFAULT,
    };
    group.throughput(Throughput::Elements(count as u64));
    group.bench_with_input(BenchmarkId::from_parameter(count), &snapshot, |b, snapshot| {
      b.iter(|| black_box(snapshot.clone().score()))
    });
  }

  group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_relocate, bench_score);
criterion_main!(benches);
