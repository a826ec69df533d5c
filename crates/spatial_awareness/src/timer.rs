//! Repeating timer advanced by host frame deltas.

use std::time::Duration;

/// Fires once every `interval` of accumulated time.
///
/// The host feeds frame deltas through [`RepeatingTimer::tick`]; leftover time
/// carries over to the next interval.
#[derive(Clone, Debug)]
pub struct RepeatingTimer {
  interval: Duration,
  elapsed: Duration,
}

impl RepeatingTimer {
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      elapsed: Duration::ZERO,
    }
  }

  /// A timer whose first firing is due on the next tick.
  pub fn primed(interval: Duration) -> Self {
    Self {
      interval,
      elapsed: interval,
    }
  }

  pub fn interval(&self) -> Duration {
    self.interval
  }

  /// Time accumulated towards the next firing.
  pub fn elapsed(&self) -> Duration {
    self.elapsed
  }

  /// Advance by `delta` and return how many intervals completed.
  ///
  /// A zero interval fires once per tick.
  pub fn tick(&mut self, delta: Duration) -> u32 {
    if self.interval.is_zero() {
      return 1;
    }

    self.elapsed += delta;
    let interval = self.interval.as_nanos();
    let elapsed = self.elapsed.as_nanos();
    let fired = elapsed / interval;
    self.elapsed = Duration::from_nanos((elapsed % interval) as u64);
    fired.min(u32::MAX as u128) as u32
  }

  /// Drop accumulated time.
  pub fn reset(&mut self) {
    self.elapsed = Duration::ZERO;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const INTERVAL: Duration = Duration::from_millis(200);

  #[test]
  fn test_fires_after_interval() {
    let mut timer = RepeatingTimer::new(INTERVAL);
    assert_eq!(timer.tick(Duration::from_millis(100)), 0);
    assert_eq!(timer.tick(Duration::from_millis(100)), 1);
    assert_eq!(timer.elapsed(), Duration::ZERO);
  }

  #[test]
  fn test_carries_remainder() {
    let mut timer = RepeatingTimer::new(INTERVAL);
    assert_eq!(timer.tick(Duration::from_millis(250)), 1);
    assert_eq!(timer.elapsed(), Duration::from_millis(50));
    assert_eq!(timer.tick(Duration::from_millis(150)), 1);
  }

  #[test]
  fn test_large_delta_reports_every_interval() {
    let mut timer = RepeatingTimer::new(INTERVAL);
    assert_eq!(timer.tick(Duration::from_millis(1000)), 5);
  }

  #[test]
  fn test_zero_interval_fires_every_tick() {
    let mut timer = RepeatingTimer::new(Duration::ZERO);
    assert_eq!(timer.tick(Duration::ZERO), 1);
    assert_eq!(timer.tick(Duration::from_secs(10)), 1);
  }

  #[test]
  fn test_primed_fires_on_first_tick() {
    let mut timer = RepeatingTimer::primed(INTERVAL);
    assert_eq!(timer.tick(Duration::ZERO), 1);
    assert_eq!(timer.tick(Duration::from_millis(100)), 0);
    assert_eq!(timer.tick(Duration::from_millis(100)), 1);
  }

  #[test]
  fn test_reset() {
    let mut timer = RepeatingTimer::new(INTERVAL);
    timer.tick(Duration::from_millis(150));
    timer.reset();
    assert_eq!(timer.tick(Duration::from_millis(100)), 0);
  }
}
