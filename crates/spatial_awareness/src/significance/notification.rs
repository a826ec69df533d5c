//! Transition detection between two cached scores.

use super::tracked::{SignificanceListener, SignificanceTag};

/// A message owed to an entity's listener after a scoring pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
  BecameSignificant,
  BecameInsignificant,
  ValueChanged { old: f32, new: f32 },
}

impl Notification {
  /// First pass: every live entity learns its state, whatever its category.
  #[inline]
  pub fn initial(score: f32) -> Self {
    if score > 0.0 {
      Self::BecameSignificant
    } else {
      Self::BecameInsignificant
    }
  }

  /// Steady state. Zero-crossings win over value updates; `Effects` hears
  /// nothing.
  pub fn between(old: f32, new: f32, tag: SignificanceTag, tracks_value: bool) -> Option<Self> {
    if !tag.notifies_transitions() {
      return None;
    }

    match (old > 0.0, new > 0.0) {
      (false, true) => Some(Self::BecameSignificant),
      (true, false) => Some(Self::BecameInsignificant),
      (true, true) if tracks_value => Some(Self::ValueChanged { old, new }),
      _ => None,
    }
  }

  pub fn deliver(self, listener: &dyn SignificanceListener) {
    match self {
      Self::BecameSignificant => listener.on_significance_changed(true),
      Self::BecameInsignificant => listener.on_significance_changed(false),
      Self::ValueChanged { old, new } => listener.on_significance_value_changed(old, new),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[derive(Default)]
  struct Recorder(RefCell<Vec<Notification>>);

  impl SignificanceListener for Recorder {
    fn on_significance_changed(&self, significant: bool) {
      self.0.borrow_mut().push(Notification::initial(if significant { 1.0 } else { 0.0 }));
    }

    fn on_significance_value_changed(&self, old: f32, new: f32) {
      self.0.borrow_mut().push(Notification::ValueChanged { old, new });
    }
  }

  const TAG: SignificanceTag = SignificanceTag::Gameplay;

  #[test]
  fn test_initial() {
    assert_eq!(Notification::initial(0.3), Notification::BecameSignificant);
    assert_eq!(Notification::initial(0.0), Notification::BecameInsignificant);
  }

  #[test]
  fn test_zero_crossings() {
    assert_eq!(Notification::between(0.0, 0.6, TAG, false), Some(Notification::BecameSignificant));
    assert_eq!(Notification::between(0.6, 0.0, TAG, true), Some(Notification::BecameInsignificant));
    assert_eq!(Notification::between(0.0, 0.0, TAG, true), None);
  }

  #[test]
  fn test_value_change_requires_tracking() {
    assert_eq!(Notification::between(0.6, 0.8, TAG, false), None);
    assert_eq!(
      Notification::between(0.6, 0.8, TAG, true),
      Some(Notification::ValueChanged { old: 0.6, new: 0.8 })
    );
  }

  #[test]
  fn test_effects_suppressed() {
    let tag = SignificanceTag::Effects;
    assert_eq!(Notification::between(0.0, 0.6, tag, false), None);
    assert_eq!(Notification::between(0.6, 0.0, tag, false), None);
    assert_eq!(Notification::between(0.6, 0.8, tag, true), None);
  }

  #[test]
  fn test_deliver() {
    let recorder = Recorder::default();
    Notification::BecameSignificant.deliver(&recorder);
    Notification::ValueChanged { old: 0.2, new: 0.4 }.deliver(&recorder);
    Notification::BecameInsignificant.deliver(&recorder);

    assert_eq!(
      *recorder.0.borrow(),
      vec![
        Notification::BecameSignificant,
        Notification::ValueChanged { old: 0.2, new: 0.4 },
        Notification::BecameInsignificant,
      ]
    );
  }
}
