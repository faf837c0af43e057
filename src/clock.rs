use super::utils;

/// Time source for the expiry window check.
/// Injected rather than read ambiently so the check can run against a fixed
/// instant in tests.
pub trait Clock {
  fn current_time_millis(&self) -> i64;
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn current_time_millis(&self) -> i64 {
    utils::current_time_millis()
  }
}

#[cfg(test)]
pub struct FixedClock(pub i64);

#[cfg(test)]
impl Clock for FixedClock {
  fn current_time_millis(&self) -> i64 {
    self.0
  }
}
