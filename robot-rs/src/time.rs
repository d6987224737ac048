use std::{cell::Cell, rc::Rc, time::{SystemTime, UNIX_EPOCH}};

/// Seconds since the unix epoch, at microsecond resolution.
pub fn now() -> f64 {
  let micros = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_micros()).unwrap_or(0);
  micros as f64 / 1_000_000.0
}

/// Source of time for anything that measures elapsed time inside a command.
pub trait Clock {
  /// Current time in seconds. Only differences between readings are meaningful.
  fn now(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> f64 {
    now()
  }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
  seconds: Rc<Cell<f64>>
}

impl ManualClock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&self, seconds: f64) {
    self.seconds.set(seconds)
  }

  pub fn advance(&self, seconds: f64) {
    self.seconds.set(self.seconds.get() + seconds)
  }
}

impl Clock for ManualClock {
  fn now(&self) -> f64 {
    self.seconds.get()
  }
}
