//! System identification: drive a mechanism with known voltage profiles so its
//! feedforward gains can be fitted offline.
//!
//! A [`SysIdRoutine`] hands out four commands. Quasistatic tests ramp voltage slowly
//! (`ramp_rate` volts per second) so acceleration is negligible; dynamic tests apply a
//! constant `step_voltage` so acceleration dominates. Each test runs until it is cancelled or
//! `timeout` elapses, and always drives the mechanism back to 0 V when it stops.

use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

use log::{debug, warn};
use strum::Display;

use crate::{
  commands::{command_ref, Command, CommandRef, Requirements},
  telemetry::TelemetrySink,
  time::{Clock, SystemClock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
  Forward,
  Reverse,
}

impl Direction {
  pub fn sign(&self) -> f64 {
    match self {
      Direction::Forward => 1.0,
      Direction::Reverse => -1.0,
    }
  }
}

/// Which test is running. The string forms are what analysis tools expect to find in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SysIdState {
  #[strum(to_string = "quasistatic-forward")]
  QuasistaticForward,
  #[strum(to_string = "quasistatic-reverse")]
  QuasistaticReverse,
  #[strum(to_string = "dynamic-forward")]
  DynamicForward,
  #[strum(to_string = "dynamic-reverse")]
  DynamicReverse,
  #[strum(to_string = "none")]
  None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
  Quasistatic,
  Dynamic,
}

impl SysIdState {
  pub fn of(kind: TestKind, direction: Direction) -> Self {
    match (kind, direction) {
      (TestKind::Quasistatic, Direction::Forward) => SysIdState::QuasistaticForward,
      (TestKind::Quasistatic, Direction::Reverse) => SysIdState::QuasistaticReverse,
      (TestKind::Dynamic, Direction::Forward) => SysIdState::DynamicForward,
      (TestKind::Dynamic, Direction::Reverse) => SysIdState::DynamicReverse,
    }
  }
}

pub struct SysIdConfig {
  /// Volts per second, for quasistatic tests.
  pub ramp_rate: f64,
  /// Volts, for dynamic tests.
  pub step_voltage: f64,
  pub timeout: Duration,
  /// Called with the new state whenever a test starts or stops. Defaults to a debug log line.
  pub record_state: Option<Box<dyn FnMut(SysIdState)>>,
}

impl Default for SysIdConfig {
  fn default() -> Self {
    Self {
      ramp_rate: 1.0,
      step_voltage: 7.0,
      timeout: Duration::from_secs(10),
      record_state: None,
    }
  }
}

pub struct SysIdMechanism {
  /// Apply a voltage to the mechanism. Called every tick of a test, and with 0 V when it stops.
  pub drive: Box<dyn FnMut(f64) -> anyhow::Result<()>>,
  /// Record whatever the mechanism measures. Called every tick, after `drive`.
  pub log: Box<dyn FnMut(&mut SysIdRoutineLog)>,
  /// Name of the subsystem the test commands require.
  pub subsystem: String,
}

/// Per-tick handle for recording motor data during a test.
pub struct SysIdRoutineLog {
  name: String,
  sink: Option<Arc<dyn TelemetrySink>>,
}

impl SysIdRoutineLog {
  pub fn new(name: &str, sink: Option<Arc<dyn TelemetrySink>>) -> Self {
    Self { name: name.to_owned(), sink }
  }

  pub fn motor<'a>(&'a mut self, motor: &'a str) -> MotorLog<'a> {
    MotorLog { log: self, motor }
  }

  fn record(&self, motor: &str, quantity: &str, value: f64) {
    if let Some(sink) = &self.sink {
      sink.write(&format!("{}/{}/{}", self.name, motor, quantity), value.into());
    }
  }
}

pub struct MotorLog<'a> {
  log: &'a SysIdRoutineLog,
  motor: &'a str,
}

impl<'a> MotorLog<'a> {
  pub fn voltage(self, volts: f64) -> Self {
    self.log.record(self.motor, "voltage", volts);
    self
  }

  pub fn position(self, position: f64) -> Self {
    self.log.record(self.motor, "position", position);
    self
  }

  pub fn velocity(self, velocity: f64) -> Self {
    self.log.record(self.motor, "velocity", velocity);
    self
  }

  pub fn current(self, amps: f64) -> Self {
    self.log.record(self.motor, "current", amps);
    self
  }
}

struct RoutineInner {
  config: SysIdConfig,
  mechanism: SysIdMechanism,
  log: SysIdRoutineLog,
  clock: Rc<dyn Clock>,
}

impl RoutineInner {
  fn record_state(&mut self, state: SysIdState) {
    match self.config.record_state.as_mut() {
      Some(record) => record(state),
      None => debug!("SysId {}: {}", self.mechanism.subsystem, state),
    }
  }
}

pub struct SysIdRoutine {
  inner: Rc<RefCell<RoutineInner>>,
}

impl SysIdRoutine {
  pub fn new(config: SysIdConfig, mechanism: SysIdMechanism) -> Self {
    let log = SysIdRoutineLog::new(&format!("sysid-{}", mechanism.subsystem), None);
    Self {
      inner: Rc::new(RefCell::new(RoutineInner { config, mechanism, log, clock: Rc::new(SystemClock) }))
    }
  }

  pub fn with_clock<C: Clock + 'static>(self, clock: C) -> Self {
    self.inner.borrow_mut().clock = Rc::new(clock);
    self
  }

  /// Where [`SysIdRoutineLog`] writes motor data. Without one, motor data is dropped.
  pub fn with_log_sink(self, sink: Arc<dyn TelemetrySink>) -> Self {
    {
      let mut inner = self.inner.borrow_mut();
      let name = format!("sysid-{}", inner.mechanism.subsystem);
      inner.log = SysIdRoutineLog::new(&name, Some(sink));
    }
    self
  }

  pub fn quasistatic(&self, direction: Direction) -> CommandRef {
    self.command(TestKind::Quasistatic, direction)
  }

  pub fn dynamic(&self, direction: Direction) -> CommandRef {
    self.command(TestKind::Dynamic, direction)
  }

  fn command(&self, kind: TestKind, direction: Direction) -> CommandRef {
    let subsystem = self.inner.borrow().mechanism.subsystem.clone();
    command_ref(SysIdCommand {
      routine: self.inner.clone(),
      state: SysIdState::of(kind, direction),
      kind,
      direction,
      started: 0.0,
      requirements: [subsystem].into_iter().collect(),
    })
  }
}

struct SysIdCommand {
  routine: Rc<RefCell<RoutineInner>>,
  state: SysIdState,
  kind: TestKind,
  direction: Direction,
  started: f64,
  requirements: Requirements,
}

impl SysIdCommand {
  fn elapsed(&self, inner: &RoutineInner) -> f64 {
    inner.clock.now() - self.started
  }
}

impl Command for SysIdCommand {
  fn initialize(&mut self) -> anyhow::Result<()> {
    let mut inner = self.routine.borrow_mut();
    self.started = inner.clock.now();
    inner.record_state(self.state);
    Ok(())
  }

  fn execute(&mut self) -> anyhow::Result<()> {
    let mut inner = self.routine.borrow_mut();
    let voltage = match self.kind {
      TestKind::Quasistatic => self.direction.sign() * inner.config.ramp_rate * self.elapsed(&inner),
      TestKind::Dynamic => self.direction.sign() * inner.config.step_voltage,
    };

    let RoutineInner { mechanism, log, .. } = &mut *inner;
    (mechanism.drive)(voltage)?;
    (mechanism.log)(log);
    Ok(())
  }

  fn is_finished(&mut self) -> bool {
    let inner = self.routine.borrow();
    self.elapsed(&inner) >= inner.config.timeout.as_secs_f64()
  }

  fn end(&mut self, _interrupted: bool) {
    let mut inner = self.routine.borrow_mut();
    if let Err(e) = (inner.mechanism.drive)(0.0) {
      warn!("SysId {} could not stop the mechanism: {:#}", self.state, e);
    }
    inner.record_state(SysIdState::None);
  }

  fn requirements(&self) -> Requirements {
    self.requirements.clone()
  }

  fn name(&self) -> String {
    format!("sysid-{}", self.state)
  }
}
