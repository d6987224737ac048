use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{CanId, ControlRequest, MotorController, MotorError, MotorResult, TalonConfig};

pub const SUPPLY_VOLTAGE: f64 = 12.0;
/// Kraken X60 at stall: 366 A from a 12 V supply.
pub const WINDING_RESISTANCE: f64 = 12.0 / 366.0;

#[derive(Debug, Clone)]
struct SimDevice {
  request: ControlRequest,
  config: Option<TalonConfig>,
  connected: bool,
  reject_config: bool,
  requests_sent: usize,
}

impl SimDevice {
  fn new() -> Self {
    Self {
      request: ControlRequest::Neutral,
      config: None,
      connected: true,
      reject_config: false,
      requests_sent: 0
    }
  }
}

/// Shared table of every simulated device. Clones refer to the same bus.
#[derive(Debug, Clone, Default)]
pub struct SimCanBus {
  devices: Rc<RefCell<HashMap<CanId, SimDevice>>>,
}

impl SimCanBus {
  pub fn new() -> Self {
    Self::default()
  }

  fn register(&self, id: CanId) -> MotorResult<()> {
    let mut devices = self.devices.borrow_mut();
    if devices.contains_key(&id) {
      return Err(MotorError::DuplicateId);
    }
    devices.insert(id, SimDevice::new());
    Ok(())
  }

  fn with_device<R>(&self, id: CanId, f: impl FnOnce(&mut SimDevice) -> MotorResult<R>) -> MotorResult<R> {
    match self.devices.borrow_mut().get_mut(&id) {
      Some(dev) if dev.connected => f(dev),
      _ => Err(MotorError::DeviceNotPresent)
    }
  }

  pub fn set_connected(&self, id: CanId, connected: bool) {
    if let Some(dev) = self.devices.borrow_mut().get_mut(&id) {
      dev.connected = connected;
    }
  }

  /// Make the next config applications on `id` fail.
  pub fn set_reject_config(&self, id: CanId, reject: bool) {
    if let Some(dev) = self.devices.borrow_mut().get_mut(&id) {
      dev.reject_config = reject;
    }
  }

  pub fn request(&self, id: CanId) -> Option<ControlRequest> {
    self.devices.borrow().get(&id).map(|d| d.request)
  }

  pub fn config(&self, id: CanId) -> Option<TalonConfig> {
    self.devices.borrow().get(&id).and_then(|d| d.config)
  }

  pub fn requests_sent(&self, id: CanId) -> usize {
    self.devices.borrow().get(&id).map(|d| d.requests_sent).unwrap_or(0)
  }

  /// Output of `id` in duty-cycle units, after followers have been resolved.
  pub fn output(&self, id: CanId) -> f64 {
    let devices = self.devices.borrow();
    resolve_output(&devices, id, 0)
  }
}

fn resolve_output(devices: &HashMap<CanId, SimDevice>, id: CanId, depth: usize) -> f64 {
  // A follower chain longer than the bus means a cycle
  if depth > devices.len() {
    return 0.0;
  }

  match devices.get(&id) {
    Some(dev) if dev.connected => match dev.request {
      ControlRequest::DutyCycle(d) => d.clamp(-1.0, 1.0),
      ControlRequest::Voltage(v) => (v / SUPPLY_VOLTAGE).clamp(-1.0, 1.0),
      ControlRequest::Follower { leader, opposed } => {
        let out = resolve_output(devices, leader, depth + 1);
        if opposed { -out } else { out }
      },
      ControlRequest::Neutral => 0.0,
    },
    _ => 0.0
  }
}

/// A TalonFX-style controller living on a [`SimCanBus`].
#[derive(Debug, Clone)]
pub struct SimTalonFX {
  bus: SimCanBus,
  id: CanId,
}

impl SimTalonFX {
  pub fn new(bus: &SimCanBus, id: CanId) -> MotorResult<Self> {
    bus.register(id)?;
    Ok(Self { bus: bus.clone(), id })
  }

  pub fn output(&self) -> f64 {
    self.bus.output(self.id)
  }
}

impl MotorController for SimTalonFX {
  fn id(&self) -> CanId {
    self.id
  }

  fn set_control(&mut self, request: ControlRequest) -> MotorResult<()> {
    self.bus.with_device(self.id, |dev| {
      dev.request = request;
      dev.requests_sent += 1;
      Ok(())
    })
  }

  fn apply_config(&mut self, config: &TalonConfig) -> MotorResult<()> {
    self.bus.with_device(self.id, |dev| {
      if dev.reject_config {
        return Err(MotorError::ConfigRejected);
      }
      dev.config = Some(*config);
      Ok(())
    })
  }

  fn torque_current(&self) -> MotorResult<f64> {
    self.bus.with_device(self.id, |_| Ok(()))?;
    Ok(self.output() * SUPPLY_VOLTAGE / WINDING_RESISTANCE)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use crate::actuators::{ControlRequest, InvertedValue, MotorController, MotorError, MotorOutputConfig, TalonConfig};
  use super::{SimCanBus, SimTalonFX, SUPPLY_VOLTAGE, WINDING_RESISTANCE};

  #[test]
  fn test_follower_tracks_leader() {
    let bus = SimCanBus::new();
    let mut leader = SimTalonFX::new(&bus, 1).unwrap();
    let mut follower = SimTalonFX::new(&bus, 2).unwrap();

    follower.set_control(ControlRequest::Follower { leader: 1, opposed: true }).unwrap();
    for d in [0.5, -0.25, 1.0, 0.0] {
      leader.set_control(ControlRequest::DutyCycle(d)).unwrap();
      assert_relative_eq!(follower.output(), -d);
    }

    leader.set_control(ControlRequest::Voltage(6.0)).unwrap();
    assert_relative_eq!(leader.output(), 0.5);
    assert_relative_eq!(follower.output(), -0.5);
    assert_eq!(bus.requests_sent(2), 1);
  }

  #[test]
  fn test_duplicate_id() {
    let bus = SimCanBus::new();
    let _a = SimTalonFX::new(&bus, 4).unwrap();
    assert_eq!(SimTalonFX::new(&bus, 4).err(), Some(MotorError::DuplicateId));
  }

  #[test]
  fn test_disconnected() {
    let bus = SimCanBus::new();
    let mut motor = SimTalonFX::new(&bus, 3).unwrap();
    bus.set_connected(3, false);
    assert_eq!(motor.set_control(ControlRequest::DutyCycle(0.2)), Err(MotorError::DeviceNotPresent));
    assert_eq!(motor.torque_current(), Err(MotorError::DeviceNotPresent));
    bus.set_connected(3, true);
    assert!(motor.set_control(ControlRequest::DutyCycle(0.2)).is_ok());
  }

  #[test]
  fn test_config() {
    let bus = SimCanBus::new();
    let mut motor = SimTalonFX::new(&bus, 7).unwrap();
    let cfg = TalonConfig { motor_output: MotorOutputConfig { inverted: InvertedValue::ClockwisePositive } };

    bus.set_reject_config(7, true);
    assert_eq!(motor.apply_config(&cfg), Err(MotorError::ConfigRejected));
    assert_eq!(bus.config(7), None);

    bus.set_reject_config(7, false);
    motor.apply_config(&cfg).unwrap();
    assert_eq!(bus.config(7), Some(cfg));
  }

  #[test]
  fn test_torque_current() {
    let bus = SimCanBus::new();
    let mut motor = SimTalonFX::new(&bus, 5).unwrap();
    assert_relative_eq!(motor.torque_current().unwrap(), 0.0);
    motor.set_control(ControlRequest::DutyCycle(0.25)).unwrap();
    assert_relative_eq!(motor.torque_current().unwrap(), 0.25 * SUPPLY_VOLTAGE / WINDING_RESISTANCE);
  }

  #[test]
  fn test_follow_cycle_is_neutral() {
    let bus = SimCanBus::new();
    let mut a = SimTalonFX::new(&bus, 1).unwrap();
    let mut b = SimTalonFX::new(&bus, 2).unwrap();
    a.set_control(ControlRequest::Follower { leader: 2, opposed: false }).unwrap();
    b.set_control(ControlRequest::Follower { leader: 1, opposed: false }).unwrap();
    assert_relative_eq!(a.output(), 0.0);
  }
}
