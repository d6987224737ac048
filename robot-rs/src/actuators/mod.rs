#[cfg(feature = "simulation")]
pub mod sim;

use mockall::automock;
use strum::Display;

/// Address of a device on the CAN bus.
pub type CanId = u8;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum MotorError {
  DeviceNotPresent,
  ConfigRejected,
  DuplicateId,
  Timeout,
}
impl std::error::Error for MotorError {}

pub type MotorResult<T> = Result<T, MotorError>;

/// A demand sent to a motor controller. Each request replaces the last one; nothing is queued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlRequest {
  /// Fraction of supply voltage, in [-1, 1].
  DutyCycle(f64),
  /// Output voltage, in volts.
  Voltage(f64),
  /// Mirror the output of another controller for as long as this request stands.
  Follower { leader: CanId, opposed: bool },
  Neutral,
}

/// Which rotation direction counts as positive output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvertedValue {
  #[default]
  CounterClockwisePositive,
  ClockwisePositive,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotorOutputConfig {
  pub inverted: InvertedValue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TalonConfig {
  pub motor_output: MotorOutputConfig,
}

#[automock]
pub trait MotorController {
  fn id(&self) -> CanId;
  fn set_control(&mut self, request: ControlRequest) -> MotorResult<()>;
  fn apply_config(&mut self, config: &TalonConfig) -> MotorResult<()>;
  /// Current producing torque, in amps.
  fn torque_current(&self) -> MotorResult<f64>;
}
