use std::time::Duration;

use robot_rs::{actuators::{CanId, InvertedValue}, start::DEFAULT_PERIOD, sysid::SysIdConfig};

use crate::constants::{can_ids, elevator, operator_ids};

/// Everything about the elevator that depends on how it was built and wired.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevatorConfig {
  pub leader_id: CanId,
  pub follower_id: CanId,
  /// Manual inputs smaller than this are treated as zero.
  pub deadband: f64,
  /// Polarity of the leader. The follower mirrors whatever the leader does, so only the
  /// leader is configured. Not yet checked on the real mechanism.
  pub leader_inversion: InvertedValue,
  pub step_voltage: f64,
  /// Volts per second.
  pub ramp_rate: f64,
  pub timeout: Duration,
}

impl Default for ElevatorConfig {
  fn default() -> Self {
    let sysid = SysIdConfig::default();
    Self {
      leader_id: can_ids::ELEVATOR_LEFT_MOTOR,
      follower_id: can_ids::ELEVATOR_RIGHT_MOTOR,
      deadband: elevator::DEADBAND,
      leader_inversion: InvertedValue::ClockwisePositive,
      step_voltage: elevator::SYSID_STEP_VOLTAGE,
      ramp_rate: sysid.ramp_rate,
      timeout: sysid.timeout,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RobotConfig {
  pub driver_port: usize,
  pub period: Duration,
  pub elevator: ElevatorConfig,
}

impl Default for RobotConfig {
  fn default() -> Self {
    Self {
      driver_port: operator_ids::DRIVER_PORT,
      period: DEFAULT_PERIOD,
      elevator: ElevatorConfig::default(),
    }
  }
}
