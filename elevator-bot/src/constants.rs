pub mod can_ids {
  use robot_rs::actuators::CanId;

  pub const ELEVATOR_LEFT_MOTOR: CanId = 10;
  pub const ELEVATOR_RIGHT_MOTOR: CanId = 11;
}

pub mod operator_ids {
  pub const DRIVER_PORT: usize = 0;
}

pub mod elevator {
  pub const DEADBAND: f64 = 0.1;
  /// Kept low for a first characterization run.
  pub const SYSID_STEP_VOLTAGE: f64 = 4.0;

  pub const LEFT_AMPS_CHANNEL: &str = "Elevator left amps";
  pub const RIGHT_AMPS_CHANNEL: &str = "Elevator right amps";
  pub const SYSID_STATE_CHANNEL: &str = "SysIdElevator_State";
}

pub const NO_AUTO_MESSAGE: &str = "No autonomous command configured";
