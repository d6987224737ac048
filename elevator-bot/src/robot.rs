use log::info;
use robot_rs::{
  actuators::MotorController,
  commands::{CommandRef, CommandScheduler},
  ds::{ControlMode, RobotControlState},
  input::hid::HIDDevice,
};

use crate::{config::RobotConfig, robot_container::{RobotContainer, RobotIo}};

/// Top-level robot program. Call [`Robot::periodic`] once per loop period.
pub struct Robot<M: MotorController, H: HIDDevice> {
  scheduler: CommandScheduler,
  container: RobotContainer<M, H>,
  mode: ControlMode,
  autonomous: Option<CommandRef>,
}

impl<M, H> Robot<M, H>
where
  M: MotorController + 'static,
  H: HIDDevice,
  H::Axis: 'static,
  H::Button: 'static,
{
  /// The robot starts disabled.
  pub fn new(config: &RobotConfig, io: RobotIo<M, H>) -> anyhow::Result<Self> {
    let mut scheduler = CommandScheduler::new();
    let container = RobotContainer::new(&mut scheduler, config, io)?;
    scheduler.set_enabled(false);

    Ok(Self { scheduler, container, mode: ControlMode::Disabled, autonomous: None })
  }

  pub fn periodic(&mut self, state: &RobotControlState) {
    let mode = state.effective_mode();
    if mode != self.mode {
      info!("Robot mode: {} -> {}", self.mode, mode);
      self.enter(mode);
      self.mode = mode;
    }

    self.scheduler.run();
  }

  fn enter(&mut self, mode: ControlMode) {
    match mode {
      ControlMode::Disabled => self.scheduler.set_enabled(false),
      ControlMode::Autonomous => {
        self.scheduler.set_enabled(true);
        let command = self.container.autonomous_command();
        self.scheduler.schedule(&command);
        self.autonomous = Some(command);
      },
      ControlMode::Teleop => {
        self.scheduler.set_enabled(true);
        if let Some(command) = self.autonomous.take() {
          self.scheduler.cancel(&command);
        }
      },
      ControlMode::Test => {
        self.scheduler.set_enabled(true);
        self.scheduler.cancel_all();
      },
    }
  }

  pub fn mode(&self) -> ControlMode {
    self.mode
  }

  pub fn scheduler(&self) -> &CommandScheduler {
    &self.scheduler
  }

  pub fn container(&self) -> &RobotContainer<M, H> {
    &self.container
  }
}
