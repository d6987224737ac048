use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ControlMode {
  Autonomous,
  Teleop,
  Test,
  #[default]
  Disabled
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotControlState {
  pub mode: ControlMode,
  pub enabled: bool,
  pub estopped: bool,
  pub ds_attached: bool,
  pub fms_attached: bool
}

impl RobotControlState {
  pub fn disabled() -> Self {
    Self::default()
  }

  pub fn enabled(mode: ControlMode) -> Self {
    match mode {
      ControlMode::Disabled => Self::disabled(),
      mode => Self { mode, enabled: true, ds_attached: true, ..Default::default() }
    }
  }

  /// The mode the robot should actually be running in. An e-stopped or unattached robot is
  /// disabled whatever mode was last requested.
  pub fn effective_mode(&self) -> ControlMode {
    if self.enabled && self.ds_attached && !self.estopped {
      self.mode
    } else {
      ControlMode::Disabled
    }
  }
}

#[cfg(feature = "simulation")]
pub mod sim {
  use std::{cell::RefCell, rc::Rc};

  use super::{ControlMode, RobotControlState};

  /// Driver station whose control word is set by the program. Clones share state.
  #[derive(Debug, Clone, Default)]
  pub struct SimDriverStation {
    state: Rc<RefCell<RobotControlState>>
  }

  impl SimDriverStation {
    pub fn new() -> Self {
      Self::default()
    }

    pub fn current(&self) -> RobotControlState {
      self.state.borrow().clone()
    }

    pub fn set_mode(&self, mode: ControlMode) {
      *self.state.borrow_mut() = RobotControlState::enabled(mode);
    }

    pub fn set_estopped(&self, estopped: bool) {
      self.state.borrow_mut().estopped = estopped;
    }
  }
}
