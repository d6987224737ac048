use std::{cell::RefCell, rc::Rc, sync::Arc};

use robot_rs::{
  actuators::MotorController,
  commands::{command_ref, print, CommandRef, CommandScheduler, PrintCommand},
  input::{hid::HIDDevice, xbox::{Xbox, XboxController}},
  sensors::{Sensor, SensorExt},
  sysid::Direction,
  telemetry::TelemetrySink,
};

use crate::{config::RobotConfig, constants::NO_AUTO_MESSAGE, subsystems::elevator::Elevator};

/// The devices and outputs the robot is built from.
pub struct RobotIo<M, H> {
  pub elevator_left: M,
  pub elevator_right: M,
  pub driver: H,
  /// Operator-facing values, such as motor currents.
  pub dashboard: Arc<dyn TelemetrySink>,
  /// Signals recorded for offline analysis.
  pub signal_log: Arc<dyn TelemetrySink>,
  /// Where operator messages go. `None` logs them at info level.
  pub messages: Option<Box<dyn FnMut(&str)>>,
}

/// Owns the subsystems and wires driver inputs to commands.
pub struct RobotContainer<M: MotorController, H: HIDDevice> {
  elevator: Rc<RefCell<Elevator<M>>>,
  driver: Xbox<H>,
  autonomous: CommandRef,
}

impl<M, H> RobotContainer<M, H>
where
  M: MotorController + 'static,
  H: HIDDevice,
  H::Axis: 'static,
  H::Button: 'static,
{
  pub fn new(
    scheduler: &mut CommandScheduler,
    config: &RobotConfig,
    io: RobotIo<M, H>,
  ) -> anyhow::Result<Self> {
    let elevator = Elevator::new(
      config.elevator.clone(), io.elevator_left, io.elevator_right, io.dashboard, io.signal_log
    )?;
    let elevator = Rc::new(RefCell::new(elevator));
    scheduler.register_subsystem(elevator.clone())?;

    let container = Self {
      elevator,
      driver: Xbox::new(io.driver),
      autonomous: match io.messages {
        Some(sink) => command_ref(PrintCommand::with_sink(NO_AUTO_MESSAGE, sink)),
        None => print(NO_AUTO_MESSAGE),
      },
    };
    container.configure_bindings(scheduler)?;
    Ok(container)
  }

  fn configure_bindings(&self, scheduler: &mut CommandScheduler) -> anyhow::Result<()> {
    let elevator = self.elevator.borrow();

    // Stick forward reads negative, and should drive the elevator up.
    let stick = self.driver.left_y().invert();
    let manual = elevator.manual_command(move || stick.get_sensor_value());
    scheduler.set_default_command(Elevator::<M>::NAME, manual)?;

    self.driver.a_trigger().while_true(scheduler, elevator.sys_id_quasistatic(Direction::Forward));
    self.driver.b_trigger().while_true(scheduler, elevator.sys_id_quasistatic(Direction::Reverse));
    self.driver.x_trigger().while_true(scheduler, elevator.sys_id_dynamic(Direction::Forward));
    self.driver.y_trigger().while_true(scheduler, elevator.sys_id_dynamic(Direction::Reverse));
    Ok(())
  }

  /// The command to run in autonomous. Always the same command.
  pub fn autonomous_command(&self) -> CommandRef {
    self.autonomous.clone()
  }

  pub fn elevator(&self) -> Rc<RefCell<Elevator<M>>> {
    self.elevator.clone()
  }

  pub fn driver(&self) -> &Xbox<H> {
    &self.driver
  }
}
