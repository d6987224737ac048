use std::{cell::RefCell, rc::Rc, sync::Arc};

use anyhow::{bail, Context};
use log::{debug, info, warn};
use robot_rs::{
  actuators::{ControlRequest, MotorController, TalonConfig},
  commands::{requirements, run_end, CommandRef, Subsystem},
  filters::{ClampingFilter, Deadband, Filter, FilterExt},
  sysid::{Direction, SysIdConfig, SysIdMechanism, SysIdRoutine, SysIdRoutineLog},
  telemetry::TelemetrySink,
  time::Clock,
};

use crate::{
  config::ElevatorConfig,
  constants::elevator::{LEFT_AMPS_CHANNEL, RIGHT_AMPS_CHANNEL, SYSID_STATE_CHANNEL},
};

/// Two-motor elevator. The left motor leads; the right motor is set up once to follow it with
/// opposed output and is never commanded again.
pub struct Elevator<M: MotorController> {
  leader: Rc<RefCell<M>>,
  follower: M,
  config: ElevatorConfig,
  dashboard: Arc<dyn TelemetrySink>,
  sys_id_routine: SysIdRoutine,
  last_amps: (Option<f64>, Option<f64>),
}

impl<M: MotorController + 'static> Elevator<M> {
  pub const NAME: &'static str = "elevator";

  /// Configure both motors and build the elevator. The follower is attached before the leader
  /// is configured, and nothing is commanded on the leader until its config has been applied.
  pub fn new(
    config: ElevatorConfig,
    mut leader: M,
    mut follower: M,
    dashboard: Arc<dyn TelemetrySink>,
    signal_log: Arc<dyn TelemetrySink>,
  ) -> anyhow::Result<Self> {
    if leader.id() == follower.id() {
      bail!("Elevator motors must have distinct CAN IDs (both are {})", leader.id());
    }

    follower.set_control(ControlRequest::Follower { leader: leader.id(), opposed: true })
      .with_context(|| format!("Could not make motor {} follow motor {}", follower.id(), leader.id()))?;

    let mut talon_config = TalonConfig::default();
    talon_config.motor_output.inverted = config.leader_inversion;
    leader.apply_config(&talon_config)
      .with_context(|| format!("Could not configure elevator leader {}", leader.id()))?;

    info!("Elevator ready: leader {}, follower {} (opposed)", leader.id(), follower.id());

    let leader = Rc::new(RefCell::new(leader));
    let sys_id_routine = Self::sys_id_routine(&config, leader.clone(), signal_log);

    Ok(Self {
      leader,
      follower,
      config,
      dashboard,
      sys_id_routine,
      last_amps: (None, None),
    })
  }

  fn sys_id_routine(
    config: &ElevatorConfig,
    leader: Rc<RefCell<M>>,
    signal_log: Arc<dyn TelemetrySink>,
  ) -> SysIdRoutine {
    SysIdRoutine::new(
      SysIdConfig {
        ramp_rate: config.ramp_rate,
        step_voltage: config.step_voltage,
        timeout: config.timeout,
        record_state: Some(Box::new(move |state| {
          signal_log.write(SYSID_STATE_CHANNEL, state.to_string().into())
        })),
      },
      SysIdMechanism {
        drive: Box::new(move |volts| {
          leader.borrow_mut().set_control(ControlRequest::Voltage(volts))?;
          Ok(())
        }),
        // Position and velocity are not measured yet, so there is nothing to record.
        log: Box::new(|_: &mut SysIdRoutineLog| {}),
        subsystem: Self::NAME.to_owned(),
      },
    )
  }

  /// Use a different time source for the characterization commands.
  pub fn with_sys_id_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
    self.sys_id_routine = self.sys_id_routine.with_clock(clock);
    self
  }

  /// Drive the elevator open-loop from `duty_cycle`, read every tick. Values are clamped to
  /// [-1, 1] and then deadbanded; a missing or non-finite reading drives 0. The motors are set
  /// to 0 once when the command stops.
  pub fn manual_command<F>(&self, mut duty_cycle: F) -> CommandRef
  where
    F: FnMut() -> Option<f64> + 'static
  {
    let mut filter = ClampingFilter::new(-1.0, 1.0).then(Deadband::new(self.config.deadband));
    let leader = self.leader.clone();
    let stop = self.leader.clone();

    run_end(
      "ElevatorManual",
      requirements(&[Self::NAME]),
      move || {
        let demand = filter.calculate(duty_cycle().filter(|v| v.is_finite()).unwrap_or(0.0));
        leader.borrow_mut().set_control(ControlRequest::DutyCycle(demand))?;
        Ok(())
      },
      move || {
        if let Err(e) = stop.borrow_mut().set_control(ControlRequest::DutyCycle(0.0)) {
          warn!("Could not stop the elevator: {}", e);
        }
      }
    )
  }

  pub fn sys_id_quasistatic(&self, direction: Direction) -> CommandRef {
    self.sys_id_routine.quasistatic(direction)
  }

  pub fn sys_id_dynamic(&self, direction: Direction) -> CommandRef {
    self.sys_id_routine.dynamic(direction)
  }

  pub fn config(&self) -> &ElevatorConfig {
    &self.config
  }

  fn publish_current(&mut self) {
    read_current(&*self.leader.borrow(), &mut self.last_amps.0);
    read_current(&self.follower, &mut self.last_amps.1);

    if let Some(amps) = self.last_amps.0 {
      self.dashboard.write(LEFT_AMPS_CHANNEL, amps.into());
    }
    if let Some(amps) = self.last_amps.1 {
      self.dashboard.write(RIGHT_AMPS_CHANNEL, amps.into());
    }
  }
}

// A failed read leaves the last good value in place.
fn read_current<M: MotorController>(motor: &M, last: &mut Option<f64>) {
  match motor.torque_current() {
    Ok(amps) => *last = Some(amps),
    Err(e) => debug!("Could not read torque current from motor {}: {}", motor.id(), e),
  }
}

impl<M: MotorController + 'static> Subsystem for Elevator<M> {
  fn name(&self) -> String {
    Self::NAME.to_owned()
  }

  fn periodic(&mut self) {
    self.publish_current();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use mockall::{predicate::eq, Sequence};
  use robot_rs::{
    actuators::{ControlRequest, InvertedValue, MockMotorController, MotorError, TalonConfig},
    commands::{CommandScheduler, Subsystem},
    sysid::Direction,
    telemetry::NetworkTable,
    time::ManualClock,
  };

  use crate::{
    config::ElevatorConfig,
    constants::elevator::{LEFT_AMPS_CHANNEL, RIGHT_AMPS_CHANNEL, SYSID_STATE_CHANNEL},
  };
  use super::Elevator;

  type Requests = Arc<Mutex<Vec<ControlRequest>>>;

  fn motor(id: u8, requests: &Requests) -> MockMotorController {
    let mut motor = MockMotorController::new();
    motor.expect_id().return_const(id);
    let r = requests.clone();
    motor.expect_set_control().returning(move |req| { r.lock().unwrap().push(req); Ok(()) });
    motor.expect_apply_config().returning(|_| Ok(()));
    motor
  }

  type Tables = (Arc<NetworkTable>, Arc<NetworkTable>);

  fn elevator(
    leader: MockMotorController,
    follower: MockMotorController,
  ) -> (Elevator<MockMotorController>, Tables) {
    let dashboard = Arc::new(NetworkTable::new());
    let signal_log = Arc::new(NetworkTable::new());
    let elevator = Elevator::new(
      ElevatorConfig::default(), leader, follower, dashboard.clone(), signal_log.clone()
    ).unwrap();
    (elevator, (dashboard, signal_log))
  }

  #[test]
  fn test_follower_attached_before_leader_config() {
    let mut seq = Sequence::new();
    let mut leader = MockMotorController::new();
    let mut follower = MockMotorController::new();
    leader.expect_id().return_const(10u8);
    follower.expect_id().return_const(11u8);

    follower.expect_set_control()
      .with(eq(ControlRequest::Follower { leader: 10, opposed: true }))
      .once().in_sequence(&mut seq).returning(|_| Ok(()));

    let mut expected = TalonConfig::default();
    expected.motor_output.inverted = InvertedValue::ClockwisePositive;
    leader.expect_apply_config()
      .with(eq(expected))
      .once().in_sequence(&mut seq).returning(|_| Ok(()));
    leader.expect_set_control().never();

    let _ = elevator(leader, follower);
  }

  #[test]
  fn test_leader_config_failure_fails_construction() {
    let requests = Requests::default();
    let mut leader = MockMotorController::new();
    leader.expect_id().return_const(10u8);
    leader.expect_apply_config().returning(|_| Err(MotorError::ConfigRejected));

    let result = Elevator::new(
      ElevatorConfig::default(), leader, motor(11, &requests),
      Arc::new(NetworkTable::new()), Arc::new(NetworkTable::new())
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_missing_follower_fails_construction() {
    let requests = Requests::default();
    let mut follower = MockMotorController::new();
    follower.expect_id().return_const(11u8);
    follower.expect_set_control().returning(|_| Err(MotorError::DeviceNotPresent));

    let result = Elevator::new(
      ElevatorConfig::default(), motor(10, &requests), follower,
      Arc::new(NetworkTable::new()), Arc::new(NetworkTable::new())
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_same_ids_rejected() {
    let requests = Requests::default();
    let result = Elevator::new(
      ElevatorConfig::default(), motor(10, &requests), motor(10, &requests),
      Arc::new(NetworkTable::new()), Arc::new(NetworkTable::new())
    );
    assert!(result.is_err());
    assert!(requests.lock().unwrap().is_empty());
  }

  #[test]
  fn test_manual_command() {
    let leader_requests = Requests::default();
    let follower_requests = Requests::default();
    let (elevator, _) = elevator(motor(10, &leader_requests), motor(11, &follower_requests));

    // Popped from the back
    let inputs = Arc::new(Mutex::new(vec![
      Some(2.0), None, Some(f64::NAN), Some(-0.3), Some(0.5), Some(0.05)
    ]));
    let i = inputs.clone();
    let cmd = elevator.manual_command(move || i.lock().unwrap().pop().flatten());
    assert!(cmd.borrow().requirements().contains("elevator"));

    let mut scheduler = CommandScheduler::new();
    scheduler.schedule(&cmd);
    for _ in 0..6 {
      scheduler.run();
    }
    scheduler.cancel(&cmd);

    assert_eq!(*leader_requests.lock().unwrap(), vec![
      ControlRequest::DutyCycle(0.0),
      ControlRequest::DutyCycle(0.5),
      ControlRequest::DutyCycle(-0.3),
      ControlRequest::DutyCycle(0.0),
      ControlRequest::DutyCycle(0.0),
      ControlRequest::DutyCycle(1.0),
      ControlRequest::DutyCycle(0.0),
    ]);
    // Only the follow request from construction
    assert_eq!(follower_requests.lock().unwrap().len(), 1);
  }

  #[test]
  fn test_sys_id_drives_leader_with_voltage() {
    let leader_requests = Requests::default();
    let follower = motor(11, &Requests::default());
    let (elevator, (_, signal_log)) = elevator(motor(10, &leader_requests), follower);
    let clock = ManualClock::new();
    let elevator = elevator.with_sys_id_clock(clock.clone());

    let cmd = elevator.sys_id_dynamic(Direction::Reverse);
    let mut scheduler = CommandScheduler::new();
    scheduler.schedule(&cmd);
    assert_eq!(signal_log.get_string(SYSID_STATE_CHANNEL).as_deref(), Some("dynamic-reverse"));

    scheduler.run();
    clock.advance(0.5);
    let quasistatic = elevator.sys_id_quasistatic(Direction::Forward);
    scheduler.schedule(&quasistatic);
    clock.advance(2.0);
    scheduler.run();
    scheduler.cancel(&quasistatic);
    assert_eq!(signal_log.get_string(SYSID_STATE_CHANNEL).as_deref(), Some("none"));

    assert_eq!(*leader_requests.lock().unwrap(), vec![
      ControlRequest::Voltage(-4.0),
      ControlRequest::Voltage(0.0),
      ControlRequest::Voltage(2.0),
      ControlRequest::Voltage(0.0),
    ]);
  }

  #[test]
  fn test_current_republished_on_read_failure() {
    let requests = Requests::default();
    let mut leader = motor(10, &requests);
    let mut reads = vec![Err(MotorError::Timeout), Ok(12.5)];
    leader.expect_torque_current().returning(move || reads.pop().unwrap_or(Err(MotorError::Timeout)));
    let mut follower = motor(11, &requests);
    follower.expect_torque_current().returning(|| Err(MotorError::DeviceNotPresent));

    let (mut elevator, (dashboard, _)) = elevator(leader, follower);
    assert_eq!(elevator.name(), "elevator");

    elevator.periodic();
    assert_eq!(dashboard.get_number(LEFT_AMPS_CHANNEL), Some(12.5));
    assert_eq!(dashboard.get_number(RIGHT_AMPS_CHANNEL), None);

    elevator.periodic();
    assert_eq!(dashboard.get_number(LEFT_AMPS_CHANNEL), Some(12.5));
    assert_eq!(dashboard.get_number(RIGHT_AMPS_CHANNEL), None);
  }
}
