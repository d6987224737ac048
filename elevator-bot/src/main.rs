use std::sync::Arc;

use elevator_bot::{Robot, RobotConfig, RobotIo};
use log::info;
use robot_rs::{
  actuators::sim::{SimCanBus, SimTalonFX},
  ds::{sim::SimDriverStation, ControlMode},
  input::hid::SimHID,
  robot_main,
  start::{run_periodic, RobotResult, RobotState},
  telemetry::{LogSink, NetworkTable},
};

async fn robot(state: RobotState) -> RobotResult {
  let config = RobotConfig::default();
  let bus = SimCanBus::new();

  let io = RobotIo {
    elevator_left: SimTalonFX::new(&bus, config.elevator.leader_id)?,
    elevator_right: SimTalonFX::new(&bus, config.elevator.follower_id)?,
    driver: SimHID::new(config.driver_port),
    dashboard: Arc::new(NetworkTable::new()),
    signal_log: Arc::new(LogSink::default()),
    messages: None,
  };
  let mut robot = Robot::new(&config, io)?;

  let ds = SimDriverStation::new();
  ds.set_mode(ControlMode::Teleop);
  info!("Driver station simulated in {}", ControlMode::Teleop);

  run_periodic(&state, config.period, || robot.periodic(&ds.current())).await;
  Ok(())
}

robot_main!(async robot);
