use std::{error::Error, sync::{atomic::{AtomicBool, Ordering}, Arc}, time::Duration};

use log::{error, info, warn};
use tokio::time::MissedTickBehavior;

pub type RobotResult = Result<(), Box<dyn Error>>;

/// Main loop period used by most robot programs.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(20);

#[derive(Clone, Debug)]
pub struct RobotState {
  inner: Arc<AtomicBool>
}

impl RobotState {
  pub fn new() -> Self {
    Self { inner: Arc::new(AtomicBool::new(true)) }
  }

  pub fn running(&self) -> bool {
    self.inner.load(Ordering::Relaxed)
  }

  pub fn stop(&self) {
    self.inner.store(false, Ordering::Relaxed)
  }
}

impl Default for RobotState {
  fn default() -> Self {
    Self::new()
  }
}

pub fn log_init() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .target(env_logger::Target::Stdout)
    .try_init()
    .ok();
}

/// Initialise logging, then run the user program and report how it exited.
pub fn init_all<F: FnOnce(RobotState) -> RobotResult>(f: F) -> RobotResult {
  log_init();

  info!("**** Running Robot ({}) ****", match crate::runtime_type!() {
    crate::RuntimeType::Native => "native",
    crate::RuntimeType::Simulation => "simulation",
  });

  match f(RobotState::new()) {
    Ok(()) => {
      warn!("Robot Exited Gracefully");
      Ok(())
    },
    Err(e) => {
      error!("Robot Error: {}", e);
      Err(e)
    }
  }
}

/// Generate `main` for a robot program. The async form runs the program on a single-threaded
/// tokio runtime, since commands and subsystems are shared through `Rc`.
#[macro_export]
macro_rules! robot_main {
  ($func:ident) => {
    pub fn main() -> $crate::start::RobotResult {
      $crate::start::init_all($func)
    }
  };
  (async $func:ident) => {
    pub fn main() -> $crate::start::RobotResult {
      $crate::start::init_all(async_main)
    }

    #[tokio::main(flavor = "current_thread")]
    async fn async_main(state: $crate::start::RobotState) -> $crate::start::RobotResult {
      $func(state).await
    }
  };
}

/// Call `tick` once per `period` until the robot stops running. A tick that overruns its
/// period makes the loop skip the missed ticks rather than run them back to back.
pub async fn run_periodic<F: FnMut()>(state: &RobotState, period: Duration, mut tick: F) {
  let mut interval = tokio::time::interval(period);
  interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

  while state.running() {
    interval.tick().await;
    tick();
  }
}
