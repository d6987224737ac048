pub mod config;
pub mod constants;
pub mod robot;
pub mod robot_container;
pub mod subsystems;

pub use config::{ElevatorConfig, RobotConfig};
pub use robot::Robot;
pub use robot_container::{RobotContainer, RobotIo};
