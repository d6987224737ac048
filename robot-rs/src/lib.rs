pub mod actuators;
pub mod commands;
pub mod filters;
pub mod input;
pub mod sensors;
pub mod sysid;
pub mod telemetry;

pub mod ds;
pub mod start;
pub mod time;

pub use commands::{Command, CommandRef, CommandScheduler, Subsystem, SubsystemRef, Trigger};

pub enum RuntimeType {
  Native,
  Simulation
}

#[cfg(feature = "simulation")]
#[macro_export]
macro_rules! runtime_type {
  () => { $crate::RuntimeType::Simulation };
}

#[cfg(not(feature = "simulation"))]
#[macro_export]
macro_rules! runtime_type {
  () => { $crate::RuntimeType::Native };
}
