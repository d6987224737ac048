use crate::sensors::Sensor;

pub trait HIDDevice {
  type Button: Sensor<bool>;
  type Axis: Sensor<f64>;

  // Not Option<>s: the device may connect and disconnect while the program runs, so failures
  // are deferred to the Sensor returning None
  fn button(&self, index: usize) -> Self::Button;
  fn axis(&self, index: usize) -> Self::Axis;

  fn port(&self) -> usize;
  fn name(&self) -> Option<String>;
}

pub const MAX_AXES: usize = 12;
pub const MAX_BUTTONS: usize = 32;

#[cfg(feature = "simulation")]
mod sim;
#[cfg(feature = "simulation")]
pub use sim::{SimHID, SimHIDAxis, SimHIDButton};
