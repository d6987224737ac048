use std::{cell::RefCell, rc::Rc};

use crate::sensors::Sensor;

use super::{HIDDevice, MAX_AXES, MAX_BUTTONS};

#[derive(Debug, Clone)]
struct SimHIDState {
  connected: bool,
  axes: [f64; MAX_AXES],
  buttons: u32,
}

/// A joystick whose inputs are set by the program (tests, or a simulation GUI) rather than read
/// from a driver station. Clones share the same inputs.
#[derive(Debug, Clone)]
pub struct SimHID {
  port: usize,
  state: Rc<RefCell<SimHIDState>>,
}

impl SimHID {
  pub fn new(port: usize) -> Self {
    Self {
      port,
      state: Rc::new(RefCell::new(SimHIDState { connected: true, axes: [0.0; MAX_AXES], buttons: 0 }))
    }
  }

  pub fn set_connected(&self, connected: bool) {
    self.state.borrow_mut().connected = connected;
  }

  pub fn set_axis(&self, index: usize, value: f64) {
    if let Some(axis) = self.state.borrow_mut().axes.get_mut(index) {
      *axis = value.clamp(-1.0, 1.0);
    }
  }

  /// Buttons are 1-indexed, matching the driver station.
  pub fn set_button(&self, index: usize, pressed: bool) {
    if index < 1 || index > MAX_BUTTONS {
      return;
    }
    let mask = 1u32 << (index - 1);
    let mut state = self.state.borrow_mut();
    if pressed {
      state.buttons |= mask;
    } else {
      state.buttons &= !mask;
    }
  }
}

#[derive(Debug, Clone)]
pub struct SimHIDButton {
  state: Rc<RefCell<SimHIDState>>,
  index: usize,
}

impl Sensor<bool> for SimHIDButton {
  fn get_sensor_value(&self) -> Option<bool> {
    let state = self.state.borrow();
    if !state.connected || self.index < 1 || self.index > MAX_BUTTONS {
      None
    } else {
      Some(state.buttons & (1 << (self.index - 1)) != 0)
    }
  }
}

#[derive(Debug, Clone)]
pub struct SimHIDAxis {
  state: Rc<RefCell<SimHIDState>>,
  index: usize,
}

impl Sensor<f64> for SimHIDAxis {
  fn get_sensor_value(&self) -> Option<f64> {
    let state = self.state.borrow();
    if !state.connected {
      None
    } else {
      state.axes.get(self.index).copied()
    }
  }
}

impl HIDDevice for SimHID {
  type Button = SimHIDButton;
  type Axis = SimHIDAxis;

  fn button(&self, index: usize) -> Self::Button {
    SimHIDButton { state: self.state.clone(), index }
  }

  fn axis(&self, index: usize) -> Self::Axis {
    SimHIDAxis { state: self.state.clone(), index }
  }

  fn port(&self) -> usize {
    self.port
  }

  fn name(&self) -> Option<String> {
    if self.state.borrow().connected {
      Some(format!("Simulated HID {}", self.port))
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::{input::hid::HIDDevice, sensors::Sensor};
  use super::SimHID;

  #[test]
  fn test_buttons() {
    let hid = SimHID::new(0);
    let a = hid.button(1);
    let b = hid.button(2);
    assert_eq!(a.get_sensor_value(), Some(false));

    hid.set_button(1, true);
    assert_eq!(a.get_sensor_value(), Some(true));
    assert_eq!(b.get_sensor_value(), Some(false));

    hid.set_button(1, false);
    assert_eq!(a.get_sensor_value(), Some(false));
    assert_eq!(hid.button(0).get_sensor_value(), None);
    assert_eq!(hid.button(33).get_sensor_value(), None);
  }

  #[test]
  fn test_axes_and_disconnect() {
    let hid = SimHID::new(2);
    let axis = hid.axis(1);
    hid.set_axis(1, -0.4);
    assert_eq!(axis.get_sensor_value(), Some(-0.4));
    hid.set_axis(1, 7.0);
    assert_eq!(axis.get_sensor_value(), Some(1.0));
    assert_eq!(hid.axis(40).get_sensor_value(), None);

    hid.set_connected(false);
    assert_eq!(axis.get_sensor_value(), None);
    assert_eq!(hid.name(), None);
  }
}
