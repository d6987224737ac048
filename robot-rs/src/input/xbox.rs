use crate::commands::Trigger;

use super::hid::HIDDevice;
#[cfg(feature = "simulation")]
use super::hid::SimHID;

pub trait XboxController {
  type HID: HIDDevice;

  fn inner(&self) -> &Self::HID;

  fn left_x(&self) -> <Self::HID as HIDDevice>::Axis;
  fn left_y(&self) -> <Self::HID as HIDDevice>::Axis;
  fn left_trigger(&self) -> <Self::HID as HIDDevice>::Axis;
  fn right_trigger(&self) -> <Self::HID as HIDDevice>::Axis;
  fn right_x(&self) -> <Self::HID as HIDDevice>::Axis;
  fn right_y(&self) -> <Self::HID as HIDDevice>::Axis;

  fn a(&self) -> <Self::HID as HIDDevice>::Button;
  fn b(&self) -> <Self::HID as HIDDevice>::Button;
  fn x(&self) -> <Self::HID as HIDDevice>::Button;
  fn y(&self) -> <Self::HID as HIDDevice>::Button;
  fn left_bumper(&self) -> <Self::HID as HIDDevice>::Button;
  fn right_bumper(&self) -> <Self::HID as HIDDevice>::Button;
  fn back(&self) -> <Self::HID as HIDDevice>::Button;
  fn start(&self) -> <Self::HID as HIDDevice>::Button;
}

/// Xbox button and axis layout over any HID.
#[derive(Debug, Clone)]
pub struct Xbox<HID: HIDDevice>(HID);

impl<HID: HIDDevice> From<HID> for Xbox<HID> {
  fn from(value: HID) -> Self {
    Xbox(value)
  }
}

#[cfg(feature = "simulation")]
impl Xbox<SimHID> {
  pub fn simulated(port: usize) -> Self {
    Self::new(SimHID::new(port))
  }
}

impl<HID: HIDDevice> Xbox<HID> {
  pub fn new(hid: HID) -> Self {
    Xbox(hid)
  }
}

impl<HID: HIDDevice> Xbox<HID>
where
  HID::Button: 'static
{
  pub fn a_trigger(&self) -> Trigger { Trigger::from_sensor(self.a()) }
  pub fn b_trigger(&self) -> Trigger { Trigger::from_sensor(self.b()) }
  pub fn x_trigger(&self) -> Trigger { Trigger::from_sensor(self.x()) }
  pub fn y_trigger(&self) -> Trigger { Trigger::from_sensor(self.y()) }
}

pub mod axes {
  pub const LEFT_X: usize = 0;
  pub const LEFT_Y: usize = 1;
  pub const LEFT_TRIGGER: usize = 2;
  pub const RIGHT_TRIGGER: usize = 3;
  pub const RIGHT_X: usize = 4;
  pub const RIGHT_Y: usize = 5;
}

pub mod buttons {
  pub const A: usize = 1;
  pub const B: usize = 2;
  pub const X: usize = 3;
  pub const Y: usize = 4;
  pub const LEFT_BUMPER: usize = 5;
  pub const RIGHT_BUMPER: usize = 6;
  pub const BACK: usize = 7;
  pub const START: usize = 8;
}

impl<HID: HIDDevice> XboxController for Xbox<HID> {
  type HID = HID;

  fn inner(&self) -> &HID { &self.0 }

  fn left_x(&self) -> HID::Axis { self.0.axis(axes::LEFT_X) }
  fn left_y(&self) -> HID::Axis { self.0.axis(axes::LEFT_Y) }
  fn left_trigger(&self) -> HID::Axis { self.0.axis(axes::LEFT_TRIGGER) }
  fn right_trigger(&self) -> HID::Axis { self.0.axis(axes::RIGHT_TRIGGER) }
  fn right_x(&self) -> HID::Axis { self.0.axis(axes::RIGHT_X) }
  fn right_y(&self) -> HID::Axis { self.0.axis(axes::RIGHT_Y) }

  fn a(&self) -> HID::Button { self.0.button(buttons::A) }
  fn b(&self) -> HID::Button { self.0.button(buttons::B) }
  fn x(&self) -> HID::Button { self.0.button(buttons::X) }
  fn y(&self) -> HID::Button { self.0.button(buttons::Y) }
  fn left_bumper(&self) -> HID::Button { self.0.button(buttons::LEFT_BUMPER) }
  fn right_bumper(&self) -> HID::Button { self.0.button(buttons::RIGHT_BUMPER) }
  fn back(&self) -> HID::Button { self.0.button(buttons::BACK) }
  fn start(&self) -> HID::Button { self.0.button(buttons::START) }
}
