pub mod hid;
pub mod xbox;
