use std::ops::Neg;

pub trait Sensor<U> {
  /// Latest reading, or `None` if the device couldn't be read.
  fn get_sensor_value(&self) -> Option<U>;
}

impl<'a, T: Sensor<U>, U> Sensor<U> for &'a T {
  fn get_sensor_value(&self) -> Option<U> {
    (**self).get_sensor_value()
  }
}

#[derive(Clone, Debug)]
pub struct InvertedSensor<T>(pub T);

impl<T> From<T> for InvertedSensor<T> {
  fn from(value: T) -> Self {
    Self(value)
  }
}

impl<U: Neg<Output = U>, T: Sensor<U>> Sensor<U> for InvertedSensor<T> {
  #[inline(always)]
  fn get_sensor_value(&self) -> Option<U> {
    self.0.get_sensor_value().map(|x| -x)
  }
}

pub trait SensorExt<U> : Sensor<U> + Sized {
  fn invert(self) -> InvertedSensor<Self> {
    InvertedSensor(self)
  }
}

impl<T: Sensor<U>, U> SensorExt<U> for T {}
