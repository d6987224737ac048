use num_traits::Float;

use super::Filter;

/// Zero out any input whose magnitude is strictly below `threshold`. Everything else passes
/// through untouched; values outside the band are not rescaled.
pub fn apply_deadband<T: Float>(value: T, threshold: T) -> T {
  if value.abs() < threshold {
    T::zero()
  } else {
    value
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Deadband<T> {
  pub threshold: T
}

impl<T: Float> Deadband<T> {
  pub fn new(threshold: T) -> Self {
    Self { threshold: threshold.abs() }
  }
}

impl<T: Float> Filter<T> for Deadband<T> {
  type Output = T;

  fn calculate(&mut self, input: T) -> T {
    apply_deadband(input, self.threshold)
  }
}
