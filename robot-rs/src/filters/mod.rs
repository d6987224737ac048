use std::{marker::PhantomData, ops::Neg};

pub mod deadband;

pub use deadband::{apply_deadband, Deadband};

pub trait Filter<I> {
  type Output;

  fn calculate(&mut self, input: I) -> Self::Output;
  fn reset(&mut self) { }
}

#[derive(Clone, Debug)]
pub struct InvertingFilter<T> {
  phantom: PhantomData<T>
}

impl<T> InvertingFilter<T> {
  pub fn new() -> Self { Self { phantom: PhantomData } }
}

impl<T> Default for InvertingFilter<T> {
  fn default() -> Self { Self::new() }
}

impl<T: Neg> Filter<T> for InvertingFilter<T> {
  type Output = <T as Neg>::Output;

  fn calculate(&mut self, input: T) -> Self::Output {
    -input
  }
}

#[derive(Clone, Debug)]
pub struct ClampingFilter<T> {
  pub min: T,
  pub max: T
}

impl<T> ClampingFilter<T> {
  pub fn new(min: T, max: T) -> Self { Self { min, max } }
}

impl<T: PartialOrd<T> + Copy> Filter<T> for ClampingFilter<T> {
  type Output = T;

  fn calculate(&mut self, input: T) -> Self::Output {
    match input {
      input if input < self.min => self.min,
      input if input > self.max => self.max,
      input => input
    }
  }
}

#[derive(Clone, Debug)]
pub struct ChainedFilters<A, B> {
  pub a: A,
  pub b: B,
}

impl<A, B> ChainedFilters<A, B> {
  pub fn new(a: A, b: B) -> Self {
    Self { a, b }
  }
}

impl<A, B, I> Filter<I> for ChainedFilters<A, B>
where
  A: Filter<I>,
  B: Filter<<A as Filter<I>>::Output>
{
  type Output = B::Output;

  fn calculate(&mut self, input: I) -> Self::Output {
    self.b.calculate(self.a.calculate(input))
  }

  fn reset(&mut self) {
    self.a.reset();
    self.b.reset();
  }
}

pub trait FilterExt<I> : Filter<I> + Sized {
  fn then<Other: Filter<Self::Output>>(self, other: Other) -> ChainedFilters<Self, Other> {
    ChainedFilters::new(self, other)
  }
}

impl<T: Filter<I>, I> FilterExt<I> for T {}
