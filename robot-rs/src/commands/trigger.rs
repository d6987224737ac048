use crate::sensors::Sensor;

use super::{CommandRef, CommandScheduler};

/// A boolean condition that schedules or cancels commands on its edges.
pub struct Trigger {
  condition: Box<dyn FnMut() -> bool>,
}

impl Trigger {
  pub fn new<F: FnMut() -> bool + 'static>(condition: F) -> Self {
    Self { condition: Box::new(condition) }
  }

  /// A sensor that can't be read counts as not pressed.
  pub fn from_sensor<S: Sensor<bool> + 'static>(sensor: S) -> Self {
    Self::new(move || sensor.get_sensor_value().unwrap_or(false))
  }

  pub fn get(&mut self) -> bool {
    (self.condition)()
  }

  /// Schedule `command` when the condition becomes true, and cancel it when it becomes false.
  pub fn while_true(self, scheduler: &mut CommandScheduler, command: CommandRef) {
    scheduler.bind(Binding::new(self, BindingKind::WhileTrue, command))
  }

  /// Schedule `command` when the condition becomes true.
  pub fn on_true(self, scheduler: &mut CommandScheduler, command: CommandRef) {
    scheduler.bind(Binding::new(self, BindingKind::OnTrue, command))
  }

  /// Schedule `command` when the condition becomes false.
  pub fn on_false(self, scheduler: &mut CommandScheduler, command: CommandRef) {
    scheduler.bind(Binding::new(self, BindingKind::OnFalse, command))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
  WhileTrue,
  OnTrue,
  OnFalse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
  Schedule,
  Cancel,
}

pub struct Binding {
  trigger: Trigger,
  kind: BindingKind,
  command: CommandRef,
  last: bool,
}

impl Binding {
  pub fn new(trigger: Trigger, kind: BindingKind, command: CommandRef) -> Self {
    Self { trigger, kind, command, last: false }
  }

  pub fn command(&self) -> &CommandRef {
    &self.command
  }

  /// Sample the trigger and work out what, if anything, should happen to the bound command.
  pub fn poll(&mut self) -> Option<BindingAction> {
    let value = self.trigger.get();
    let action = match (self.kind, value, self.last) {
      (BindingKind::WhileTrue, true, false) => Some(BindingAction::Schedule),
      (BindingKind::WhileTrue, false, true) => Some(BindingAction::Cancel),
      (BindingKind::OnTrue, true, false) => Some(BindingAction::Schedule),
      (BindingKind::OnFalse, false, true) => Some(BindingAction::Schedule),
      _ => None
    };
    self.last = value;
    action
  }
}
