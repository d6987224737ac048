use std::{cell::RefCell, collections::HashSet, rc::Rc};

use mockall::automock;

pub mod functional;
pub mod scheduler;
pub mod trigger;

pub use functional::{print, run_end, PrintCommand, RunEndCommand};
pub use scheduler::CommandScheduler;
pub use trigger::Trigger;

/// Names of the subsystems a command needs exclusive use of.
pub type Requirements = HashSet<String>;

/// Where a scheduled command is in its lifecycle. Every run goes
/// `Initializing -> Running -> Ending -> Ended`, and `end` is called exactly once, on the
/// transition into `Ending`, whichever way the run stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
  Initializing,
  Running,
  Ending { interrupted: bool },
  Ended,
}

#[automock]
pub trait Command {
  fn initialize(&mut self) -> anyhow::Result<()> {
    Ok(())
  }
  /// Called once per scheduler tick while the command is running.
  fn execute(&mut self) -> anyhow::Result<()>;
  fn is_finished(&mut self) -> bool {
    false
  }
  fn end(&mut self, interrupted: bool);

  fn requirements(&self) -> Requirements;
  fn name(&self) -> String {
    "<unnamed command>".into()
  }
  fn runs_when_disabled(&self) -> bool {
    false
  }
}

pub type CommandRef = Rc<RefCell<dyn Command>>;

pub fn command_ref<C: Command + 'static>(command: C) -> CommandRef {
  Rc::new(RefCell::new(command))
}

pub trait Subsystem {
  fn name(&self) -> String;
  /// Called once per scheduler tick, regardless of what commands are running.
  fn periodic(&mut self) { }
}

pub type SubsystemRef = Rc<RefCell<dyn Subsystem>>;

pub fn requirements(names: &[&str]) -> Requirements {
  names.iter().map(|n| n.to_string()).collect()
}
