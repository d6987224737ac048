use std::{collections::BTreeMap, rc::Rc};

use anyhow::bail;
use log::{debug, warn};

use super::{trigger::{Binding, BindingAction}, CommandRef, CommandState, Requirements, SubsystemRef};

struct ScheduledCommand {
  command: CommandRef,
  state: CommandState,
  requirements: Requirements,
  name: String,
}

impl ScheduledCommand {
  fn new(command: CommandRef) -> Self {
    let (requirements, name) = {
      let borrowed = command.borrow();
      (borrowed.requirements(), borrowed.name())
    };
    Self { command, state: CommandState::Initializing, requirements, name }
  }

  fn is(&self, command: &CommandRef) -> bool {
    Rc::ptr_eq(&self.command, command)
  }

  /// Returns false if the command failed to start, in which case it has already been ended.
  fn initialize(&mut self) -> bool {
    let result = self.command.borrow_mut().initialize();
    match result {
      Ok(()) => {
        self.state = CommandState::Running;
        true
      },
      Err(e) => {
        warn!("Command {} failed to initialize: {:#}", self.name, e);
        self.finish(true);
        false
      }
    }
  }

  /// Ends the command if it hasn't been already. Safe to call more than once.
  fn finish(&mut self, interrupted: bool) {
    if let CommandState::Ending { .. } | CommandState::Ended = self.state {
      return;
    }
    self.state = CommandState::Ending { interrupted };
    self.command.borrow_mut().end(interrupted);
    self.state = CommandState::Ended;
    debug!("Command {} ended (interrupted: {})", self.name, interrupted);
  }
}

/// Runs commands against subsystems, one tick at a time.
///
/// At most one scheduled command may require a given subsystem. Scheduling a command interrupts
/// whichever commands currently hold its requirements. A subsystem with nothing holding it gets
/// its default command (if any) at the end of each tick.
pub struct CommandScheduler {
  subsystems: Vec<(String, SubsystemRef)>,
  defaults: BTreeMap<String, CommandRef>,
  scheduled: Vec<ScheduledCommand>,
  bindings: Vec<Binding>,
  enabled: bool,
}

impl CommandScheduler {
  pub fn new() -> Self {
    Self {
      subsystems: vec![],
      defaults: BTreeMap::new(),
      scheduled: vec![],
      bindings: vec![],
      enabled: true,
    }
  }

  pub fn register_subsystem(&mut self, subsystem: SubsystemRef) -> anyhow::Result<()> {
    let name = subsystem.borrow().name();
    if self.subsystems.iter().any(|(n, _)| *n == name) {
      bail!("Subsystem {} is already registered", name);
    }
    debug!("Registered subsystem {}", name);
    self.subsystems.push((name, subsystem));
    Ok(())
  }

  pub fn set_default_command(&mut self, subsystem: &str, command: CommandRef) -> anyhow::Result<()> {
    let (reqs, name) = {
      let borrowed = command.borrow();
      (borrowed.requirements(), borrowed.name())
    };
    if !reqs.contains(subsystem) {
      bail!("Default command {} for {} must require {}", name, subsystem, subsystem);
    }

    if let Some(old) = self.defaults.insert(subsystem.to_owned(), command) {
      self.cancel(&old);
    }
    Ok(())
  }

  pub fn default_command(&self, subsystem: &str) -> Option<CommandRef> {
    self.defaults.get(subsystem).cloned()
  }

  pub(crate) fn bind(&mut self, binding: Binding) {
    debug!("Bound {}", binding.command().borrow().name());
    self.bindings.push(binding);
  }

  /// Schedule a command, interrupting anything that holds one of its requirements.
  /// Returns whether the command is running after the call.
  pub fn schedule(&mut self, command: &CommandRef) -> bool {
    if self.is_scheduled(command) {
      return true;
    }

    let mut entry = ScheduledCommand::new(command.clone());
    if !self.enabled && !command.borrow().runs_when_disabled() {
      warn!("Refusing to schedule {} while disabled", entry.name);
      return false;
    }

    let reqs = entry.requirements.clone();
    self.scheduled.retain_mut(|other| {
      if other.requirements.is_disjoint(&reqs) {
        true
      } else {
        debug!("{} interrupted by {}", other.name, entry.name);
        other.finish(true);
        false
      }
    });

    debug!("Scheduled {}", entry.name);
    if entry.initialize() {
      self.scheduled.push(entry);
      true
    } else {
      false
    }
  }

  pub fn cancel(&mut self, command: &CommandRef) {
    self.scheduled.retain_mut(|sc| {
      if sc.is(command) {
        sc.finish(true);
        false
      } else {
        true
      }
    });
  }

  pub fn cancel_all(&mut self) {
    for mut sc in self.scheduled.drain(..) {
      sc.finish(true);
    }
  }

  pub fn is_scheduled(&self, command: &CommandRef) -> bool {
    self.scheduled.iter().any(|sc| sc.is(command))
  }

  pub fn state(&self, command: &CommandRef) -> Option<CommandState> {
    self.scheduled.iter().find(|sc| sc.is(command)).map(|sc| sc.state)
  }

  /// The scheduled command currently holding `subsystem`.
  pub fn requiring(&self, subsystem: &str) -> Option<CommandRef> {
    self.scheduled.iter().find(|sc| sc.requirements.contains(subsystem)).map(|sc| sc.command.clone())
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Disabling cancels every command that can't run while the robot is disabled.
  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
    if !enabled {
      self.scheduled.retain_mut(|sc| {
        if sc.command.borrow().runs_when_disabled() {
          true
        } else {
          sc.finish(true);
          false
        }
      });
    }
  }

  /// One scheduler tick: subsystem periodics, trigger bindings, running commands, then defaults.
  pub fn run(&mut self) {
    for (_, subsystem) in &self.subsystems {
      subsystem.borrow_mut().periodic();
    }

    let actions: Vec<(BindingAction, CommandRef)> = self.bindings.iter_mut()
      .filter_map(|b| b.poll().map(|action| (action, b.command().clone())))
      .collect();

    for (action, command) in actions {
      match action {
        BindingAction::Schedule => { self.schedule(&command); },
        BindingAction::Cancel => self.cancel(&command),
      }
    }

    self.scheduled.retain_mut(|sc| {
      let result = sc.command.borrow_mut().execute();
      if let Err(e) = result {
        warn!("Command {} failed this tick: {:#}", sc.name, e);
      }

      if sc.command.borrow_mut().is_finished() {
        sc.finish(false);
        false
      } else {
        true
      }
    });

    if self.enabled {
      let idle: Vec<CommandRef> = self.defaults.iter()
        .filter(|(subsystem, _)| self.requiring(subsystem).is_none())
        .map(|(_, command)| command.clone())
        .collect();

      for command in idle {
        self.schedule(&command);
      }
    }
  }
}

impl Default for CommandScheduler {
  fn default() -> Self {
    Self::new()
  }
}
