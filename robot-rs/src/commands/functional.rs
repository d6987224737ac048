use log::info;

use super::{command_ref, Command, CommandRef, Requirements};

/// Runs `execute` every tick and `end` once when stopped. Never finishes by itself.
pub struct RunEndCommand {
  name: String,
  requirements: Requirements,
  execute: Box<dyn FnMut() -> anyhow::Result<()>>,
  end: Box<dyn FnMut()>,
}

impl RunEndCommand {
  pub fn new<E, F>(name: &str, requirements: Requirements, execute: E, end: F) -> Self
  where
    E: FnMut() -> anyhow::Result<()> + 'static,
    F: FnMut() + 'static
  {
    Self { name: name.to_owned(), requirements, execute: Box::new(execute), end: Box::new(end) }
  }
}

impl Command for RunEndCommand {
  fn execute(&mut self) -> anyhow::Result<()> {
    (self.execute)()
  }

  fn end(&mut self, _interrupted: bool) {
    (self.end)()
  }

  fn requirements(&self) -> Requirements {
    self.requirements.clone()
  }

  fn name(&self) -> String {
    self.name.clone()
  }
}

pub fn run_end<E, F>(name: &str, requirements: Requirements, execute: E, end: F) -> CommandRef
where
  E: FnMut() -> anyhow::Result<()> + 'static,
  F: FnMut() + 'static
{
  command_ref(RunEndCommand::new(name, requirements, execute, end))
}

/// Emits a message once and finishes straight away. Requires nothing.
pub struct PrintCommand {
  message: String,
  sink: Box<dyn FnMut(&str)>,
}

impl PrintCommand {
  pub fn new(message: &str) -> Self {
    Self::with_sink(message, |msg| info!("{}", msg))
  }

  pub fn with_sink<F: FnMut(&str) + 'static>(message: &str, sink: F) -> Self {
    Self { message: message.to_owned(), sink: Box::new(sink) }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl Command for PrintCommand {
  fn initialize(&mut self) -> anyhow::Result<()> {
    (self.sink)(&self.message);
    Ok(())
  }

  fn execute(&mut self) -> anyhow::Result<()> {
    Ok(())
  }

  fn is_finished(&mut self) -> bool {
    true
  }

  fn end(&mut self, _interrupted: bool) { }

  fn requirements(&self) -> Requirements {
    Requirements::new()
  }

  fn name(&self) -> String {
    "PrintCommand".into()
  }

  fn runs_when_disabled(&self) -> bool {
    true
  }
}

pub fn print(message: &str) -> CommandRef {
  command_ref(PrintCommand::new(message))
}
