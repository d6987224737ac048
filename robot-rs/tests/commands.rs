#![cfg(feature = "simulation")]

use mockall::{automock, predicate::eq, Sequence};
use robot_rs::{
  commands::{command_ref, requirements, Command, CommandScheduler, Requirements},
  input::{hid::SimHID, xbox::{buttons, Xbox}},
};

#[automock]
pub trait CommandNotifier {
  fn start(&self) -> ();
  fn tick(&self) -> ();
  fn stop(&self, interrupted: bool) -> ();
}

struct Notifying<N: CommandNotifier> {
  name: &'static str,
  requires: &'static [&'static str],
  notifier: N,
}

impl<N: CommandNotifier> Command for Notifying<N> {
  fn initialize(&mut self) -> anyhow::Result<()> {
    self.notifier.start();
    Ok(())
  }

  fn execute(&mut self) -> anyhow::Result<()> {
    self.notifier.tick();
    Ok(())
  }

  fn end(&mut self, interrupted: bool) {
    self.notifier.stop(interrupted)
  }

  fn requirements(&self) -> Requirements {
    requirements(self.requires)
  }

  fn name(&self) -> String {
    self.name.to_owned()
  }
}

#[test]
fn test_button_held() {
  let mut seq = Sequence::new();
  let mut notifier = MockCommandNotifier::new();
  notifier.expect_start().once().in_sequence(&mut seq).return_const(());
  notifier.expect_tick().times(2).in_sequence(&mut seq).return_const(());
  notifier.expect_stop().with(eq(true)).once().in_sequence(&mut seq).return_const(());

  let hid = SimHID::new(0);
  let xbox = Xbox::new(hid.clone());
  let mut scheduler = CommandScheduler::new();
  let cmd = command_ref(Notifying { name: "hold", requires: &["elevator"], notifier });
  xbox.a_trigger().while_true(&mut scheduler, cmd.clone());

  scheduler.run();
  hid.set_button(buttons::A, true);
  scheduler.run();
  scheduler.run();
  assert!(scheduler.is_scheduled(&cmd));

  hid.set_button(buttons::A, false);
  scheduler.run();
  assert!(!scheduler.is_scheduled(&cmd));
}

#[test]
fn test_shared_requirements_interrupt() {
  let mut drive = MockCommandNotifier::new();
  drive.expect_start().once().return_const(());
  drive.expect_tick().once().return_const(());
  drive.expect_stop().with(eq(true)).once().return_const(());

  let mut lift = MockCommandNotifier::new();
  lift.expect_start().once().return_const(());
  lift.expect_tick().once().return_const(());
  lift.expect_stop().with(eq(true)).once().return_const(());

  let mut climb = MockCommandNotifier::new();
  climb.expect_start().once().return_const(());
  climb.expect_tick().times(3).return_const(());
  climb.expect_stop().with(eq(true)).once().return_const(());

  let drive = command_ref(Notifying { name: "drive", requires: &["drivetrain"], notifier: drive });
  let lift = command_ref(Notifying { name: "lift", requires: &["elevator"], notifier: lift });
  let climb = command_ref(Notifying { name: "climb", requires: &["drivetrain", "elevator"], notifier: climb });

  let mut scheduler = CommandScheduler::new();
  assert!(scheduler.schedule(&drive));
  assert!(scheduler.schedule(&lift));
  scheduler.run();

  assert!(scheduler.schedule(&climb));
  assert!(!scheduler.is_scheduled(&drive));
  assert!(!scheduler.is_scheduled(&lift));
  for _ in 0..3 {
    scheduler.run();
  }

  scheduler.cancel_all();
  assert!(scheduler.requiring("elevator").is_none());
}
