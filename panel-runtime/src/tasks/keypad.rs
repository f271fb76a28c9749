//! Keypad task
//!
//! Turns console lines into key edges and inbound messages for the
//! controller. Each key is sent as a press followed by a release, the same
//! pair a debounced matrix scan produces.

use tracing::debug;

use panel_core::RestartPolicy;
use panel_protocol::KeyEvent;

use crate::channels::{Channels, Command, ConsoleInput};
use crate::tasks::supervisor::{supervise, TaskError};
use crate::tasks::Exit;

async fn keypad(channels: &'static Channels) -> Result<(), TaskError> {
    loop {
        match channels.console.receive().await {
            ConsoleInput::Keys(keys) => {
                for label in keys {
                    debug!("key {}", label.as_char());
                    channels.commands.send(Command::Key(KeyEvent::press(label))).await;
                    channels.commands.send(Command::Key(KeyEvent::release(label))).await;
                }
            }
            ConsoleInput::Post { line_one, line_two } => {
                channels.commands.send(Command::Post { line_one, line_two }).await;
            }
            ConsoleInput::Quit => return Ok(()),
            ConsoleInput::ReadFailed => return Err(TaskError::Input),
        }
    }
}

/// Keypad task - forwards console input to the controller until `quit`
pub async fn keypad_task(channels: &'static Channels, policy: RestartPolicy) -> Exit {
    match supervise("Keypad", policy, || keypad(channels)).await {
        Ok(()) => Exit::Requested,
        Err(_) => Exit::Fatal("keypad"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use panel_protocol::ButtonLabel;
    use static_cell::StaticCell;

    #[test]
    fn test_keys_then_quit() {
        static CHANNELS: StaticCell<Channels> = StaticCell::new();
        let channels: &'static Channels = CHANNELS.init(Channels::new());
        let keys = heapless::Vec::from_slice(&[ButtonLabel::A, ButtonLabel::HASH]).unwrap();
        channels.console.try_send(ConsoleInput::Keys(keys)).unwrap();
        channels.console.try_send(ConsoleInput::Quit).unwrap();

        assert_eq!(block_on(keypad(channels)), Ok(()));

        let expected = [
            KeyEvent::press(ButtonLabel::A),
            KeyEvent::release(ButtonLabel::A),
            KeyEvent::press(ButtonLabel::HASH),
            KeyEvent::release(ButtonLabel::HASH),
        ];
        for event in expected {
            assert_eq!(channels.commands.try_receive().unwrap(), Command::Key(event));
        }
        assert!(channels.commands.try_receive().is_err());
    }

    #[test]
    fn test_quit_ends_supervised_task() {
        static CHANNELS: StaticCell<Channels> = StaticCell::new();
        let channels: &'static Channels = CHANNELS.init(Channels::new());
        channels.console.try_send(ConsoleInput::Quit).unwrap();
        let policy = RestartPolicy::new(3, 30_000);
        assert_eq!(block_on(keypad_task(channels, policy)), Exit::Requested);
    }

    #[test]
    fn test_read_failure_is_reported() {
        static CHANNELS: StaticCell<Channels> = StaticCell::new();
        let channels: &'static Channels = CHANNELS.init(Channels::new());
        let post = ConsoleInput::Post {
            line_one: "Hi".into(),
            line_two: String::new(),
        };
        channels.console.try_send(post).unwrap();
        channels.console.try_send(ConsoleInput::ReadFailed).unwrap();

        assert_eq!(block_on(keypad(channels)), Err(TaskError::Input));
        assert!(matches!(
            channels.commands.try_receive().unwrap(),
            Command::Post { .. }
        ));
    }
}
