use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::action::{resolve, Action};
use crate::event::{HostEvent, KeyInput};
use crate::state::CommandBuffer;

/// What the interpreter made of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours: the page handles the key as usual.
    Ignored,
    /// Digit added to the repeat count.
    Buffered,
    Dispatch { action: Action, count: usize },
}

impl KeyOutcome {
    /// Whether the host should suppress the key's default page behaviour.
    pub fn prevent_default(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

/// Turns key presses into `(action, count)` pairs.
///
/// Idle until a digit arrives, then accumulating until a bound key is
/// pressed, the count expires, or the interpreter is detached.
pub struct CommandInterpreter {
    buffer: CommandBuffer,
    attached: bool,
    count_timeout: Duration,
    events: mpsc::WeakUnboundedSender<HostEvent>,
}

impl CommandInterpreter {
    pub fn new(count_timeout: Duration, events: mpsc::WeakUnboundedSender<HostEvent>) -> Self {
        Self {
            buffer: CommandBuffer::new(),
            attached: false,
            count_timeout,
            events,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn pending_count(&self) -> &str {
        self.buffer.digits()
    }

    /// Start listening. Attaching again just resets the count.
    pub fn attach(&mut self) {
        if self.attached {
            debug!("key listener already attached, resetting count");
        } else {
            debug!("key listener attached");
        }
        self.buffer.reset();
        self.attached = true;
    }

    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.buffer.reset();
        self.attached = false;
        debug!("key listener detached");
    }

    pub fn handle_key(&mut self, input: &KeyInput) -> KeyOutcome {
        if !self.attached || input.target.is_editable() || input.modifiers.any() {
            return KeyOutcome::Ignored;
        }

        if let Some(digit) = input.digit() {
            if !self.buffer.push_digit(digit) {
                return KeyOutcome::Ignored;
            }
            self.buffer.arm(self.count_timeout, &self.events);
            return KeyOutcome::Buffered;
        }

        let Some(action) = resolve(&input.key) else {
            return KeyOutcome::Ignored;
        };

        let count = self.buffer.take_count();
        debug!(key = %input.key, ?action, count, "executing command");
        KeyOutcome::Dispatch { action, count }
    }

    /// Handle a fired count timer.
    pub fn on_count_expired(&mut self, generation: u64) {
        if self.buffer.expire(generation) {
            debug!("repeat count expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyTarget, Modifiers};

    const TIMEOUT: Duration = Duration::from_millis(1000);

    type Queue = (
        mpsc::UnboundedSender<HostEvent>,
        mpsc::UnboundedReceiver<HostEvent>,
    );

    fn attached() -> (CommandInterpreter, Queue) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut interp = CommandInterpreter::new(TIMEOUT, tx.downgrade());
        interp.attach();
        (interp, (tx, rx))
    }

    fn press(interp: &mut CommandInterpreter, key: &str) -> KeyOutcome {
        interp.handle_key(&KeyInput::new(key))
    }

    #[tokio::test]
    async fn test_bare_command_uses_count_one() {
        let (mut interp, _queue) = attached();
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_digits_build_count() {
        let (mut interp, _queue) = attached();
        assert_eq!(press(&mut interp, "1"), KeyOutcome::Buffered);
        assert_eq!(press(&mut interp, "2"), KeyOutcome::Buffered);
        assert_eq!(interp.pending_count(), "12");
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 12
            }
        );
        assert_eq!(interp.pending_count(), "");
    }

    #[tokio::test]
    async fn test_leading_zero_is_inert() {
        let (mut interp, _queue) = attached();
        assert_eq!(press(&mut interp, "0"), KeyOutcome::Ignored);
        assert_eq!(interp.pending_count(), "");

        press(&mut interp, "5");
        assert_eq!(press(&mut interp, "0"), KeyOutcome::Buffered);
        assert_eq!(interp.pending_count(), "50");
    }

    #[tokio::test]
    async fn test_unknown_key_keeps_count() {
        let (mut interp, _queue) = attached();
        press(&mut interp, "3");
        let outcome = press(&mut interp, "x");
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(!outcome.prevent_default());
        assert_eq!(interp.pending_count(), "3");
        assert_eq!(
            press(&mut interp, "k"),
            KeyOutcome::Dispatch {
                action: Action::MoveUp,
                count: 3
            }
        );
    }

    #[tokio::test]
    async fn test_editable_focus_is_ignored() {
        let (mut interp, _queue) = attached();
        press(&mut interp, "2");
        for target in [
            KeyTarget::TextInput,
            KeyTarget::TextArea,
            KeyTarget::ContentEditable,
        ] {
            let input = KeyInput::new("j").with_target(target);
            assert_eq!(interp.handle_key(&input), KeyOutcome::Ignored);
            let input = KeyInput::new("4").with_target(target);
            assert_eq!(interp.handle_key(&input), KeyOutcome::Ignored);
        }
        assert_eq!(interp.pending_count(), "2");
    }

    #[tokio::test]
    async fn test_modified_keys_are_ignored() {
        let (mut interp, _queue) = attached();
        let reload = KeyInput::new("r").with_modifiers(Modifiers {
            meta: true,
            ..Modifiers::default()
        });
        assert_eq!(interp.handle_key(&reload), KeyOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_detached_ignores_everything() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut interp = CommandInterpreter::new(TIMEOUT, tx.downgrade());
        assert_eq!(press(&mut interp, "j"), KeyOutcome::Ignored);
        assert_eq!(press(&mut interp, "5"), KeyOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_detach_resets_count() {
        let (mut interp, _queue) = attached();
        press(&mut interp, "7");
        interp.detach();
        assert!(!interp.is_attached());
        assert_eq!(interp.pending_count(), "");

        interp.attach();
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_reattach_is_idempotent() {
        let (mut interp, _queue) = attached();
        press(&mut interp, "9");
        interp.attach();
        assert!(interp.is_attached());
        assert_eq!(interp.pending_count(), "");
        interp.detach();
        assert!(!interp.is_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_count_expires() {
        let (mut interp, (_tx, mut rx)) = attached();
        press(&mut interp, "4");

        let Some(HostEvent::CountExpired(generation)) = rx.recv().await else {
            panic!("expected expiry");
        };
        interp.on_count_expired(generation);
        assert_eq!(interp.pending_count(), "");
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_measured_from_last_digit() {
        let (mut interp, (_tx, mut rx)) = attached();
        press(&mut interp, "1");
        tokio::time::sleep(Duration::from_millis(900)).await;
        press(&mut interp, "5");
        tokio::time::sleep(Duration::from_millis(900)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 15
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_expiry_is_ignored() {
        let (mut interp, (_tx, mut rx)) = attached();
        press(&mut interp, "2");
        tokio::time::sleep(Duration::from_millis(1500)).await;
        // Timer fired but its event hasn't been handled yet.
        let Ok(HostEvent::CountExpired(stale)) = rx.try_recv() else {
            panic!("expected queued expiry");
        };

        press(&mut interp, "3");
        interp.on_count_expired(stale);
        assert_eq!(interp.pending_count(), "23");
    }

    #[test]
    fn test_count_works_without_runtime() {
        let (mut interp, _queue) = attached();
        assert_eq!(press(&mut interp, "5"), KeyOutcome::Buffered);
        assert_eq!(
            press(&mut interp, "j"),
            KeyOutcome::Dispatch {
                action: Action::MoveDown,
                count: 5
            }
        );
    }
}
