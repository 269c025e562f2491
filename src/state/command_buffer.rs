use std::time::Duration;

use tokio::sync::mpsc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::event::HostEvent;

/// Repeat-count digits typed ahead of a command, plus the timer that
/// discards them if no command follows.
///
/// At most one expiry timer is live: arming always cancels the previous one,
/// and an expiry that was already queued when it got superseded carries a
/// stale generation and is ignored.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    digits: String,
    expiry: Option<JoinHandle<()>>,
    generation: u64,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn has_pending_expiry(&self) -> bool {
        self.expiry.is_some()
    }

    /// Append a digit. A leading `0` is not a count and is refused.
    pub fn push_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || (digit == '0' && self.digits.is_empty()) {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// Consume the buffered count (1 when empty) and return to idle.
    /// Counts too large to represent saturate.
    pub fn take_count(&mut self) -> usize {
        let count = if self.digits.is_empty() {
            1
        } else {
            self.digits.parse::<usize>().unwrap_or(usize::MAX)
        };
        self.reset();
        count
    }

    /// (Re)start the expiry timer; it posts [`HostEvent::CountExpired`] to `events`.
    ///
    /// The timer only holds a weak handle, so a pending expiry never keeps the
    /// event queue open. Outside a tokio runtime no timer is started and the
    /// digits stay until a command consumes them or the buffer is reset.
    pub fn arm(&mut self, delay: Duration, events: &mpsc::WeakUnboundedSender<HostEvent>) {
        self.cancel();
        self.generation += 1;
        let Ok(runtime) = Handle::try_current() else {
            warn!("no tokio runtime, repeat count will not expire");
            return;
        };
        let generation = self.generation;
        let events = events.clone();
        self.expiry = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(HostEvent::CountExpired(generation));
            }
        }));
    }

    /// Handle a fired timer. Returns whether the buffer was cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.expiry.is_none() {
            return false;
        }
        self.expiry = None;
        self.digits.clear();
        true
    }

    /// Drop the digits and cancel any pending timer.
    pub fn reset(&mut self) {
        self.cancel();
        self.digits.clear();
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

impl Drop for CommandBuffer {
    fn drop(&mut self) {
        self.cancel();
    }
}
