use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::command::{CommandInterpreter, KeyOutcome};
use crate::config::RevimConfig;
use crate::event::{EventReader, HostEvent, KeyInput};
use crate::navigator::Navigator;
use crate::page::PageAdapter;
use crate::registry::RebuildOutcome;
use crate::state::NavigationState;

/// Host integration: owns the page adapter, the current review session and
/// the key interpreter, and keeps them in step with the page's navigation.
pub struct Revim<P: PageAdapter> {
    page: P,
    config: RevimConfig,
    session: Option<NavigationState>,
    interpreter: CommandInterpreter,
    events: EventReader,
}

impl<P: PageAdapter> Revim<P> {
    /// Returns the core together with the sender the host posts events
    /// through. [`Revim::run`] ends once every clone of it is dropped.
    pub fn new(page: P, config: RevimConfig) -> (Self, mpsc::UnboundedSender<HostEvent>) {
        let (events, tx) = EventReader::new();
        let interpreter = CommandInterpreter::new(config.count_timeout, tx.downgrade());
        let revim = Self {
            page,
            config,
            session: None,
            interpreter,
            events,
        };
        (revim, tx)
    }

    /// Whether keys are currently being interpreted.
    pub fn is_ready(&self) -> bool {
        self.interpreter.is_attached()
    }

    pub fn session(&self) -> Option<&NavigationState> {
        self.session.as_ref()
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn pending_count(&self) -> &str {
        self.interpreter.pending_count()
    }

    /// Drain host events until [`HostEvent::Shutdown`] or until the host has
    /// dropped all of its senders, then tear down.
    pub async fn run(&mut self) {
        while let Some(event) = self.events.next().await {
            if !self.handle_event(event).await {
                break;
            }
        }
        self.teardown();
    }

    /// Process one event. Returns `false` once the host asked to shut down.
    pub async fn handle_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::PageLoad => self.on_navigation("load").await,
            HostEvent::Navigation(name) => {
                if self.config.is_navigation_event(&name) {
                    self.on_navigation(&name).await;
                } else {
                    debug!(event = %name, "ignoring unrelated page event");
                }
            }
            HostEvent::Key(input) => {
                self.handle_key(&input);
            }
            HostEvent::CountExpired(generation) => self.interpreter.on_count_expired(generation),
            HostEvent::Shutdown => return false,
        }
        true
    }

    /// Interpret a key press and run the resulting command. The returned
    /// outcome tells the host whether to suppress the key's default behaviour.
    pub fn handle_key(&mut self, input: &KeyInput) -> KeyOutcome {
        let outcome = self.interpreter.handle_key(input);
        if let KeyOutcome::Dispatch { action, count } = outcome {
            if let Some(state) = self.session.as_mut() {
                Navigator::new(state, &mut self.page, self.config.scroll_margins)
                    .execute(action, count);
            }
        }
        outcome
    }

    /// Session boundary check, run on page load and every route transition.
    pub async fn on_navigation(&mut self, trigger: &str) {
        debug!(trigger, "navigation event detected");
        let path = self.page.current_path();

        if !self.page.is_target_page(&path) {
            debug!(path = %path, "not a pull request files page");
            self.teardown();
            return;
        }

        let same_session = self.session.as_ref().is_some_and(|s| s.path() == path);
        if same_session && self.is_ready() {
            debug!(path = %path, "same page, reloading diffs");
            self.reload();
            return;
        }

        info!(path = %path, "starting review session");
        self.session = Some(NavigationState::new(path));
        if !self.wait_for_content().await {
            debug!("diff content did not appear, scanning anyway");
        }
        self.interpreter.attach();
        if let RebuildOutcome::Loaded { mode, count } = self.reload() {
            info!(mode = mode.label(), count, "diffs found");
        }
    }

    /// Detach the key listener and drop the session.
    pub fn teardown(&mut self) {
        self.interpreter.detach();
        if self.session.take().is_some() {
            debug!("review session closed");
        }
    }

    fn reload(&mut self) -> RebuildOutcome {
        match self.session.as_mut() {
            Some(state) => {
                Navigator::new(state, &mut self.page, self.config.scroll_margins).reload()
            }
            None => RebuildOutcome::NoData,
        }
    }

    /// Poll until the page has rendered its diffs, up to the configured limit.
    async fn wait_for_content(&self) -> bool {
        for attempt in 0..=self.config.ready_poll_attempts {
            if self.page.content_present() {
                return true;
            }
            if attempt < self.config.ready_poll_attempts {
                tokio::time::sleep(self.config.ready_poll_interval).await;
            }
        }
        false
    }
}
