use tokio::sync::mpsc;

/// Where keyboard focus was when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyTarget {
    #[default]
    Page,
    TextInput,
    TextArea,
    ContentEditable,
}

impl KeyTarget {
    /// Focus is inside something the user types into (e.g. a review comment box).
    pub fn is_editable(&self) -> bool {
        !matches!(self, KeyTarget::Page)
    }
}

/// Modifier keys held during a key press. Shift is already folded into the key
/// itself (`"G"` vs `"g"`), so it isn't tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Key value as the host reports it: `"j"`, `"5"`, `"Enter"`, ...
    pub key: String,
    pub target: KeyTarget,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: KeyTarget::Page,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_target(mut self, target: KeyTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The single digit this key types, if any.
    pub fn digit(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => None,
        }
    }
}

/// Everything the host page tells the core about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Full document load.
    PageLoad,
    /// Named in-page route transition, e.g. `"turbo:load"`.
    Navigation(String),
    Key(KeyInput),
    /// A repeat-count expiry timer fired. Carries the generation it was armed with.
    CountExpired(u64),
    Shutdown,
}

/// Single queue of host events, drained one at a time by the session loop.
///
/// The reader holds no sender of its own, so [`EventReader::next`] returns
/// `None` once every host-side sender has been dropped.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<HostEvent>,
}

impl EventReader {
    pub fn new() -> (Self, mpsc::UnboundedSender<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    pub async fn next(&mut self) -> Option<HostEvent> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<HostEvent> {
        self.rx.try_recv().ok()
    }
}
