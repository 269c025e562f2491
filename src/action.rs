/// Every command a key press can trigger. The keymap is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Movement
    MoveDown,
    MoveUp,
    JumpToStart,
    JumpToEnd,

    // Viewed-state seeking
    NextUnviewed,
    PrevUnviewed,

    // Viewed toggle
    MarkViewedAndNext,
    MarkViewed,

    // Page
    Reload,
}

/// Key bindings in display order: (key, action, description).
pub const KEYMAP: &[(&str, Action, &str)] = &[
    ("j", Action::MoveDown, "next diff"),
    ("k", Action::MoveUp, "previous diff"),
    ("g", Action::JumpToStart, "first diff"),
    ("G", Action::JumpToEnd, "last diff"),
    ("n", Action::NextUnviewed, "next unviewed diff"),
    ("N", Action::PrevUnviewed, "previous unviewed diff"),
    ("v", Action::MarkViewedAndNext, "mark viewed, then next unviewed"),
    ("V", Action::MarkViewed, "toggle viewed"),
    ("r", Action::Reload, "re-scan the page"),
];

/// Map a key (as reported by the host, e.g. `"j"` or `"Enter"`) to its action.
pub fn resolve(key: &str) -> Option<Action> {
    match key {
        "j" => Some(Action::MoveDown),
        "k" => Some(Action::MoveUp),
        "g" => Some(Action::JumpToStart),
        "G" => Some(Action::JumpToEnd),
        "n" => Some(Action::NextUnviewed),
        "N" => Some(Action::PrevUnviewed),
        "v" => Some(Action::MarkViewedAndNext),
        "V" => Some(Action::MarkViewed),
        "r" => Some(Action::Reload),
        _ => None,
    }
}
