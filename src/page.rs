use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Opaque token identifying one file diff on the review page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffId(String);

impl DiffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiffId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One diff as listed by the page at rebuild time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub id: DiffId,
    /// Viewed flag as reported when the list was built. Only used to seed the
    /// cursor; live status always comes from [`PageAdapter`].
    pub marked_as_viewed: bool,
}

/// Which rendering of the review page the diff list was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// A single embedded JSON blob lists every diff with its viewed flag.
    #[default]
    Structured,
    /// No blob; diffs are discovered by scanning elements and start unviewed.
    Legacy,
}

impl RenderMode {
    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::Structured => "structured",
            RenderMode::Legacy => "legacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewedStatus {
    Viewed,
    Unviewed,
    /// Element or its viewed control is not on the page (yet).
    Unknown,
}

impl From<Option<bool>> for ViewedStatus {
    fn from(state: Option<bool>) -> Self {
        match state {
            Some(true) => ViewedStatus::Viewed,
            Some(false) => ViewedStatus::Unviewed,
            None => ViewedStatus::Unknown,
        }
    }
}

/// Minimum distance (px) kept between a scrolled-to diff and the viewport
/// edges, so fixed page chrome never covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMargins {
    pub top: u32,
    pub bottom: u32,
}

/// The only surface the navigation core uses to read and mutate the host page.
///
/// Every lookup may come back empty: the page renders lazily and can replace
/// its content at any time, so callers treat absence as a skippable condition.
pub trait PageAdapter {
    type Element;
    type Control;

    /// Logical route of the page, used to detect session boundaries.
    fn current_path(&self) -> String;

    fn is_target_page(&self, path: &str) -> bool {
        is_pr_files_path(path)
    }

    /// Raw text of the embedded data blob, or `None` when the page has none.
    fn read_diff_data(&self) -> Option<String>;

    /// Ids of the diff elements found by scanning the page, in page order.
    fn scan_legacy_diffs(&self) -> Vec<DiffId>;

    /// Whether the diff content has been rendered at all. Polled at session start.
    fn content_present(&self) -> bool;

    fn find_diff_element(&self, id: &DiffId, mode: RenderMode) -> Option<Self::Element>;

    fn find_viewed_control(&self, element: &Self::Element, mode: RenderMode)
        -> Option<Self::Control>;

    /// Pressed/checked state of a viewed control, `None` if indeterminate.
    fn read_control_state(&self, control: &Self::Control, mode: RenderMode) -> Option<bool>;

    /// Simulate a user click on a viewed control.
    fn click_control(&mut self, control: &Self::Control);

    fn activate_element(&mut self, element: &Self::Element);

    fn deactivate_element(&mut self, element: &Self::Element);

    /// Scroll so the element sits inside the viewport with `margins` to spare.
    /// Implementations leave the scroll position alone when it already does.
    fn scroll_into_comfortable_view(&mut self, element: &Self::Element, margins: ScrollMargins);
}

/// Matches the pull request "files changed" route, e.g. `/owner/repo/pull/42/files`.
pub fn is_pr_files_path(path: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"pull/\d+/files").unwrap());
    re.is_match(path)
}
