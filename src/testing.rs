//! In-memory page used by the unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::page::{DiffId, PageAdapter, RenderMode, ScrollMargins};

#[derive(Debug, Clone)]
pub struct FakeDiff {
    pub rendered: bool,
    /// `None` means the diff has no viewed control.
    pub viewed: Option<bool>,
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub path: String,
    pub embedded: Option<String>,
    pub legacy: Vec<String>,
    pub diffs: HashMap<String, FakeDiff>,
    /// Number of `content_present` polls answered `false` before content shows up.
    pub polls_until_ready: Cell<u32>,
    pub active: HashSet<String>,
    pub scrolled: Vec<String>,
    pub clicks: Vec<String>,
}

impl FakePage {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Structured page whose blob and rendered elements agree with `flags`.
    pub fn structured(path: &str, flags: &[(&str, bool)]) -> Self {
        let mut page = Self::new(path);
        page.set_structured(flags);
        page
    }

    /// Legacy page with every listed element rendered and unviewed.
    pub fn legacy(path: &str, ids: &[&str]) -> Self {
        let mut page = Self::new(path);
        page.legacy = ids.iter().map(|id| id.to_string()).collect();
        for id in ids {
            page.diffs.insert(
                id.to_string(),
                FakeDiff {
                    rendered: true,
                    viewed: Some(false),
                },
            );
        }
        page
    }

    pub fn set_structured(&mut self, flags: &[(&str, bool)]) {
        let summaries: Vec<String> = flags
            .iter()
            .map(|(id, viewed)| {
                format!(r#"{{"pathDigest":"{id}","markedAsViewed":{viewed}}}"#)
            })
            .collect();
        self.embedded = Some(format!(
            r#"{{"payload":{{"diffSummaries":[{}]}}}}"#,
            summaries.join(",")
        ));
        self.diffs.clear();
        for (id, viewed) in flags {
            self.diffs.insert(
                id.to_string(),
                FakeDiff {
                    rendered: true,
                    viewed: Some(*viewed),
                },
            );
        }
    }

    pub fn set_rendered(&mut self, id: &str, rendered: bool) {
        if let Some(diff) = self.diffs.get_mut(id) {
            diff.rendered = rendered;
        }
    }

    pub fn set_viewed(&mut self, id: &str, viewed: Option<bool>) {
        if let Some(diff) = self.diffs.get_mut(id) {
            diff.viewed = viewed;
        }
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }
}

impl PageAdapter for FakePage {
    type Element = String;
    type Control = String;

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn read_diff_data(&self) -> Option<String> {
        self.embedded.clone()
    }

    fn scan_legacy_diffs(&self) -> Vec<DiffId> {
        self.legacy.iter().map(|id| DiffId::from(id.as_str())).collect()
    }

    fn content_present(&self) -> bool {
        let remaining = self.polls_until_ready.get();
        if remaining == 0 {
            return true;
        }
        self.polls_until_ready.set(remaining - 1);
        false
    }

    fn find_diff_element(&self, id: &DiffId, _mode: RenderMode) -> Option<String> {
        self.diffs
            .get(id.as_str())
            .filter(|d| d.rendered)
            .map(|_| id.to_string())
    }

    fn find_viewed_control(&self, element: &String, _mode: RenderMode) -> Option<String> {
        self.diffs
            .get(element)
            .and_then(|d| d.viewed)
            .map(|_| element.clone())
    }

    fn read_control_state(&self, control: &String, _mode: RenderMode) -> Option<bool> {
        self.diffs.get(control).and_then(|d| d.viewed)
    }

    fn click_control(&mut self, control: &String) {
        self.clicks.push(control.clone());
        if let Some(diff) = self.diffs.get_mut(control) {
            diff.viewed = diff.viewed.map(|v| !v);
        }
    }

    fn activate_element(&mut self, element: &String) {
        self.active.insert(element.clone());
    }

    fn deactivate_element(&mut self, element: &String) {
        self.active.remove(element);
    }

    fn scroll_into_comfortable_view(&mut self, element: &String, _margins: ScrollMargins) {
        self.scrolled.push(element.clone());
    }
}
