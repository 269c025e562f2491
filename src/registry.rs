use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::page::{DiffId, DiffSummary, PageAdapter, RenderMode, ViewedStatus};

#[derive(Debug, Deserialize)]
struct EmbeddedData {
    payload: Payload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    diff_summaries: Vec<RawDiffSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiffSummary {
    path_digest: String,
    #[serde(default)]
    marked_as_viewed: bool,
}

/// Parse the page's embedded data blob into the ordered diff list.
/// Any malformed input is treated the same as a missing blob.
pub fn parse_embedded_data(raw: &str) -> Option<Vec<DiffSummary>> {
    match serde_json::from_str::<EmbeddedData>(raw) {
        Ok(data) => Some(
            data.payload
                .diff_summaries
                .into_iter()
                .map(|d| DiffSummary {
                    id: DiffId::new(d.path_digest),
                    marked_as_viewed: d.marked_as_viewed,
                })
                .collect(),
        ),
        Err(e) => {
            warn!(error = %e, "embedded diff data is malformed, ignoring it");
            None
        }
    }
}

/// Initial cursor for a freshly built list: the first diff not marked as
/// viewed, else the first diff, else nothing.
pub fn cursor_seed(diffs: &[DiffSummary]) -> Option<usize> {
    diffs
        .iter()
        .position(|d| !d.marked_as_viewed)
        .or_else(|| (!diffs.is_empty()).then_some(0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    Loaded { mode: RenderMode, count: usize },
    /// Neither rendering yielded any diff; the previous list was kept.
    NoData,
}

/// Ordered list of the diffs on the current review page.
#[derive(Debug, Default)]
pub struct DiffRegistry {
    diffs: Vec<DiffSummary>,
    mode: RenderMode,
}

impl DiffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn diffs(&self) -> &[DiffSummary] {
        &self.diffs
    }

    pub fn get(&self, index: usize) -> Option<&DiffSummary> {
        self.diffs.get(index)
    }

    pub fn position(&self, id: &DiffId) -> Option<usize> {
        self.diffs.iter().position(|d| &d.id == id)
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Re-read the diff list from the page, structured data first, then a
    /// legacy element scan. Leaves the current list untouched if both are empty.
    pub fn rebuild<P: PageAdapter>(&mut self, page: &P) -> RebuildOutcome {
        let Some((mode, diffs)) = read_page(page) else {
            debug!("no diff data found, keeping previous list");
            return RebuildOutcome::NoData;
        };

        self.diffs = dedupe(diffs);
        self.mode = mode;
        debug!(mode = mode.label(), count = self.diffs.len(), "diff list rebuilt");
        RebuildOutcome::Loaded {
            mode,
            count: self.diffs.len(),
        }
    }

    /// Live page element for a diff; `None` if it isn't rendered right now.
    pub fn locate<P: PageAdapter>(&self, page: &P, id: &DiffId) -> Option<P::Element> {
        page.find_diff_element(id, self.mode)
    }

    pub fn viewed_control<P: PageAdapter>(&self, page: &P, id: &DiffId) -> Option<P::Control> {
        let element = self.locate(page, id)?;
        page.find_viewed_control(&element, self.mode)
    }

    /// Viewed state as the page shows it now. Never cached.
    pub fn status<P: PageAdapter>(&self, page: &P, id: &DiffId) -> ViewedStatus {
        self.viewed_control(page, id)
            .and_then(|control| page.read_control_state(&control, self.mode))
            .into()
    }
}

fn read_page<P: PageAdapter>(page: &P) -> Option<(RenderMode, Vec<DiffSummary>)> {
    if let Some(diffs) = page
        .read_diff_data()
        .and_then(|raw| parse_embedded_data(&raw))
        .filter(|diffs| !diffs.is_empty())
    {
        return Some((RenderMode::Structured, diffs));
    }

    let scanned = page.scan_legacy_diffs();
    debug!(count = scanned.len(), "legacy diffs found");
    if scanned.is_empty() {
        return None;
    }

    let diffs = scanned
        .into_iter()
        .map(|id| DiffSummary {
            id,
            marked_as_viewed: false,
        })
        .collect();
    Some((RenderMode::Legacy, diffs))
}

fn dedupe(diffs: Vec<DiffSummary>) -> Vec<DiffSummary> {
    let mut seen = HashSet::new();
    let total = diffs.len();
    let unique: Vec<DiffSummary> = diffs
        .into_iter()
        .filter(|d| seen.insert(d.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(dropped = total - unique.len(), "duplicate diff ids on page");
    }
    unique
}
