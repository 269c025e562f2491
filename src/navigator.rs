use tracing::debug;

use crate::action::Action;
use crate::page::{PageAdapter, ScrollMargins, ViewedStatus};
use crate::registry::{cursor_seed, RebuildOutcome};
use crate::state::NavigationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Cursor movement over the session's diff list, with the page side effects
/// (active marker, scrolling, viewed toggle) that go with it.
///
/// Every operation is a no-op when the list is empty or the target diff is
/// not rendered on the page.
pub struct Navigator<'a, P: PageAdapter> {
    state: &'a mut NavigationState,
    page: &'a mut P,
    margins: ScrollMargins,
}

impl<'a, P: PageAdapter> Navigator<'a, P> {
    pub fn new(state: &'a mut NavigationState, page: &'a mut P, margins: ScrollMargins) -> Self {
        Self {
            state,
            page,
            margins,
        }
    }

    /// Run `action`. Only movement honours `count`; other commands run once.
    pub fn execute(&mut self, action: Action, count: usize) {
        let offset = isize::try_from(count).unwrap_or(isize::MAX);
        match action {
            Action::MoveDown => self.move_by(offset),
            Action::MoveUp => self.move_by(-offset),
            Action::JumpToStart => self.jump_to_start(),
            Action::JumpToEnd => self.jump_to_end(),
            Action::NextUnviewed => self.seek_unviewed(Direction::Forward),
            Action::PrevUnviewed => self.seek_unviewed(Direction::Backward),
            Action::MarkViewedAndNext => {
                self.mark_current_viewed();
                self.seek_unviewed(Direction::Forward);
            }
            Action::MarkViewed => self.mark_current_viewed(),
            Action::Reload => {
                self.reload();
            }
        }
    }

    /// Select the diff at `index`. Out-of-range indices are rejected, not clamped.
    pub fn move_to(&mut self, index: usize) {
        let Some(diff) = self.state.registry.get(index) else {
            return;
        };
        let Some(element) = self.state.registry.locate(&*self.page, &diff.id) else {
            debug!(index, id = %diff.id, "diff not rendered, skipping move");
            return;
        };

        self.deactivate_current();
        self.state.cursor = Some(index);
        self.page.activate_element(&element);
        self.page.scroll_into_comfortable_view(&element, self.margins);
        debug!(index, "moved to diff");
    }

    pub fn move_by(&mut self, offset: isize) {
        let len = self.state.len();
        if len == 0 {
            return;
        }
        let last = isize::try_from(len - 1).unwrap_or(isize::MAX);
        let current = self
            .state
            .cursor
            .and_then(|c| isize::try_from(c).ok())
            .unwrap_or(0);
        let target = current.saturating_add(offset).clamp(0, last);
        self.move_to(target as usize);
    }

    pub fn jump_to_start(&mut self) {
        self.move_to(0);
    }

    pub fn jump_to_end(&mut self) {
        if let Some(last) = self.state.len().checked_sub(1) {
            self.move_to(last);
        }
    }

    /// Move to the nearest unviewed diff strictly before or after the cursor.
    /// Does not wrap. Diffs whose status can't be read are skipped.
    pub fn seek_unviewed(&mut self, direction: Direction) {
        let len = self.state.len();
        let mut candidates: Box<dyn Iterator<Item = usize>> =
            match (direction, self.state.cursor) {
                (Direction::Forward, Some(c)) => Box::new(c + 1..len),
                (Direction::Forward, None) => Box::new(0..len),
                (Direction::Backward, Some(c)) => Box::new((0..c).rev()),
                (Direction::Backward, None) => Box::new(std::iter::empty()),
            };

        let registry = &self.state.registry;
        let page = &*self.page;
        let found = candidates.find(|&i| {
            registry
                .get(i)
                .is_some_and(|d| registry.status(page, &d.id) == ViewedStatus::Unviewed)
        });

        match found {
            Some(index) => self.move_to(index),
            None => debug!(?direction, "no more unviewed diffs"),
        }
    }

    /// Click the current diff's viewed control. The resulting state is read
    /// back from the page on the next status query.
    pub fn mark_current_viewed(&mut self) {
        let Some(diff) = self.state.cursor.and_then(|c| self.state.registry.get(c)) else {
            return;
        };
        match self.state.registry.viewed_control(&*self.page, &diff.id) {
            Some(control) => self.page.click_control(&control),
            None => debug!(id = %diff.id, "viewed control not found"),
        }
    }

    /// Re-read the diff list and reseed the cursor. With no data on the page,
    /// the current list and cursor are kept.
    pub fn reload(&mut self) -> RebuildOutcome {
        let previous = self.current_element();
        let outcome = self.state.registry.rebuild(&*self.page);
        if let RebuildOutcome::Loaded { .. } = outcome {
            if let Some(element) = previous {
                self.page.deactivate_element(&element);
            }
            self.state.cursor = cursor_seed(self.state.registry.diffs());
            debug!(cursor = ?self.state.cursor, "cursor reseeded");
        }
        outcome
    }

    fn current_element(&self) -> Option<P::Element> {
        let diff = self.state.cursor.and_then(|c| self.state.registry.get(c))?;
        self.state.registry.locate(&*self.page, &diff.id)
    }

    fn deactivate_current(&mut self) {
        if let Some(element) = self.current_element() {
            self.page.deactivate_element(&element);
        }
    }
}
