//! Vim-style keyboard navigation over the file diffs of a pull request page.
//!
//! The host page is reached only through [`page::PageAdapter`]; [`session::Revim`]
//! ties the adapter, the diff list and the key interpreter together and follows
//! the page across in-page navigations.

pub mod action;
pub mod command;
pub mod config;
pub mod event;
pub mod navigator;
pub mod page;
pub mod registry;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use action::Action;
pub use command::{CommandInterpreter, KeyOutcome};
pub use config::RevimConfig;
pub use event::{HostEvent, KeyInput, KeyTarget, Modifiers};
pub use navigator::{Direction, Navigator};
pub use page::{DiffId, DiffSummary, PageAdapter, RenderMode, ScrollMargins, ViewedStatus};
pub use registry::{DiffRegistry, RebuildOutcome};
pub use session::Revim;
