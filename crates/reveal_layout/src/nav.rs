//! Navigation actions produced by clicks and the host scroll boundary

use reveal_core::RevealResult;
use serde::{Deserialize, Serialize};

/// What a clickable node asks the host to do
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    /// Smooth-scroll the section with this id into view
    ScrollToRegion(String),
    /// Smooth-scroll back to the top of the page
    ScrollToTop,
}

impl NavAction {
    pub fn scroll_to(id: impl Into<String>) -> Self {
        NavAction::ScrollToRegion(id.into())
    }

    /// Run this action against the host
    pub fn perform<S: ScrollTarget + ?Sized>(&self, target: &mut S) -> RevealResult<()> {
        match self {
            NavAction::ScrollToRegion(id) => target.scroll_to_section(id),
            NavAction::ScrollToTop => {
                target.scroll_to_top();
                Ok(())
            }
        }
    }
}

/// Host scrolling implementation
pub trait ScrollTarget {
    /// Bring the section into view; fails when no section has this id
    fn scroll_to_section(&mut self, id: &str) -> RevealResult<()>;

    fn scroll_to_top(&mut self);
}
