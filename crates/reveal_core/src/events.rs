//! Discrete events dispatched to the owning state machines
//!
//! The view layer never mutates animation or interaction state directly. It
//! translates host input into these messages and hands them to the machine that
//! owns the state.

use crate::visibility::RegionId;

/// Pointer input relevant to hover/tap emphasis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    /// Pointer moved onto the element
    Enter,
    /// Pointer moved off the element
    Leave,
    /// Button or finger pressed on the element
    Down,
    /// Button or finger released
    Up,
}

/// A visibility transition reported by an observer for one region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    pub region: RegionId,
    pub visible: bool,
}

impl VisibilityChange {
    pub fn new(region: RegionId, visible: bool) -> Self {
        Self { region, visible }
    }
}
