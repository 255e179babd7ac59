//! Stagger timing for sibling reveals
//!
//! Child `i` of a staggered group starts moving `base + i * per_item`
//! milliseconds after its section entered `Visible`. Order always follows the
//! child index; there is no reverse or centered ordering and no cap.

use serde::{Deserialize, Serialize};

/// Delay schedule for a group of siblings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Delay before the first child starts (ms)
    #[serde(default)]
    pub base_delay_ms: u64,
    /// Delay between consecutive children (ms)
    #[serde(default)]
    pub per_item_delay_ms: u64,
}

impl StaggerConfig {
    pub fn new(base_delay_ms: u64, per_item_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            per_item_delay_ms,
        }
    }

    /// No delay anywhere; every child starts at t = 0
    pub fn none() -> Self {
        Self::default()
    }

    /// Start offset for the child at `index`
    pub fn delay_for_index(&self, index: usize) -> u64 {
        self.base_delay_ms
            .saturating_add(self.per_item_delay_ms.saturating_mul(index as u64))
    }

    /// Start offsets for `count` children, in index order
    pub fn start_times(&self, count: usize) -> impl Iterator<Item = u64> + '_ {
        (0..count).map(move |index| self.delay_for_index(index))
    }

    /// Number of children that have started moving `elapsed_ms` into the entrance
    pub fn started_count(&self, count: usize, elapsed_ms: u64) -> usize {
        self.start_times(count)
            .take_while(|start| *start <= elapsed_ms)
            .count()
    }
}
