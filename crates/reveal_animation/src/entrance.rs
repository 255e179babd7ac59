//! Entrance animations sampled as a pure function of time
//!
//! An entrance never stores per-frame state. Given the section's
//! [`AnimationState`], the child's start delay and the time since the section
//! entered `Visible`, [`Entrance::pose_at`] returns exactly one pose. Replaying
//! the same inputs always yields the same pose, and a section reset followed by
//! a new entrance restarts every child from its hidden pose.

use reveal_core::AnimationState;
use serde::{Deserialize, Serialize};

use crate::pose::{Interpolate, Pose};
use crate::stagger::StaggerConfig;
use crate::transition::{Progress, Transition};

/// A hidden pose, a shown pose, and the curve between them
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entrance {
    pub hidden: Pose,
    #[serde(default)]
    pub shown: Pose,
    #[serde(default)]
    pub transition: Transition,
}

impl Entrance {
    pub fn new(hidden: Pose, transition: Transition) -> Self {
        Self {
            hidden,
            shown: Pose::VISIBLE,
            transition,
        }
    }

    pub fn with_shown(mut self, shown: Pose) -> Self {
        self.shown = shown;
        self
    }

    /// Progress of a child that starts `delay_ms` into the entrance
    pub fn progress_at(
        &self,
        state: AnimationState,
        delay_ms: u64,
        elapsed_ms: Option<u64>,
    ) -> Progress {
        match (state, elapsed_ms) {
            (AnimationState::Visible, Some(elapsed)) if elapsed >= delay_ms => {
                self.transition.progress_at(elapsed - delay_ms)
            }
            _ => Progress::START,
        }
    }

    /// Pose of a child that starts `delay_ms` into the entrance
    pub fn pose_at(&self, state: AnimationState, delay_ms: u64, elapsed_ms: Option<u64>) -> Pose {
        let progress = self.progress_at(state, delay_ms, elapsed_ms);
        if progress.settled {
            self.shown
        } else if progress.value == 0.0 {
            self.hidden
        } else {
            self.hidden.lerp(&self.shown, progress.value)
        }
    }

    /// Pose of the child at `index` in a staggered group
    pub fn item_pose(
        &self,
        stagger: &StaggerConfig,
        state: AnimationState,
        index: usize,
        elapsed_ms: Option<u64>,
    ) -> Pose {
        self.pose_at(state, stagger.delay_for_index(index), elapsed_ms)
    }

    pub fn is_settled_at(&self, state: AnimationState, delay_ms: u64, elapsed_ms: Option<u64>) -> bool {
        self.progress_at(state, delay_ms, elapsed_ms).settled
    }
}
