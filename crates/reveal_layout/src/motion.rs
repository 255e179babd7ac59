//! Entrance motion for section children
//!
//! - [`MotionTrack`]: one node (header, call-to-action, side panel) with its own
//!   delay and transition
//! - [`StaggeredGroup`]: an ordered run of siblings sharing one entrance, each
//!   offset by its index
//!
//! Both read the owning section's [`AnimationState`] and elapsed time; neither
//! keeps state of its own. Returning to `Hidden` mid-animation therefore puts
//! every node straight back on its hidden pose, started or not.

use reveal_animation::{Easing, Entrance, Pose, SpringConfig, StaggerConfig, Transition};
use reveal_core::AnimationState;
use smallvec::SmallVec;

/// A single node with an explicit start delay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTrack {
    entrance: Entrance,
    delay_ms: u64,
}

impl MotionTrack {
    pub fn new(entrance: Entrance, delay_ms: u64) -> Self {
        Self { entrance, delay_ms }
    }

    /// Fade in while rising `offset_y` over `duration_ms`
    pub fn fade_up(offset_y: f32, duration_ms: u64) -> Self {
        Self::new(
            Entrance::new(
                Pose::rise(offset_y),
                Transition::timed(duration_ms, Easing::EaseOut),
            ),
            0,
        )
    }

    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn entrance(&self) -> &Entrance {
        &self.entrance
    }

    pub fn pose(&self, state: AnimationState, elapsed_ms: Option<u64>) -> Pose {
        self.entrance.pose_at(state, self.delay_ms, elapsed_ms)
    }

    pub fn is_settled(&self, state: AnimationState, elapsed_ms: Option<u64>) -> bool {
        self.entrance.is_settled_at(state, self.delay_ms, elapsed_ms)
    }
}

/// Poses for a staggered group, in index order
pub type GroupPoses = SmallVec<[Pose; 8]>;

/// Ordered siblings revealed one after another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaggeredGroup {
    entrance: Entrance,
    stagger: StaggerConfig,
    len: usize,
}

impl StaggeredGroup {
    pub fn new(entrance: Entrance, stagger: StaggerConfig, len: usize) -> Self {
        Self {
            entrance,
            stagger,
            len,
        }
    }

    /// Rise `offset_y` on a spring, the standard card entrance
    pub fn rising(offset_y: f32, spring: SpringConfig, stagger: StaggerConfig, len: usize) -> Self {
        Self::new(
            Entrance::new(Pose::rise(offset_y), Transition::spring(spring)),
            stagger,
            len,
        )
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stagger(&self) -> &StaggerConfig {
        &self.stagger
    }

    pub fn entrance(&self) -> &Entrance {
        &self.entrance
    }

    /// Start offset of the child at `index`
    pub fn start_ms(&self, index: usize) -> u64 {
        self.stagger.delay_for_index(index)
    }

    pub fn pose(&self, index: usize, state: AnimationState, elapsed_ms: Option<u64>) -> Pose {
        self.entrance
            .item_pose(&self.stagger, state, index, elapsed_ms)
    }

    pub fn poses(&self, state: AnimationState, elapsed_ms: Option<u64>) -> GroupPoses {
        (0..self.len)
            .map(|index| self.pose(index, state, elapsed_ms))
            .collect()
    }

    /// Whether the last child has come to rest
    pub fn is_settled(&self, state: AnimationState, elapsed_ms: Option<u64>) -> bool {
        match self.len.checked_sub(1) {
            Some(last) => self
                .entrance
                .is_settled_at(state, self.start_ms(last), elapsed_ms),
            None => state.is_visible(),
        }
    }
}
