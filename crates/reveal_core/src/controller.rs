//! Per-section animation state machine
//!
//! Each section owns exactly one [`AnimationController`]. It moves between
//! [`AnimationState::Hidden`] and [`AnimationState::Visible`] in response to
//! visibility reports and records when the section last entered `Visible`, which
//! is the t = 0 every staggered child measures its delay from.
//!
//! ```text
//!            observer(true) / start()
//!   Hidden ───────────────────────────▶ Visible
//!      ▲                                   │
//!      └───────── observer(false) ─────────┘   (repeatable regions only)
//! ```
//!
//! Exit is instantaneous: there is no exiting state, children snap back to their
//! hidden pose as soon as the controller reports `Hidden`.

/// Named animation state of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Hidden,
    Visible,
}

impl AnimationState {
    pub fn is_visible(&self) -> bool {
        matches!(self, AnimationState::Visible)
    }

    /// Handle a visibility report and return the new state, or None if no transition
    pub fn on_visibility(&self, visible: bool, repeatable: bool) -> Option<Self> {
        match (self, visible) {
            (AnimationState::Hidden, true) => Some(AnimationState::Visible),
            (AnimationState::Visible, false) if repeatable => Some(AnimationState::Hidden),
            _ => None,
        }
    }
}

/// A state change performed by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerTransition {
    /// Entrance timing starts from `at_ms`
    Entered { at_ms: u64, generation: u64 },
    /// Every child snaps to its hidden pose
    Reset,
}

/// Owner of a section's [`AnimationState`]
#[derive(Debug, Clone)]
pub struct AnimationController {
    state: AnimationState,
    repeatable: bool,
    entered_at_ms: Option<u64>,
    /// Incremented on every entrance so stale in-flight work can be detected
    generation: u64,
}

impl AnimationController {
    pub fn new(repeatable: bool) -> Self {
        Self {
            state: AnimationState::Hidden,
            repeatable,
            entered_at_ms: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entered_at_ms(&self) -> Option<u64> {
        self.entered_at_ms
    }

    /// Milliseconds since the section entered `Visible`, or None while hidden
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.entered_at_ms
            .map(|entered| now_ms.saturating_sub(entered))
    }

    /// Apply a visibility report from the observer
    pub fn on_visibility(&mut self, visible: bool, now_ms: u64) -> Option<ControllerTransition> {
        let next = self.state.on_visibility(visible, self.repeatable)?;
        Some(self.enter(next, now_ms))
    }

    /// Imperatively enter `Visible`, as if the observer had reported `true`
    ///
    /// Re-entrant: does nothing when already visible.
    pub fn start(&mut self, now_ms: u64) -> Option<ControllerTransition> {
        if self.state.is_visible() {
            return None;
        }
        Some(self.enter(AnimationState::Visible, now_ms))
    }

    fn enter(&mut self, next: AnimationState, now_ms: u64) -> ControllerTransition {
        self.state = next;
        match next {
            AnimationState::Visible => {
                self.generation += 1;
                self.entered_at_ms = Some(now_ms);
                tracing::debug!(
                    at_ms = now_ms,
                    generation = self.generation,
                    "section entering visible"
                );
                ControllerTransition::Entered {
                    at_ms: now_ms,
                    generation: self.generation,
                }
            }
            AnimationState::Hidden => {
                self.entered_at_ms = None;
                tracing::debug!(at_ms = now_ms, "section reset to hidden");
                ControllerTransition::Reset
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enters_visible_and_tracks_elapsed() {
        let mut controller = AnimationController::new(true);
        assert_eq!(controller.state(), AnimationState::Hidden);
        assert_eq!(controller.elapsed_ms(100), None);

        let transition = controller.on_visibility(true, 1_000);
        assert_eq!(
            transition,
            Some(ControllerTransition::Entered {
                at_ms: 1_000,
                generation: 1
            })
        );
        assert_eq!(controller.elapsed_ms(1_350), Some(350));
        // Clock skew never underflows
        assert_eq!(controller.elapsed_ms(900), Some(0));
    }

    #[test]
    fn test_visible_is_reentrant() {
        let mut controller = AnimationController::new(true);
        controller.on_visibility(true, 0);
        assert_eq!(controller.on_visibility(true, 500), None);
        assert_eq!(controller.start(600), None);
        assert_eq!(controller.entered_at_ms(), Some(0));
    }

    #[test]
    fn test_repeatable_resets_and_restarts_from_zero() {
        let mut controller = AnimationController::new(true);
        controller.on_visibility(true, 0);
        assert_eq!(
            controller.on_visibility(false, 350),
            Some(ControllerTransition::Reset)
        );
        assert_eq!(controller.state(), AnimationState::Hidden);
        assert_eq!(controller.elapsed_ms(400), None);

        controller.on_visibility(true, 2_000);
        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.elapsed_ms(2_100), Some(100));
    }

    #[test]
    fn test_non_repeatable_never_hides() {
        let mut controller = AnimationController::new(false);
        controller.on_visibility(true, 0);
        assert_eq!(controller.on_visibility(false, 10), None);
        assert_eq!(controller.state(), AnimationState::Visible);
    }

    #[test]
    fn test_imperative_start() {
        let mut controller = AnimationController::new(false);
        assert!(matches!(
            controller.start(42),
            Some(ControllerTransition::Entered { at_ms: 42, .. })
        ));
        assert!(controller.state().is_visible());
    }
}
