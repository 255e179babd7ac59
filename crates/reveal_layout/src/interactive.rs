//! Pointer emphasis: hover and press scale
//!
//! Emphasis is a layer on top of the entrance pose. It follows pointer input
//! only and ignores the section's animation state, so a card can grow under the
//! cursor while it is still rising into place.
//!
//! ```text
//!   Idle ──Enter──▶ Hovered ──Down──▶ Pressed
//!    ▲  ◀──Leave──     ▲  ◀────Up─────   │
//!    └─────────────────┼───── Leave ─────┘
//!                      │
//!   Idle ──Down (touch, no hover)──▶ Pressed
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use reveal_animation::{Easing, Pose, Spring, SpringConfig, Transition};
use reveal_core::PointerEvent;
use serde::{Deserialize, Serialize};

/// Interaction states driven by [`PointerEvent`]s
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + Debug + 'static
{
    /// Next state for `event`, or `None` when the event does not apply
    fn on_event(&self, event: PointerEvent) -> Option<Self>;
}

/// Pointer interaction state of one emphasized node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

impl StateTransitions for ButtonState {
    fn on_event(&self, event: PointerEvent) -> Option<Self> {
        use PointerEvent::*;
        match (self, event) {
            // Pointer hover
            (ButtonState::Idle, Enter) => Some(ButtonState::Hovered),
            (ButtonState::Hovered, Leave) => Some(ButtonState::Idle),

            // Press, with or without a preceding hover
            (ButtonState::Hovered, Down) => Some(ButtonState::Pressed),
            (ButtonState::Idle, Down) => Some(ButtonState::Pressed),

            // Release
            (ButtonState::Pressed, Up) => Some(ButtonState::Hovered),
            (ButtonState::Pressed, Leave) => Some(ButtonState::Idle),

            _ => None,
        }
    }
}

/// Scale targets for each interaction state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    pub hover_scale: f32,
    /// Falls back to `hover_scale` (hover persists through a press)
    #[serde(default)]
    pub press_scale: Option<f32>,
    /// Spring, or a timed tween restarted from the current scale on every change
    #[serde(default = "default_transition")]
    pub transition: Transition,
}

fn default_transition() -> Transition {
    Transition::spring(SpringConfig::stiff())
}

impl Emphasis {
    pub fn new(hover_scale: f32) -> Self {
        Self {
            hover_scale,
            press_scale: None,
            transition: default_transition(),
        }
    }

    /// Media card that grows under the cursor over 300ms
    pub fn card(hover_scale: f32) -> Self {
        Self::new(hover_scale).with_transition(Transition::timed(300, Easing::EaseOut))
    }

    /// Button that springs up on hover and down on press
    pub fn button(hover_scale: f32, press_scale: f32) -> Self {
        Self::new(hover_scale).with_press_scale(press_scale)
    }

    pub fn with_press_scale(mut self, scale: f32) -> Self {
        self.press_scale = Some(scale);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_spring(self, spring: SpringConfig) -> Self {
        self.with_transition(Transition::spring(spring))
    }

    pub fn target(&self, state: ButtonState) -> f32 {
        match state {
            ButtonState::Idle => 1.0,
            ButtonState::Hovered => self.hover_scale,
            ButtonState::Pressed => self.press_scale.unwrap_or(self.hover_scale),
        }
    }

    /// Finite scales and, for springs, positive stiffness, damping and mass
    pub fn is_valid(&self) -> bool {
        let scales_finite =
            self.hover_scale.is_finite() && self.press_scale.map_or(true, f32::is_finite);
        let transition_valid = match self.transition {
            Transition::Spring(spring) => spring.is_valid(),
            Transition::Timed { .. } => true,
        };
        scales_finite && transition_valid
    }
}

/// Timed scale change from wherever the last state change caught it
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween {
    from: f32,
    to: f32,
    elapsed_ms: f32,
    duration_ms: u64,
    easing: Easing,
}

impl Tween {
    fn at_rest(value: f32, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from: value,
            to: value,
            elapsed_ms: duration_ms as f32,
            duration_ms,
            easing,
        }
    }

    fn is_settled(&self) -> bool {
        self.elapsed_ms >= self.duration_ms as f32
    }

    fn value(&self) -> f32 {
        if self.is_settled() {
            return self.to;
        }
        let t = self.elapsed_ms / self.duration_ms as f32;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    fn set_target(&mut self, to: f32) {
        self.from = self.value();
        self.to = to;
        self.elapsed_ms = 0.0;
    }

    fn step(&mut self, dt: f32) {
        self.elapsed_ms = (self.elapsed_ms + dt * 1000.0).min(self.duration_ms as f32);
    }
}

#[derive(Clone, Debug)]
enum ScaleMotion {
    Spring(Spring),
    Tween(Tween),
}

/// Emphasis state plus the motion animating its scale factor
#[derive(Clone, Debug)]
pub struct InteractiveLayer {
    emphasis: Emphasis,
    state: ButtonState,
    scale: ScaleMotion,
}

impl InteractiveLayer {
    pub fn new(emphasis: Emphasis) -> Self {
        let scale = match emphasis.transition {
            Transition::Spring(config) => {
                ScaleMotion::Spring(Spring::new(config, 1.0).with_rest_epsilon(0.0005, 0.005))
            }
            Transition::Timed {
                duration_ms,
                easing,
            } => ScaleMotion::Tween(Tween::at_rest(1.0, duration_ms, easing)),
        };
        Self {
            emphasis,
            state: ButtonState::Idle,
            scale,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn emphasis(&self) -> &Emphasis {
        &self.emphasis
    }

    /// Current scale factor
    pub fn scale(&self) -> f32 {
        match &self.scale {
            ScaleMotion::Spring(spring) => spring.value(),
            ScaleMotion::Tween(tween) => tween.value(),
        }
    }

    /// Dispatch a pointer event; returns whether the state changed
    pub fn on_pointer(&mut self, event: PointerEvent) -> bool {
        let Some(next) = self.state.on_event(event) else {
            return false;
        };
        tracing::trace!(from = ?self.state, to = ?next, "emphasis transition");
        self.state = next;
        let target = self.emphasis.target(next);
        match &mut self.scale {
            ScaleMotion::Spring(spring) => spring.set_target(target),
            ScaleMotion::Tween(tween) => tween.set_target(target),
        }
        true
    }

    /// Advance the scale motion by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        match &mut self.scale {
            ScaleMotion::Spring(spring) => spring.step(dt),
            ScaleMotion::Tween(tween) => tween.step(dt),
        }
    }

    pub fn is_settled(&self) -> bool {
        match &self.scale {
            ScaleMotion::Spring(spring) => spring.is_settled(),
            ScaleMotion::Tween(tween) => tween.is_settled(),
        }
    }

    /// Multiply the current emphasis onto an entrance pose
    pub fn compose(&self, pose: Pose) -> Pose {
        pose.scaled_by(self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_animation::Interpolate;

    fn settle(layer: &mut InteractiveLayer) {
        for _ in 0..240 {
            layer.tick(1.0 / 120.0);
        }
    }

    #[test]
    fn test_button_transitions() {
        use PointerEvent::*;
        assert_eq!(ButtonState::Idle.on_event(Enter), Some(ButtonState::Hovered));
        assert_eq!(ButtonState::Idle.on_event(Down), Some(ButtonState::Pressed));
        assert_eq!(ButtonState::Pressed.on_event(Up), Some(ButtonState::Hovered));
        assert_eq!(ButtonState::Pressed.on_event(Leave), Some(ButtonState::Idle));
        assert_eq!(ButtonState::Idle.on_event(Leave), None);
        assert_eq!(ButtonState::Hovered.on_event(Enter), None);
    }

    #[test]
    fn test_press_scale_falls_back_to_hover() {
        let card = Emphasis::card(1.05);
        assert_eq!(card.target(ButtonState::Pressed), 1.05);
        let button = Emphasis::button(1.03, 0.97);
        assert_eq!(button.target(ButtonState::Pressed), 0.97);
        assert_eq!(button.target(ButtonState::Idle), 1.0);
    }

    #[test]
    fn test_hover_scale_settles_and_returns() {
        let mut layer = InteractiveLayer::new(Emphasis::card(1.05));
        assert!(layer.on_pointer(PointerEvent::Enter));
        settle(&mut layer);
        assert!(layer.scale().approx_eq(&1.05, 1e-3));

        assert!(layer.on_pointer(PointerEvent::Leave));
        settle(&mut layer);
        assert!(layer.scale().approx_eq(&1.0, 1e-3));
        assert!(!layer.on_pointer(PointerEvent::Leave));
    }

    #[test]
    fn test_card_hover_is_a_timed_tween() {
        let mut layer = InteractiveLayer::new(Emphasis::card(1.05));
        assert!(layer.is_settled());
        layer.on_pointer(PointerEvent::Enter);
        assert!(!layer.is_settled());

        layer.tick(0.15);
        let halfway = layer.scale();
        assert!(halfway > 1.0 && halfway < 1.05);
        assert!(!layer.is_settled());

        layer.tick(0.2);
        assert!(layer.is_settled());
        assert_eq!(layer.scale(), 1.05);
    }

    #[test]
    fn test_tween_reverses_from_current_scale() {
        let mut layer = InteractiveLayer::new(Emphasis::card(1.05));
        layer.on_pointer(PointerEvent::Enter);
        layer.tick(0.15);
        let caught = layer.scale();

        layer.on_pointer(PointerEvent::Leave);
        assert_eq!(layer.scale(), caught);
        layer.tick(0.1);
        assert!(layer.scale() < caught && layer.scale() > 1.0);
        layer.tick(0.3);
        assert_eq!(layer.scale(), 1.0);
    }

    #[test]
    fn test_button_uses_spring() {
        let button = Emphasis::button(1.03, 0.97);
        assert_eq!(button.transition, Transition::spring(SpringConfig::stiff()));
        let mut layer = InteractiveLayer::new(button);
        layer.on_pointer(PointerEvent::Down);
        layer.tick(1.0 / 120.0);
        assert!(layer.scale() < 1.0);
        settle(&mut layer);
        assert!(layer.scale().approx_eq(&0.97, 1e-3));
    }

    #[test]
    fn test_emphasis_validity() {
        assert!(Emphasis::card(1.05).is_valid());
        assert!(Emphasis::button(1.03, 0.97).is_valid());
        assert!(!Emphasis::new(1.05)
            .with_spring(SpringConfig::new(400.0, 30.0, 0.0))
            .is_valid());
        assert!(!Emphasis::new(f32::NAN).is_valid());
    }

    #[test]
    fn test_compose_multiplies_onto_any_pose() {
        let mut layer = InteractiveLayer::new(Emphasis::card(1.05));
        layer.on_pointer(PointerEvent::Enter);
        settle(&mut layer);

        let hidden = Pose::rise(50.0).with_scale(0.9);
        let composed = layer.compose(hidden);
        assert!(composed.scale.approx_eq(&(0.9 * 1.05), 1e-3));
        assert_eq!(composed.offset, hidden.offset);
        assert_eq!(composed.opacity, hidden.opacity);

        assert!(layer.compose(Pose::VISIBLE).scale.approx_eq(&1.05, 1e-3));
    }
}
