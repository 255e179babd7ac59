//! Damped springs
//!
//! Two ways to drive a spring:
//!
//! - [`Spring`]: RK4-integrated, stepped by the host every frame. Interruptible,
//!   keeps its velocity when the target changes (hover/tap emphasis).
//! - [`SpringConfig::response`]: closed-form unit step response of the damped
//!   harmonic oscillator. Pure in elapsed time, which is what entrance poses need.
//!
//! The closed form solves `x'' + 2ζω₀x' + ω₀²x = ω₀²` from rest at 0, with
//! `ω₀ = √(k/m)` and `ζ = c / (2√(km))`.

use serde::{Deserialize, Serialize};

/// Normalized displacement below which an entrance spring counts as settled
const RESPONSE_POSITION_EPSILON: f32 = 0.001;
/// Normalized speed (fraction of travel per second) below which it counts as settled
const RESPONSE_VELOCITY_EPSILON: f32 = 0.01;

/// Stiffness, damping and mass of a damped spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
}

fn default_mass() -> f32 {
    1.0
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Section entrance spring (critically damped, settles in under a second)
    pub fn entrance() -> Self {
        Self {
            stiffness: 100.0,
            damping: 20.0,
            mass: 1.0,
        }
    }

    /// Softer entrance for larger cards (slightly overdamped)
    pub fn soft_entrance() -> Self {
        Self {
            stiffness: 80.0,
            damping: 20.0,
            mass: 1.0,
        }
    }

    /// Slow, barely-oscillating spring
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            mass: 1.0,
        }
    }

    /// Visible overshoot and rebound
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
        }
    }

    /// Fast and tight, used for hover and press emphasis
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// All three parameters positive and finite
    pub fn is_valid(&self) -> bool {
        [self.stiffness, self.damping, self.mass]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Damping at which the spring stops oscillating: `2√(km)`
    pub fn critical_damping(&self) -> f32 {
        2.0 * self.stiffness.sqrt() * self.mass.sqrt()
    }

    /// Damping ratio ζ
    pub fn damping_ratio(&self) -> f32 {
        self.damping / self.critical_damping()
    }

    /// Natural frequency ω₀ in rad/s
    pub fn natural_frequency(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// ζ within 0.001 of 1
    pub fn is_critically_damped(&self) -> bool {
        (self.damping_ratio() - 1.0).abs() < 1e-3
    }

    pub fn is_underdamped(&self) -> bool {
        !self.is_critically_damped() && self.damping_ratio() < 1.0
    }

    pub fn is_overdamped(&self) -> bool {
        !self.is_critically_damped() && self.damping_ratio() > 1.0
    }

    /// Unit step response at `t_secs`: position travels 0 → 1
    pub fn response(&self, t_secs: f32) -> SpringResponse {
        let t = t_secs.max(0.0);
        let omega_0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        let (position, velocity, envelope) = if self.is_critically_damped() {
            let decay = (-omega_0 * t).exp();
            let position = 1.0 - decay * (1.0 + omega_0 * t);
            let velocity = omega_0 * omega_0 * t * decay;
            // Both terms decay monotonically already
            (position, velocity, (1.0 - position, velocity))
        } else if zeta < 1.0 {
            let root = (1.0 - zeta * zeta).sqrt();
            let omega_d = omega_0 * root;
            let decay = (-zeta * omega_0 * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            let position = 1.0 - decay * (cos + (zeta / root) * sin);
            let velocity = decay * (omega_0 / root) * sin;
            (position, velocity, (decay / root, decay * omega_0 / root))
        } else {
            // Two real roots r_slow > r_fast, both negative; kept as separate
            // exponentials so large `t` underflows to 0 instead of 0 * inf
            let gamma = omega_0 * (zeta * zeta - 1.0).sqrt();
            let r_slow = -zeta * omega_0 + gamma;
            let r_fast = -zeta * omega_0 - gamma;
            let (e_slow, e_fast) = ((r_slow * t).exp(), (r_fast * t).exp());
            let position = 1.0 + (r_fast * e_slow - r_slow * e_fast) / (2.0 * gamma);
            let velocity = r_slow * r_fast * (e_slow - e_fast) / (2.0 * gamma);
            (position, velocity, (1.0 - position, velocity))
        };

        // Settling is judged on the decay envelope so it never flips back
        let settled = envelope.0.abs() < RESPONSE_POSITION_EPSILON
            && envelope.1.abs() < RESPONSE_VELOCITY_EPSILON;

        SpringResponse {
            position: if settled { 1.0 } else { position },
            velocity: if settled { 0.0 } else { velocity },
            settled,
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::entrance()
    }
}

/// Sample of a spring's unit step response
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringResponse {
    /// Fraction of travel covered (may overshoot 1 for underdamped springs)
    pub position: f32,
    /// Fraction of travel per second
    pub velocity: f32,
    pub settled: bool,
}

/// Stateful spring stepped once per frame
///
/// Retargeting keeps the current velocity, so interrupted motion stays smooth.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    epsilon: f32,
    velocity_epsilon: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            // Pixel-scale defaults: within 0.5px and under 5px/s is imperceptible
            epsilon: 0.5,
            velocity_epsilon: 5.0,
        }
    }

    /// Override the rest thresholds (use small values for unit-scale properties)
    pub fn with_rest_epsilon(mut self, epsilon: f32, velocity_epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self.velocity_epsilon = velocity_epsilon;
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to a value with no motion
    pub fn set_immediate(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Close enough to the target and slow enough to stop
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.epsilon
            && self.velocity.abs() < self.velocity_epsilon
    }

    /// Advance by `dt` seconds (classic fourth-order Runge-Kutta)
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.set_immediate(self.target);
            return;
        }

        let (x, v) = (self.value, self.velocity);
        let (dx1, dv1) = self.derivative(x, v);
        let (dx2, dv2) = self.derivative(x + dx1 * dt / 2.0, v + dv1 * dt / 2.0);
        let (dx3, dv3) = self.derivative(x + dx2 * dt / 2.0, v + dv2 * dt / 2.0);
        let (dx4, dv4) = self.derivative(x + dx3 * dt, v + dv3 * dt);

        self.value = x + dt / 6.0 * (dx1 + 2.0 * (dx2 + dx3) + dx4);
        self.velocity = v + dt / 6.0 * (dv1 + 2.0 * (dv2 + dv3) + dv4);
    }

    /// `(dx/dt, dv/dt)` at position `x` moving at `v`
    fn derivative(&self, x: f32, v: f32) -> (f32, f32) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (v, (stiffness * (self.target - x) - damping * v) / mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_spring_reaches_pixel_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(240.0);

        let mut frames = 0;
        while !spring.is_settled() && frames < 600 {
            spring.step(1.0 / 60.0);
            frames += 1;
        }

        assert!(frames < 120, "took {frames} frames");
        spring.step(1.0 / 60.0);
        assert_eq!(spring.value(), 240.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_momentum() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(100.0);
        for _ in 0..6 {
            spring.step(1.0 / 60.0);
        }
        let before = (spring.value(), spring.velocity());
        assert!(before.1 > 0.0);

        spring.set_target(0.0);
        assert_eq!((spring.value(), spring.velocity()), before);
        spring.step(1.0 / 60.0);
        assert!(spring.velocity() < before.1);
    }

    #[test]
    fn test_unit_scale_epsilon() {
        let mut spring = Spring::new(SpringConfig::stiff(), 1.0).with_rest_epsilon(0.001, 0.01);
        spring.set_target(1.05);
        // The pixel-scale default would call a 0.05 gap settled
        assert!(!spring.is_settled());

        for _ in 0..240 {
            spring.step(1.0 / 120.0);
        }
        assert!(spring.is_settled());
        assert!((spring.value() - 1.05).abs() < 0.001);
    }

    #[test]
    fn test_entrance_presets() {
        assert!(SpringConfig::entrance().is_critically_damped());
        assert!(SpringConfig::soft_entrance().is_overdamped());
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::default().is_valid());
        assert!(!SpringConfig::new(0.0, 20.0, 1.0).is_valid());
        assert!(!SpringConfig::new(100.0, f32::NAN, 1.0).is_valid());
    }

    #[test]
    fn test_response_starts_at_rest() {
        for config in [
            SpringConfig::entrance(),
            SpringConfig::soft_entrance(),
            SpringConfig::wobbly(),
        ] {
            let start = config.response(0.0);
            assert!(start.position.abs() < 1e-6);
            assert!(start.velocity.abs() < 1e-6);
            assert!(!start.settled);
        }
    }

    #[test]
    fn test_response_settles_for_every_damping_regime() {
        for config in [
            SpringConfig::entrance(),
            SpringConfig::soft_entrance(),
            SpringConfig::wobbly(),
            SpringConfig::gentle(),
        ] {
            let end = config.response(5.0);
            assert!(end.settled, "{config:?} should settle within 5s");
            assert_eq!(end.position, 1.0);
        }
    }

    #[test]
    fn test_response_matches_rk4_integration() {
        let config = SpringConfig::wobbly();
        let mut spring = Spring::new(config, 0.0).with_rest_epsilon(1e-6, 1e-6);
        spring.set_target(1.0);

        let dt = 1.0 / 240.0;
        for step in 1..=120 {
            spring.step(dt);
            let analytic = config.response(step as f32 * dt);
            assert!(
                (spring.value() - analytic.position).abs() < 1e-3,
                "diverged at step {step}"
            );
        }
    }

    #[test]
    fn test_underdamped_overshoots() {
        let config = SpringConfig::wobbly();
        let peak = (1..200)
            .map(|ms| config.response(ms as f32 * 0.005).position)
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_settling_is_monotonic() {
        let config = SpringConfig::wobbly();
        let mut was_settled = false;
        for ms in 0..3_000 {
            let settled = config.response(ms as f32 / 1000.0).settled;
            assert!(!(was_settled && !settled), "unsettled again at {ms}ms");
            was_settled |= settled;
        }
        assert!(was_settled);
    }
}
