//! Reveal Animation System
//!
//! Time-driven animation primitives for section entrances and pointer emphasis.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs plus a closed-form step response
//! - **Easing**: Standard curves and CSS-style cubic beziers
//! - **Poses**: Offset, opacity and scale with interpolation
//! - **Entrances**: Pure `(state, delay, elapsed) -> pose` sampling
//! - **Stagger**: Index-ordered start offsets for sibling groups

pub mod easing;
pub mod entrance;
pub mod pose;
pub mod spring;
pub mod stagger;
pub mod transition;

pub use easing::Easing;
pub use entrance::Entrance;
pub use pose::{Interpolate, Pose};
pub use spring::{Spring, SpringConfig, SpringResponse};
pub use stagger::StaggerConfig;
pub use transition::{Progress, Transition};
