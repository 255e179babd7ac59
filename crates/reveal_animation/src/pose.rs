//! Animatable poses and interpolation

use reveal_core::Vec2;
use serde::{Deserialize, Serialize};

/// Trait for values that can be interpolated
pub trait Interpolate: Clone {
    /// Linear interpolation between self and other
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Vec2 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec2::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

/// Presentation of one element: translation, opacity and scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default = "one")]
    pub scale: f32,
}

fn one() -> f32 {
    1.0
}

impl Pose {
    /// Fully shown at its layout position
    pub const VISIBLE: Pose = Pose {
        offset: Vec2::ZERO,
        opacity: 1.0,
        scale: 1.0,
    };

    /// Transparent and displaced by `offset`
    pub fn hidden(offset: Vec2) -> Self {
        Self {
            offset,
            opacity: 0.0,
            scale: 1.0,
        }
    }

    /// Hidden below its resting position
    pub fn rise(offset_y: f32) -> Self {
        Self::hidden(Vec2::new(0.0, offset_y))
    }

    /// Hidden beside its resting position
    pub fn slide(offset_x: f32) -> Self {
        Self::hidden(Vec2::new(offset_x, 0.0))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Compose an emphasis factor on top of this pose
    pub fn scaled_by(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl Interpolate for Pose {
    /// Offset and scale may overshoot with `t` outside [0, 1]; opacity never leaves [0, 1]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            offset: self.offset.lerp(&other.offset, t),
            opacity: self.opacity.lerp(&other.opacity, t).clamp(0.0, 1.0),
            scale: self.scale.lerp(&other.scale, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.offset.approx_eq(&other.offset, epsilon)
            && self.opacity.approx_eq(&other.opacity, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
    }
}
