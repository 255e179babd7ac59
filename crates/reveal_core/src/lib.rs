//! Reveal Core Runtime
//!
//! This crate provides the foundational primitives for viewport-triggered
//! entrance animations:
//!
//! - **Visibility Observation**: Threshold-gated "is this region in view" signals
//!   with fire-once and repeatable semantics
//! - **Animation Controller**: The per-section `Hidden`/`Visible` state machine
//! - **Events**: Discrete pointer and visibility messages dispatched to state machines
//! - **Geometry**: Minimal 2D types shared by the animation and layout crates
//!
//! # Example
//!
//! ```rust
//! use reveal_core::visibility::{IntersectionObserver, VisibilityObserver, VisibilityRegion};
//! use std::sync::{Arc, Mutex};
//!
//! let mut observer = IntersectionObserver::new();
//! let region = VisibilityRegion::new(0.3, true).unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let subscription = observer.observe(region, move |visible| {
//!     sink.lock().unwrap().push(visible);
//! });
//!
//! for fraction in [0.0, 0.5, 0.1, 0.4] {
//!     observer.deliver(subscription.region(), Some(fraction));
//! }
//! assert_eq!(*seen.lock().unwrap(), vec![true, false, true]);
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod visibility;

pub use controller::{AnimationController, AnimationState, ControllerTransition};
pub use error::{RevealError, RevealResult};
pub use events::{PointerEvent, VisibilityChange};
pub use geometry::{Point, Rect, Size, Vec2};
pub use visibility::{
    visible_fraction, IntersectionObserver, Measure, PollingObserver, RectMeasure, RegionId,
    Subscription, VisibilityObserver, VisibilityRegion,
};
