//! Reveal Layout
//!
//! Section-level composition of viewport-triggered entrances.
//!
//! # Modules
//!
//! - [`motion`]: Standalone tracks and staggered groups sampled from section time
//! - [`interactive`]: Hover/press emphasis layered on top of entrance poses
//! - [`content`]: Static cards, form fields and panels a section displays
//! - [`config`]: Serializable section descriptions and the built-in presets
//! - [`section`]: The runtime section and the per-frame output handed to hosts
//! - [`nav`]: Click-driven scroll actions and the host scroll boundary

pub mod config;
pub mod content;
pub mod interactive;
pub mod motion;
pub mod nav;
pub mod section;

pub use config::{AsideConfig, CtaConfig, HeaderConfig, ItemMotion, SectionConfig, TrackMotion};
pub use content::{
    AsideContent, CtaContent, DisplayItem, FieldSpec, HeaderContent, InputKind, MediaRef, Perk,
    SectionItem,
};
pub use interactive::{ButtonState, Emphasis, InteractiveLayer, StateTransitions};
pub use motion::{GroupPoses, MotionTrack, StaggeredGroup};
pub use nav::{NavAction, ScrollTarget};
pub use section::{NodeContent, NodeKey, RenderedNode, Section, SectionFrame};
