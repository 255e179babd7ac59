//! Reveal Application
//!
//! Wires sections, an observer backend and a submission transport into one page.
//!
//! # Example
//!
//! ```ignore
//! use reveal_app::prelude::*;
//!
//! reveal_app::init_tracing();
//!
//! let config = PageConfig::load(Path::new("page.toml"))?;
//! let mut page = Page::new(IntersectionObserver::new(), config, MockTransport::default())?;
//!
//! // Host loop
//! page.observer().deliver(region, Some(fraction));
//! page.update(now_ms);
//! page.tick(dt);
//! for frame in page.frames(now_ms) {
//!     draw(frame);
//! }
//! ```

pub mod config;
pub mod page;
pub mod signup;


pub use config::PageConfig;
pub use page::{Page, PageFrame, PageSection};
pub use signup::{SignupFrame, SignupSection, SuccessContent, SuccessNode, SUCCESS};

use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber filtered by `RUST_LOG` (default `info`)
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Commonly used types
pub mod prelude {
    pub use crate::{init_tracing, Page, PageConfig, PageFrame, SignupFrame};
    pub use reveal_animation::{Easing, Pose, SpringConfig, StaggerConfig, Transition};
    pub use reveal_core::{
        AnimationState, IntersectionObserver, PointerEvent, PollingObserver, Rect, RectMeasure,
        RevealError, RevealResult, VisibilityObserver,
    };
    pub use reveal_form::{MockTransport, SubmissionConfig, SubmissionState, SubmitOutcome};
    pub use reveal_layout::{NavAction, NodeKey, ScrollTarget, SectionConfig};
}
