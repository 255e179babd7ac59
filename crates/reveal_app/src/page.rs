//! Page orchestration
//!
//! The page registers every section with a [`VisibilityObserver`], receives
//! transitions as [`VisibilityChange`] messages over a channel, and applies
//! them in arrival order on the next [`Page::update`]. Sections never hear from
//! the observer directly.
//!
//! ```text
//!   host scroll ─▶ observer ─▶ mpsc ─▶ Page::update ─▶ Section controller
//!                                                          │
//!                               host draw ◀─ Page::frames ◀┘
//! ```

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use reveal_core::{
    PointerEvent, PollingObserver, Rect, RectMeasure, RegionId, RevealError, RevealResult,
    Subscription, VisibilityChange, VisibilityObserver,
};
use reveal_form::SubmitTransport;
use reveal_layout::{NavAction, NodeKey, ScrollTarget, Section, SectionFrame};
use tracing::{debug, trace, warn};

use crate::config::PageConfig;
use crate::signup::{SignupFrame, SignupSection};

/// A mounted section, plain or form-backed
pub enum PageSection<T> {
    Plain(Section),
    Signup(SignupSection<T>),
}

impl<T: SubmitTransport> PageSection<T> {
    pub fn section(&self) -> &Section {
        match self {
            PageSection::Plain(section) => section,
            PageSection::Signup(signup) => signup.section(),
        }
    }

    pub fn section_mut(&mut self) -> &mut Section {
        match self {
            PageSection::Plain(section) => section,
            PageSection::Signup(signup) => signup.section_mut(),
        }
    }

    pub fn as_signup(&self) -> Option<&SignupSection<T>> {
        match self {
            PageSection::Signup(signup) => Some(signup),
            PageSection::Plain(_) => None,
        }
    }

    pub fn as_signup_mut(&mut self) -> Option<&mut SignupSection<T>> {
        match self {
            PageSection::Signup(signup) => Some(signup),
            PageSection::Plain(_) => None,
        }
    }
}

/// One section's output for one frame
#[derive(Clone, Debug, PartialEq)]
pub enum PageFrame<'a> {
    Section(SectionFrame<'a>),
    Signup(SignupFrame<'a>),
}

impl<'a> PageFrame<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            PageFrame::Section(frame) => frame.id,
            PageFrame::Signup(SignupFrame::Form { section, .. }) => section.id,
            PageFrame::Signup(SignupFrame::Success { id, .. }) => *id,
        }
    }
}

struct Mounted<T> {
    section: PageSection<T>,
    // Dropped with the section, which stops observation
    _subscription: Subscription,
}

/// All sections of a page wired to one observer
pub struct Page<O, T> {
    observer: O,
    sections: Vec<Mounted<Arc<T>>>,
    changes: Receiver<VisibilityChange>,
}

impl<O: VisibilityObserver, T: SubmitTransport> Page<O, T> {
    /// Mount every configured section; form sections share `transport`
    pub fn new(mut observer: O, config: PageConfig, transport: T) -> RevealResult<Self> {
        config.validate()?;
        let transport = Arc::new(transport);
        let (tx, changes) = mpsc::channel();

        let mut sections = Vec::with_capacity(config.sections.len());
        for section_config in config.sections {
            let region = section_config.region()?;
            let mut section = if SignupSection::<Arc<T>>::is_form(&section_config) {
                PageSection::Signup(SignupSection::new(
                    section_config,
                    Arc::clone(&transport),
                    config.form,
                )?)
            } else {
                PageSection::Plain(Section::new(section_config)?)
            };

            let subscription = observer.observe_changes(region, tx.clone());
            section.section_mut().bind(subscription.region());
            debug!(
                section = %section.section().id(),
                region = ?subscription.region(),
                "section mounted"
            );
            sections.push(Mounted {
                section,
                _subscription: subscription,
            });
        }

        Ok(Self {
            observer,
            sections,
            changes,
        })
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|mounted| mounted.section.section().id())
    }

    pub fn get(&self, id: &str) -> Option<&PageSection<Arc<T>>> {
        self.sections
            .iter()
            .map(|mounted| &mounted.section)
            .find(|section| section.section().id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PageSection<Arc<T>>> {
        self.sections
            .iter_mut()
            .map(|mounted| &mut mounted.section)
            .find(|section| section.section().id() == id)
    }

    /// The first form-backed section, if any
    pub fn signup(&self) -> Option<&SignupSection<Arc<T>>> {
        self.sections
            .iter()
            .find_map(|mounted| mounted.section.as_signup())
    }

    fn by_region(&mut self, region: RegionId) -> Option<&mut PageSection<Arc<T>>> {
        self.sections
            .iter_mut()
            .map(|mounted| &mut mounted.section)
            .find(|section| section.section().region() == Some(region))
    }

    /// Unmount a section; its region stops being observed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.sections.len();
        self.sections
            .retain(|mounted| mounted.section.section().id() != id);
        let removed = self.sections.len() != before;
        if removed {
            debug!(section = id, "section unmounted");
        }
        removed
    }

    /// Apply queued visibility changes in arrival order, then sync form state
    ///
    /// Returns how many section transitions happened.
    pub fn update(&mut self, now_ms: u64) -> usize {
        let mut applied = 0;
        while let Ok(change) = self.changes.try_recv() {
            match self.by_region(change.region) {
                Some(section) => {
                    if section
                        .section_mut()
                        .on_visibility(change.visible, now_ms)
                        .is_some()
                    {
                        applied += 1;
                    }
                }
                None => trace!(region = ?change.region, "change for unmounted region dropped"),
            }
        }

        for mounted in &mut self.sections {
            if let Some(signup) = mounted.section.as_signup_mut() {
                signup.sync(now_ms);
            }
        }
        applied
    }

    /// Advance pointer emphasis by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for mounted in &mut self.sections {
            match &mut mounted.section {
                PageSection::Plain(section) => section.tick(dt),
                PageSection::Signup(signup) => signup.tick(dt),
            }
        }
    }

    /// Route pointer input to a node of a section
    pub fn on_pointer(&mut self, id: &str, key: NodeKey, event: PointerEvent) -> bool {
        self.get_mut(id)
            .map(|section| section.section_mut().on_pointer(key, event))
            .unwrap_or(false)
    }

    /// Navigation requested by clicking a node of a section
    pub fn click(&self, id: &str, key: NodeKey) -> Option<NavAction> {
        self.get(id).and_then(|section| section.section().click(key))
    }

    /// Sample every section at `now_ms`, in page order
    pub fn frames(&self, now_ms: u64) -> Vec<PageFrame<'_>> {
        self.sections
            .iter()
            .map(|mounted| match &mounted.section {
                PageSection::Plain(section) => PageFrame::Section(section.frame(now_ms)),
                PageSection::Signup(signup) => PageFrame::Signup(signup.frame(now_ms)),
            })
            .collect()
    }

    /// Whether nothing on the page is still moving
    pub fn is_settled(&self, now_ms: u64) -> bool {
        self.sections.iter().all(|mounted| match &mounted.section {
            PageSection::Plain(section) => section.is_settled(now_ms),
            PageSection::Signup(signup) => signup.is_settled(now_ms),
        })
    }
}

/// Scroll-driven pages on hosts without intersection callbacks
impl<T: SubmitTransport> Page<PollingObserver<RectMeasure>, T> {
    /// Record where a section sits in page coordinates
    pub fn set_bounds(&mut self, id: &str, bounds: Rect) -> RevealResult<()> {
        let region = self
            .get(id)
            .and_then(|section| section.section().region())
            .ok_or_else(|| RevealError::config(format!("no section with id `{id}`")))?;
        self.observer.measure_mut().set_bounds(region, bounds);
        Ok(())
    }

    /// Move the viewport and poll; returns how many visibility changes fired
    pub fn scroll_to(&mut self, y: f32) -> usize {
        self.observer.measure_mut().scroll_to(y);
        self.observer.poll()
    }

    /// Perform a click's navigation; unknown targets are logged, not fatal
    pub fn follow(&mut self, action: &NavAction) -> bool {
        match action.perform(self) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, ?action, "navigation failed");
                false
            }
        }
    }
}

impl<T: SubmitTransport> ScrollTarget for Page<PollingObserver<RectMeasure>, T> {
    fn scroll_to_section(&mut self, id: &str) -> RevealResult<()> {
        let region = self
            .get(id)
            .and_then(|section| section.section().region())
            .ok_or_else(|| RevealError::config(format!("no section with id `{id}`")))?;
        let bounds = self
            .observer
            .measure()
            .bounds(region)
            .ok_or(RevealError::ObservationUnavailable { region })?;
        self.scroll_to(bounds.y());
        Ok(())
    }

    fn scroll_to_top(&mut self) {
        self.scroll_to(0.0);
    }
}
