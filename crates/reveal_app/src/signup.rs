//! Signup section: an animated form that turns into a success panel
//!
//! Until the form succeeds the section renders like any other: header, staggered
//! fields and submit button, side panel. After success it renders a single panel
//! that scales in on its own clock, independent of scrolling.

use std::sync::Arc;

use reveal_animation::{Easing, Entrance, Pose, Transition};
use reveal_core::{AnimationState, PointerEvent, RevealResult, Vec2};
use reveal_form::{FormFields, SignupForm, SubmissionConfig, SubmissionState, SubmitOutcome, SubmitTransport};
use reveal_layout::{
    Emphasis, InteractiveLayer, NavAction, Section, SectionConfig, SectionFrame, SectionItem,
};
use tokio::sync::watch;

/// Copy shown once the signup succeeded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessContent {
    pub icon: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub button: &'static str,
}

pub const SUCCESS: SuccessContent = SuccessContent {
    icon: "🎉",
    title: "Welcome to the Community!",
    body: "You're now part of the UAE lifestyle insider circle. Get ready for exclusive \
           guides, events, and the best local tips!",
    button: "Back to Top",
};

/// What the signup section draws this frame
#[derive(Clone, Debug, PartialEq)]
pub enum SignupFrame<'a> {
    Form {
        section: SectionFrame<'a>,
        /// Submit button shows a spinner and ignores clicks
        submitting: bool,
        error: Option<String>,
    },
    Success {
        id: &'a str,
        panel: Pose,
        button: Pose,
        content: &'static SuccessContent,
    },
}

/// Clickable parts of the success panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuccessNode {
    BackToTop,
}

/// A section whose staggered items are form fields
pub struct SignupSection<T> {
    section: Section,
    form: Arc<SignupForm<T>>,
    updates: watch::Receiver<SubmissionState>,
    succeeded_at: Option<u64>,
    panel: Entrance,
    back_to_top: InteractiveLayer,
}

impl<T: SubmitTransport> SignupSection<T> {
    /// Whether a section config describes a form
    pub fn is_form(config: &SectionConfig) -> bool {
        config
            .items
            .iter()
            .any(|item| matches!(item, SectionItem::Field(_) | SectionItem::Submit { .. }))
    }

    pub fn new(config: SectionConfig, transport: T, submission: SubmissionConfig) -> RevealResult<Self> {
        let names: Vec<String> = config
            .items
            .iter()
            .filter_map(|item| match item {
                SectionItem::Field(field) => Some(field.name.clone()),
                _ => None,
            })
            .collect();
        let form = Arc::new(SignupForm::with_fields(
            FormFields::new(names),
            transport,
            submission,
        ));

        Ok(Self {
            section: Section::new(config)?,
            updates: form.subscribe(),
            form,
            succeeded_at: None,
            panel: Entrance::new(
                Pose::hidden(Vec2::ZERO).with_scale(0.9),
                Transition::timed(500, Easing::expo_out()),
            ),
            back_to_top: InteractiveLayer::new(Emphasis::button(1.05, 0.95)),
        })
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn section_mut(&mut self) -> &mut Section {
        &mut self.section
    }

    /// Shared handle for hosts that run submissions on their own tasks
    pub fn form(&self) -> &Arc<SignupForm<T>> {
        &self.form
    }

    pub fn set_field(&self, name: &str, value: impl Into<String>) -> bool {
        self.form.set_field(name, value)
    }

    pub async fn submit(&self) -> RevealResult<SubmitOutcome> {
        self.form.submit().await
    }

    pub fn is_succeeded(&self) -> bool {
        self.succeeded_at.is_some()
    }

    /// Pick up submission state changes; starts the success panel clock
    pub fn sync(&mut self, now_ms: u64) {
        if !self.updates.has_changed().unwrap_or(false) {
            return;
        }
        let succeeded = self.updates.borrow_and_update().is_success();
        if succeeded && self.succeeded_at.is_none() {
            tracing::debug!(section = %self.section.id(), at_ms = now_ms, "signup succeeded");
            self.succeeded_at = Some(now_ms);
        }
    }

    /// Advance emphasis motion by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.section.tick(dt);
        self.back_to_top.tick(dt);
    }

    pub fn on_success_pointer(&mut self, node: SuccessNode, event: PointerEvent) -> bool {
        match node {
            SuccessNode::BackToTop if self.is_succeeded() => self.back_to_top.on_pointer(event),
            _ => false,
        }
    }

    pub fn click_success(&self, node: SuccessNode) -> Option<NavAction> {
        match node {
            SuccessNode::BackToTop if self.is_succeeded() => Some(NavAction::ScrollToTop),
            _ => None,
        }
    }

    pub fn frame(&self, now_ms: u64) -> SignupFrame<'_> {
        match self.succeeded_at {
            Some(at) => {
                let elapsed = Some(now_ms.saturating_sub(at));
                let panel = self.panel.pose_at(AnimationState::Visible, 0, elapsed);
                SignupFrame::Success {
                    id: self.section.id(),
                    panel,
                    button: self.back_to_top.compose(panel),
                    content: &SUCCESS,
                }
            }
            None => {
                let state = self.form.state();
                SignupFrame::Form {
                    section: self.section.frame(now_ms),
                    submitting: state.is_submitting(),
                    error: state.error().map(str::to_owned),
                }
            }
        }
    }

    pub fn is_settled(&self, now_ms: u64) -> bool {
        match self.succeeded_at {
            Some(at) => {
                self.panel
                    .is_settled_at(AnimationState::Visible, 0, Some(now_ms.saturating_sub(at)))
                    && self.back_to_top.is_settled()
            }
            None => self.section.is_settled(now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_form::MockTransport;
    use std::time::Duration;

    fn signup() -> SignupSection<MockTransport> {
        SignupSection::new(
            SectionConfig::community(),
            MockTransport::new(Duration::from_millis(10)),
            SubmissionConfig::default(),
        )
        .unwrap()
    }

    fn fill(section: &SignupSection<MockTransport>) {
        assert!(section.set_field("name", "Ava"));
        assert!(section.set_field("email", "ava@example.com"));
        assert!(section.set_field("travel_interest", "Luxury Experiences"));
    }

    #[test]
    fn test_community_preset_is_a_form() {
        assert!(SignupSection::<MockTransport>::is_form(&SectionConfig::community()));
        assert!(!SignupSection::<MockTransport>::is_form(&SectionConfig::beaches()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_swaps_in_panel() {
        let mut section = signup();
        fill(&section);

        assert_eq!(section.submit().await, Ok(SubmitOutcome::Succeeded));
        section.sync(5_000);
        assert!(section.is_succeeded());

        match section.frame(5_000) {
            SignupFrame::Success { panel, content, .. } => {
                assert_eq!(panel.opacity, 0.0);
                assert_eq!(panel.scale, 0.9);
                assert_eq!(content.button, "Back to Top");
            }
            other => panic!("expected success panel, got {other:?}"),
        }
        match section.frame(5_500) {
            SignupFrame::Success { panel, .. } => assert_eq!(panel, Pose::VISIBLE),
            other => panic!("expected success panel, got {other:?}"),
        }
        assert!(section.is_settled(5_500));
        assert_eq!(
            section.click_success(SuccessNode::BackToTop),
            Some(NavAction::ScrollToTop)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_form_with_error() {
        let mut section = signup();
        fill(&section);
        section.form().machine().transport().fail_next("network error");

        assert_eq!(
            section.submit().await,
            Ok(SubmitOutcome::Failed("network error".into()))
        );
        section.sync(2_000);

        match section.frame(2_000) {
            SignupFrame::Form { submitting, error, .. } => {
                assert!(!submitting);
                assert_eq!(error.as_deref(), Some("network error"));
            }
            other => panic!("expected form, got {other:?}"),
        }
        assert_eq!(section.form().field("name").as_deref(), Some("Ava"));
        assert_eq!(section.click_success(SuccessNode::BackToTop), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitting_flag_while_in_flight() {
        let section = signup();
        fill(&section);

        let probe = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            match section.frame(100) {
                SignupFrame::Form { submitting, .. } => submitting,
                SignupFrame::Success { .. } => false,
            }
        };
        let (outcome, submitting) = tokio::join!(section.submit(), probe);
        assert_eq!(outcome, Ok(SubmitOutcome::Succeeded));
        assert!(submitting);
    }
}
