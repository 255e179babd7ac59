//! Section configuration
//!
//! One [`SectionConfig`] describes a whole section: how it is observed, what it
//! shows and how each part enters. The built-in presets reproduce the UAE
//! lifestyle landing page (beach clubs, explore categories, community signup).

use reveal_animation::{Easing, Entrance, Pose, SpringConfig, StaggerConfig, Transition};
use reveal_core::{RevealError, RevealResult, Vec2, VisibilityRegion};
use serde::{Deserialize, Serialize};

use crate::content::{
    AsideContent, CtaContent, DisplayItem, FieldSpec, HeaderContent, InputKind, MediaRef, Perk,
    SectionItem,
};
use crate::interactive::Emphasis;
use crate::motion::{MotionTrack, StaggeredGroup};
use crate::nav::NavAction;

/// Spring entrance shared by every staggered item
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemMotion {
    #[serde(default = "default_item_offset")]
    pub offset_y: f32,
    #[serde(default)]
    pub spring: SpringConfig,
}

fn default_item_offset() -> f32 {
    50.0
}

impl Default for ItemMotion {
    fn default() -> Self {
        Self {
            offset_y: default_item_offset(),
            spring: SpringConfig::default(),
        }
    }
}

impl ItemMotion {
    pub fn new(offset_y: f32, spring: SpringConfig) -> Self {
        Self { offset_y, spring }
    }
}

/// Entrance of a standalone node (header, call-to-action, side panel)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackMotion {
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default = "default_track_offset")]
    pub offset_y: f32,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_track_transition")]
    pub transition: Transition,
}

fn default_track_offset() -> f32 {
    30.0
}

fn default_track_transition() -> Transition {
    Transition::timed(600, Easing::EaseOut)
}

impl Default for TrackMotion {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: default_track_offset(),
            delay_ms: 0,
            transition: default_track_transition(),
        }
    }
}

impl TrackMotion {
    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Slide in from the side instead of rising
    pub fn slide(offset_x: f32, delay_ms: u64, transition: Transition) -> Self {
        Self {
            offset_x,
            offset_y: 0.0,
            delay_ms,
            transition,
        }
    }

    pub fn track(&self) -> MotionTrack {
        let hidden = Pose::hidden(Vec2::new(self.offset_x, self.offset_y));
        MotionTrack::new(Entrance::new(hidden, self.transition), self.delay_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(flatten)]
    pub content: HeaderContent,
    #[serde(default)]
    pub motion: TrackMotion,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CtaConfig {
    #[serde(flatten)]
    pub content: CtaContent,
    #[serde(default = "default_cta_motion")]
    pub motion: TrackMotion,
    #[serde(default)]
    pub hover: Option<Emphasis>,
}

fn default_cta_motion() -> TrackMotion {
    TrackMotion::default().delay(800)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsideConfig {
    #[serde(flatten)]
    pub content: AsideContent,
    #[serde(default = "default_aside_motion")]
    pub motion: TrackMotion,
}

/// Opacity fade of the element wrapping the items (grid or form)
pub fn container_fade() -> Transition {
    Transition::timed(300, Easing::EaseOut)
}

fn default_aside_motion() -> TrackMotion {
    TrackMotion::slide(50.0, 500, Transition::timed(800, Easing::expo_out()))
}

/// Complete description of one page section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Anchor id, also the target of scroll actions
    pub id: String,

    /// Fraction of the section that must be on screen to count as visible
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Replay the entrance every time the section scrolls back into view
    #[serde(default = "default_repeatable")]
    pub repeatable: bool,

    #[serde(default)]
    pub stagger: StaggerConfig,

    #[serde(default)]
    pub item: ItemMotion,

    /// Fade of the items' container from transparent, started with the entrance
    #[serde(default)]
    pub container: Option<Transition>,

    /// Emphasis applied to card items under the pointer
    #[serde(default)]
    pub item_hover: Option<Emphasis>,

    /// Emphasis applied to the submit item
    #[serde(default)]
    pub submit_hover: Option<Emphasis>,

    #[serde(default)]
    pub header: HeaderConfig,

    #[serde(default)]
    pub items: Vec<SectionItem>,

    #[serde(default)]
    pub cta: Option<CtaConfig>,

    #[serde(default)]
    pub aside: Option<AsideConfig>,
}

fn default_threshold() -> f32 {
    0.3
}

fn default_repeatable() -> bool {
    true
}

impl SectionConfig {
    /// Empty section with default observation and motion
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            threshold: default_threshold(),
            repeatable: default_repeatable(),
            stagger: StaggerConfig::default(),
            item: ItemMotion::default(),
            container: None,
            item_hover: None,
            submit_hover: None,
            header: HeaderConfig::default(),
            items: Vec::new(),
            cta: None,
            aside: None,
        }
    }

    pub fn with_stagger(mut self, base_delay_ms: u64, per_item_delay_ms: u64) -> Self {
        self.stagger = StaggerConfig::new(base_delay_ms, per_item_delay_ms);
        self
    }

    pub fn with_item_motion(mut self, offset_y: f32, spring: SpringConfig) -> Self {
        self.item = ItemMotion::new(offset_y, spring);
        self
    }

    pub fn with_container_fade(mut self, transition: Transition) -> Self {
        self.container = Some(transition);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn once(mut self) -> Self {
        self.repeatable = false;
        self
    }

    pub fn with_header(
        mut self,
        highlight: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        self.header.content = HeaderContent {
            highlight: highlight.into(),
            title: title.into(),
            subtitle: subtitle.into(),
        };
        self
    }

    pub fn with_item(mut self, item: SectionItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_item_hover(mut self, emphasis: Emphasis) -> Self {
        self.item_hover = Some(emphasis);
        self
    }

    pub fn with_cta(
        mut self,
        prompt: impl Into<String>,
        label: impl Into<String>,
        action: NavAction,
    ) -> Self {
        self.cta = Some(CtaConfig {
            content: CtaContent {
                prompt: prompt.into(),
                label: label.into(),
                action,
            },
            motion: default_cta_motion(),
            hover: None,
        });
        self
    }

    pub fn with_aside(mut self, content: AsideContent) -> Self {
        self.aside = Some(AsideConfig {
            content,
            motion: default_aside_motion(),
        });
        self
    }

    /// Observation parameters for this section
    pub fn region(&self) -> RevealResult<VisibilityRegion> {
        VisibilityRegion::new(self.threshold, self.repeatable)
    }

    pub fn group(&self) -> StaggeredGroup {
        StaggeredGroup::rising(self.item.offset_y, self.item.spring, self.stagger, self.items.len())
    }

    pub fn validate(&self) -> RevealResult<()> {
        if self.id.trim().is_empty() {
            return Err(RevealError::config("section id must not be empty"));
        }
        self.region()?;
        if !self.item.spring.is_valid() {
            return Err(RevealError::config(format!(
                "section `{}`: spring stiffness, damping and mass must be positive",
                self.id
            )));
        }
        let tracks = [
            self.container,
            Some(self.header.motion.transition),
            self.cta.as_ref().map(|cta| cta.motion.transition),
            self.aside.as_ref().map(|aside| aside.motion.transition),
        ];
        for transition in tracks.into_iter().flatten() {
            if let Transition::Spring(spring) = transition {
                if !spring.is_valid() {
                    return Err(RevealError::config(format!(
                        "section `{}`: invalid track spring {spring:?}",
                        self.id
                    )));
                }
            }
        }
        let hovers = [
            self.item_hover,
            self.submit_hover,
            self.cta.as_ref().and_then(|cta| cta.hover),
        ];
        for emphasis in hovers.into_iter().flatten() {
            if !emphasis.is_valid() {
                return Err(RevealError::config(format!(
                    "section `{}`: invalid emphasis {emphasis:?}",
                    self.id
                )));
            }
        }
        Ok(())
    }

    /// Beach club video gallery
    pub fn beaches() -> Self {
        let card = |title: &str, tagline: &str, video: &str, accent: &str| {
            SectionItem::Card(DisplayItem::new(title, tagline, MediaRef::video(video)).accent(accent))
        };

        Self::new("beaches")
            .with_stagger(300, 200)
            .with_item_motion(50.0, SpringConfig::entrance())
            .with_container_fade(container_fade())
            .with_header(
                "Top Beach Clubs",
                "– Where Vibes Meet the Waves",
                "Find the ultimate beach escapes – whether you're here for poolside beats, \
                 sundowner cocktails, or luxury lounging. Handpicked clubs, reviews, and \
                 insider perks just for you.",
            )
            .with_item(card(
                "White Beach, Atlantis",
                "Luxury, music, and magic by the shore.",
                "videos/beaches/beach1.mp4",
                "linear-gradient(135deg, rgba(99, 102, 241, 0.8), rgba(16, 185, 129, 0.6))",
            ))
            .with_item(card(
                "Nikki Beach Dubai",
                "The global beach club that redefines luxury living.",
                "videos/beaches/beach2.mp4",
                "linear-gradient(135deg, rgba(236, 72, 153, 0.8), rgba(251, 146, 60, 0.6))",
            ))
            .with_item(card(
                "Zero Gravity",
                "From sunrise dips to starlit parties.",
                "videos/beaches/beach3.mp4",
                "linear-gradient(135deg, rgba(16, 185, 129, 0.8), rgba(59, 130, 246, 0.6))",
            ))
            .with_item_hover(Emphasis::card(1.05))
            .with_cta(
                "Ready to See the Hottest Beach Clubs?",
                "Discover All Beach Clubs",
                NavAction::scroll_to("community"),
            )
    }

    /// Lifestyle category cards
    pub fn explore() -> Self {
        let category = |badge: &str,
                        title: &str,
                        tagline: &str,
                        description: &str,
                        cta: &str,
                        image: &str,
                        accent: &str| {
            SectionItem::Card(
                DisplayItem::new(title, tagline, MediaRef::image(image, title))
                    .description(description)
                    .badge(badge)
                    .cta_label(cta)
                    .accent(accent),
            )
        };

        Self::new("explore")
            .with_stagger(200, 150)
            .with_item_motion(60.0, SpringConfig::soft_entrance())
            .with_container_fade(container_fade())
            .with_header(
                "Explore UAE",
                "Beyond the Ordinary",
                "From electric nightlife to desert adventures, luxury shopping to hidden \
                 cultural gems – your UAE journey starts here. Choose your vibe, and we'll \
                 guide you there.",
            )
            .with_item(category(
                "🍹",
                "Nightlife & Eats",
                "Where Nights Come Alive",
                "Rooftop lounges, beach clubs, and food streets that never sleep – discover \
                 the flavors and beats that define UAE nights.",
                "Explore Nightlife →",
                "images/explore/explore1.jpg",
                "linear-gradient(135deg, rgba(99, 102, 241, 0.8), rgba(16, 185, 129, 0.6))",
            ))
            .with_item(category(
                "⛰️",
                "Outdoor Thrills",
                "Adventure Awaits",
                "Skydive, desert dune bash, hike mountains, or paddle through serene \
                 mangroves – the UAE is your adventure playground.",
                "Plan Adventure →",
                "images/explore/explore2.jpg",
                "linear-gradient(135deg, rgba(236, 72, 153, 0.8), rgba(251, 146, 60, 0.6))",
            ))
            .with_item(category(
                "🛍️",
                "Shopping Spree",
                "Retail Therapy, UAE Style",
                "Luxury malls, buzzing souks, and hidden boutiques – shop from bling to \
                 bargains with insider tips.",
                "Shop the Best Finds →",
                "images/explore/explore3.jpg",
                "linear-gradient(135deg, rgba(16, 185, 129, 0.8), rgba(59, 130, 246, 0.6))",
            ))
            .with_item(category(
                "🏖️",
                "Staycays",
                "Mini Vacays, Major Vibes",
                "Resorts, boutique stays, and weekend escapes made for Insta-worthy \
                 memories – all right here in the Emirates.",
                "Discover Staycays →",
                "images/explore/explore4.jpg",
                "linear-gradient(135deg, rgba(251, 146, 60, 0.8), rgba(99, 102, 241, 0.6))",
            ))
            .with_item_hover(Emphasis::card(1.02))
            .with_cta(
                "Ready to Start Your UAE Exploration?",
                "Get Started Now",
                NavAction::scroll_to("community"),
            )
    }

    /// Newsletter signup form with the insider-perks panel
    pub fn community() -> Self {
        let field = |name: &str, label: &str, placeholder: &str, input: InputKind| {
            SectionItem::Field(FieldSpec {
                name: name.to_string(),
                label: label.to_string(),
                placeholder: placeholder.to_string(),
                input,
            })
        };
        let perk = |icon: &str, title: &str, detail: &str| Perk {
            icon: icon.to_string(),
            title: title.to_string(),
            detail: detail.to_string(),
        };

        let mut config = Self::new("community")
            .with_stagger(300, 100)
            .with_item_motion(20.0, SpringConfig::entrance())
            .with_container_fade(container_fade())
            .with_header(
                "Join the Vibe",
                "- Live the Life.",
                "Get the latest guides, events, and insider tips straight to your inbox. \
                 Stay connected with people who live and breathe the UAE lifestyle.",
            )
            .with_item(field("name", "Full Name", "Enter your full name", InputKind::Text))
            .with_item(field(
                "email",
                "Email Address",
                "Enter your email address",
                InputKind::Email,
            ))
            .with_item(field(
                "travel_interest",
                "Your UAE Interest",
                "",
                InputKind::Select {
                    prompt: "What interests you most?".to_string(),
                    options: [
                        "Nightlife & Dining",
                        "Beach Clubs",
                        "Adventure Sports",
                        "Shopping & Fashion",
                        "Cultural Events",
                        "Luxury Experiences",
                    ]
                    .map(String::from)
                    .to_vec(),
                },
            ))
            .with_item(SectionItem::Submit {
                label: "Join the Community".to_string(),
            })
            .with_aside(AsideContent {
                heading: "🌟 Insider Access".to_string(),
                perks: vec![
                    perk(
                        "📧",
                        "Weekly Lifestyle Guides",
                        "Curated hotspots, hidden gems & trending venues",
                    ),
                    perk(
                        "🎉",
                        "Exclusive Event Invites",
                        "VIP access to parties, launches & networking events",
                    ),
                    perk(
                        "💎",
                        "Member Perks & Discounts",
                        "Special rates at premium venues & experiences",
                    ),
                    perk(
                        "👥",
                        "Community Network",
                        "Connect with like-minded lifestyle enthusiasts",
                    ),
                    perk(
                        "⚡",
                        "Early Access",
                        "Be first to know about new openings & trends",
                    ),
                ],
            });
        config.submit_hover = Some(Emphasis::button(1.03, 0.97));
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            SectionConfig::beaches(),
            SectionConfig::explore(),
            SectionConfig::community(),
        ] {
            config.validate().unwrap();
            assert_eq!(config.threshold, 0.3);
            assert!(config.repeatable);
        }
    }

    #[test]
    fn test_preset_shapes() {
        let beaches = SectionConfig::beaches();
        assert_eq!(beaches.items.len(), 3);
        assert_eq!(beaches.stagger, StaggerConfig::new(300, 200));
        assert_eq!(beaches.group().start_ms(2), 700);

        let explore = SectionConfig::explore();
        assert_eq!(explore.items.len(), 4);
        assert_eq!(explore.item.spring, SpringConfig::soft_entrance());

        let community = SectionConfig::community();
        assert_eq!(community.items.len(), 4);
        assert!(community.aside.is_some());
        assert!(community.cta.is_none());
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let config = SectionConfig::new("broken").with_threshold(1.5);
        assert_eq!(config.validate(), Err(RevealError::InvalidThreshold(1.5)));
    }

    #[test]
    fn test_invalid_spring_is_rejected() {
        let config =
            SectionConfig::new("broken").with_item_motion(50.0, SpringConfig::new(100.0, 0.0, 1.0));
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn test_parse_minimal_section() {
        let config: SectionConfig = toml::from_str(
            r#"
            id = "beaches"
            threshold = 0.3
            stagger = { base_delay_ms = 300, per_item_delay_ms = 200 }
            item = { offset_y = 50.0, spring = { stiffness = 100.0, damping = 20.0 } }
            "#,
        )
        .unwrap();

        assert_eq!(config.item, ItemMotion::new(50.0, SpringConfig::entrance()));
        assert!(config.repeatable);
        assert_eq!(config.header.motion, TrackMotion::default());
        assert!(config.items.is_empty());
        assert_eq!(config.container, None);
    }

    #[test]
    fn test_zero_mass_hover_spring_is_rejected() {
        let config: SectionConfig = toml::from_str(
            r#"
            id = "beaches"
            item_hover = { hover_scale = 1.05, transition = { type = "spring", stiffness = 400.0, damping = 30.0, mass = 0.0 } }
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
        assert!(crate::Section::new(config).is_err());

        let mut community = SectionConfig::community();
        community.submit_hover = community
            .submit_hover
            .map(|hover| hover.with_spring(SpringConfig::new(400.0, 0.0, 1.0)));
        assert!(matches!(community.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn test_parse_timed_hover_and_container_fade() {
        let config: SectionConfig = toml::from_str(
            r#"
            id = "explore"
            container = { type = "timed", duration_ms = 300 }
            item_hover = { hover_scale = 1.02, transition = { type = "timed", duration_ms = 300, easing = "ease_out" } }
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.container, Some(container_fade()));
        assert_eq!(config.item_hover, Some(Emphasis::card(1.02)));
    }

    #[test]
    fn test_track_motion_defaults() {
        let header = TrackMotion::default().track();
        assert_eq!(header.delay_ms(), 0);
        assert_eq!(header.entrance().hidden, Pose::rise(30.0));

        let aside = default_aside_motion().track();
        assert_eq!(aside.delay_ms(), 500);
        assert_eq!(aside.entrance().hidden, Pose::slide(50.0));
    }
}
