//! Static section content
//!
//! Everything a section displays comes from configuration. The layout layer
//! only decides where and how it moves.

use serde::{Deserialize, Serialize};

use crate::nav::NavAction;

/// Image or video shown by a card or panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaRef {
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
    /// Muted, looping, autoplaying clip
    Video {
        src: String,
        #[serde(default)]
        poster: Option<String>,
    },
}

impl MediaRef {
    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        MediaRef::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        MediaRef::Video {
            src: src.into(),
            poster: None,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            MediaRef::Image { src, .. } | MediaRef::Video { src, .. } => src,
        }
    }
}

/// One card in a gallery section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub title: String,
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    pub media: MediaRef,
    /// Overlay gradient (CSS syntax, passed through to the host)
    #[serde(default)]
    pub accent: String,
    /// Emoji badge drawn over the media
    #[serde(default)]
    pub badge: Option<String>,
    /// Call-to-action label at the bottom of the card
    #[serde(default)]
    pub cta_label: Option<String>,
}

impl DisplayItem {
    pub fn new(title: impl Into<String>, tagline: impl Into<String>, media: MediaRef) -> Self {
        Self {
            title: title.into(),
            tagline: tagline.into(),
            description: String::new(),
            media,
            accent: String::new(),
            badge: None,
            cta_label: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = accent.into();
        self
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn cta_label(mut self, label: impl Into<String>) -> Self {
        self.cta_label = Some(label.into());
        self
    }
}

/// Kind of input control a form field renders as
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Select {
        /// Disabled first option shown while nothing is chosen
        prompt: String,
        options: Vec<String>,
    },
}

/// One labelled form control
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key in the submitted record
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    pub input: InputKind,
}

/// A staggered child of a section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionItem {
    Card(DisplayItem),
    Field(FieldSpec),
    Submit {
        label: String,
    },
}

impl SectionItem {
    pub fn title(&self) -> &str {
        match self {
            SectionItem::Card(item) => &item.title,
            SectionItem::Field(field) => &field.label,
            SectionItem::Submit { label } => label,
        }
    }
}

/// Section title block
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderContent {
    /// Gradient-highlighted lead of the title
    #[serde(default)]
    pub highlight: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

/// Closing call-to-action block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaContent {
    pub prompt: String,
    pub label: String,
    pub action: NavAction,
}

/// One line of the side panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perk {
    pub icon: String,
    pub title: String,
    pub detail: String,
}

/// Side panel sliding in next to the staggered items
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsideContent {
    pub heading: String,
    #[serde(default)]
    pub perks: Vec<Perk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_toml() {
        let item: SectionItem = toml::from_str(
            r#"
            kind = "card"
            title = "Zero Gravity"
            tagline = "From sunrise dips to starlit parties."
            media = { type = "video", src = "videos/beaches/beach3.mp4" }
            "#,
        )
        .unwrap();

        match item {
            SectionItem::Card(card) => {
                assert_eq!(card.title, "Zero Gravity");
                assert_eq!(card.media.src(), "videos/beaches/beach3.mp4");
                assert!(card.description.is_empty());
                assert_eq!(card.badge, None);
            }
            other => panic!("expected a card, got {other:?}"),
        }
    }

    #[test]
    fn test_select_field_from_toml() {
        let item: SectionItem = toml::from_str(
            r#"
            kind = "field"
            name = "travel_interest"
            label = "Your UAE Interest"
            input = { type = "select", prompt = "What interests you most?", options = ["Beach Clubs"] }
            "#,
        )
        .unwrap();
        assert_eq!(item.title(), "Your UAE Interest");
    }
}
