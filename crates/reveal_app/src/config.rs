//! Page configuration file handling
//!
//! A page is described by one TOML file:
//!
//! ```toml
//! [form]
//! min_latency_ms = 1500
//! # timeout_ms = 10000
//!
//! [[sections]]
//! id = "beaches"
//! threshold = 0.3
//! repeatable = true
//! stagger = { base_delay_ms = 300, per_item_delay_ms = 200 }
//! item = { offset_y = 50.0, spring = { stiffness = 100.0, damping = 20.0 } }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reveal_core::{RevealError, RevealResult};
use reveal_form::SubmissionConfig;
use reveal_layout::SectionConfig;
use serde::{Deserialize, Serialize};

/// Whole-page configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub form: SubmissionConfig,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl Default for PageConfig {
    /// The landing page: beach clubs, explore categories, community signup
    fn default() -> Self {
        Self {
            form: SubmissionConfig::default(),
            sections: vec![
                SectionConfig::beaches(),
                SectionConfig::explore(),
                SectionConfig::community(),
            ],
        }
    }
}

impl PageConfig {
    /// Page with no sections
    pub fn empty() -> Self {
        Self {
            form: SubmissionConfig::default(),
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: SectionConfig) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_form(mut self, form: SubmissionConfig) -> Self {
        self.form = form;
        self
    }

    /// Parse and validate
    pub fn from_toml_str(content: &str) -> RevealResult<Self> {
        let config: PageConfig =
            toml::from_str(content).map_err(|err| RevealError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> RevealResult<String> {
        toml::to_string_pretty(self).map_err(|err| RevealError::config(err.to_string()))
    }

    /// Load from a file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            sections = config.sections.len(),
            "loaded page config"
        );
        Ok(config)
    }

    /// Save to a file on disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> RevealResult<()> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            section.validate()?;
            if !seen.insert(section.id.as_str()) {
                return Err(RevealError::config(format!(
                    "duplicate section id `{}`",
                    section.id
                )));
            }
        }
        if let Some(0) = self.form.timeout_ms {
            return Err(RevealError::config("form timeout must be positive"));
        }
        Ok(())
    }

    pub fn section(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|section| section.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = PageConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = PageConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_file() {
        let config = PageConfig::from_toml_str(
            r#"
            [form]
            timeout_ms = 10000

            [[sections]]
            id = "beaches"
            stagger = { base_delay_ms = 300, per_item_delay_ms = 200 }
            "#,
        )
        .unwrap();

        assert_eq!(config.form.min_latency(), Duration::from_millis(1500));
        assert_eq!(config.form.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.sections.len(), 1);
        assert_eq!(config.sections[0].threshold, 0.3);
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let err = PageConfig::from_toml_str(
            r#"
            [[sections]]
            id = "beaches"
            threshold = 0.0
            "#,
        )
        .unwrap_err();
        assert_eq!(err, RevealError::InvalidThreshold(0.0));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let config = PageConfig::empty()
            .with_section(SectionConfig::beaches())
            .with_section(SectionConfig::beaches());
        assert!(matches!(config.validate(), Err(RevealError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = PageConfig::from_toml_str("[[sections]\nid = ").unwrap_err();
        assert!(matches!(err, RevealError::Config(_)));
    }

    #[test]
    fn test_load_and_save() {
        let path = std::env::temp_dir().join(format!("reveal-page-{}.toml", std::process::id()));
        PageConfig::default().save(&path).unwrap();
        let loaded = PageConfig::load(&path).unwrap();
        assert_eq!(loaded, PageConfig::default());
        std::fs::remove_file(&path).unwrap();

        let missing = PageConfig::load(&path).unwrap_err();
        assert!(missing.to_string().contains("Failed to read"));
    }
}
