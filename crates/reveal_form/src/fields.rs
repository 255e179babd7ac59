//! Ordered form field storage

use indexmap::IndexMap;
use reveal_core::{RevealError, RevealResult};

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const TRAVEL_INTEREST: &str = "travel_interest";

/// Options offered for [`TRAVEL_INTEREST`]
pub const TRAVEL_INTERESTS: [&str; 6] = [
    "Nightlife & Dining",
    "Beach Clubs",
    "Adventure Sports",
    "Shopping & Fashion",
    "Cultural Events",
    "Luxury Experiences",
];

/// Named string fields in declaration order. Every field is required.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    values: IndexMap<String, String>,
}

impl FormFields {
    /// Empty fields with the given names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: names
                .into_iter()
                .map(|name| (name.into(), String::new()))
                .collect(),
        }
    }

    /// The newsletter signup fields
    pub fn signup() -> Self {
        Self::new([NAME, EMAIL, TRAVEL_INTEREST])
    }

    /// Set a declared field. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First field (in declaration order) that is blank
    pub fn first_missing(&self) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.as_str())
    }

    pub fn validate(&self) -> RevealResult<()> {
        match self.first_missing() {
            Some(field) => Err(RevealError::missing_field(field)),
            None => Ok(()),
        }
    }

    /// Reset every value to the empty string, keeping the field names
    pub fn clear(&mut self) {
        self.values.values_mut().for_each(String::clear);
    }

    pub fn is_cleared(&self) -> bool {
        self.values.values().all(String::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_fields_keep_order() {
        let fields = FormFields::signup();
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec![NAME, EMAIL, TRAVEL_INTEREST]);
        assert!(fields.is_cleared());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut fields = FormFields::signup();
        assert!(!fields.set("phone", "555"));
        assert_eq!(fields.get("phone"), None);
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_validate_reports_first_blank_field() {
        let mut fields = FormFields::signup();
        fields.set(NAME, "Ava");
        fields.set(EMAIL, "   ");
        assert_eq!(
            fields.validate(),
            Err(RevealError::InvalidFieldState {
                field: EMAIL.to_string()
            })
        );

        fields.set(EMAIL, "ava@example.com");
        fields.set(TRAVEL_INTEREST, TRAVEL_INTERESTS[1]);
        assert_eq!(fields.validate(), Ok(()));
    }

    #[test]
    fn test_clear_keeps_names() {
        let mut fields = FormFields::signup();
        fields.set(NAME, "Ava");
        fields.clear();
        assert!(fields.is_cleared());
        assert_eq!(fields.get(NAME), Some(""));
    }
}
