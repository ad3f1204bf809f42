//! Property name validation
//!
//! Property names are free-form display names ("Lakeview", "12 Oak St"),
//! not slugs. Only emptiness and length are enforced; everything else is
//! up to the landlord.

use super::ValidationError;

/// Maximum length for property names
const MAX_PROPERTY_NAME_LEN: usize = 128;

/// Validated property name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyName(String);

impl PropertyName {
    /// Create a new property name.
    ///
    /// # Rules
    /// - Not empty (whitespace-only counts as empty)
    /// - Max 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "property name",
            });
        }

        if s.len() > MAX_PROPERTY_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "property name",
                max: MAX_PROPERTY_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the property name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
