//! Validated input types
//!
//! Titles and names are checked when constructed, so repositories only ever
//! see values that fit the `VARCHAR(255)` columns.

use std::fmt;

/// Maximum length (in characters) for list titles and task/subtask names
pub const MAX_NAME_LEN: usize = 255;

/// Validation error for user-supplied input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty (after trimming whitespace)
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_name(field: &'static str, s: &str) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed.to_owned())
}

/// Validated list title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTitle(String);

impl ListTitle {
    /// Create a new list title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use todoctl_core::ListTitle;
    ///
    /// assert!(ListTitle::new("Groceries").is_ok());
    /// assert!(ListTitle::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_name("title", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ListTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated task or subtask name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    /// Create a new item name. Same rules as [`ListTitle`].
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_name("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize an optional description: trimmed, and blank becomes `None`.
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        let title = ListTitle::new("  Groceries \n").unwrap();
        assert_eq!(title.as_str(), "Groceries");
    }

    #[test]
    fn empty_and_whitespace_rejected() {
        assert_eq!(
            ListTitle::new(""),
            Err(ValidationError::Empty { field: "title" })
        );
        assert_eq!(
            ItemName::new(" \t "),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 255 multi-byte characters fit, 256 do not
        let ok = "é".repeat(MAX_NAME_LEN);
        assert!(ItemName::new(&ok).is_ok());

        let too_long = "é".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            ItemName::new(&too_long),
            Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN
            })
        );
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(normalize_description(None), None);
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(
            normalize_description(Some(" 2% milk ")),
            Some("2% milk".to_string())
        );
    }

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 255 characters"
        );
    }
}
