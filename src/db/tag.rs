//! Tag name validation
//!
//! Tags are restricted to ASCII letters, digits, `.`, `-`, `_` and space.
//! The restriction keeps every tag usable as a single filename inside the
//! tag index, so a validated `TagName` never needs escaping.

use super::error::DbError;
use std::fmt;

/// Returns true if `c` may appear in a tag name
#[must_use]
pub const fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ')
}

/// Check a tag name against the allowed alphabet
///
/// The empty string is not a valid tag: it would be indistinguishable from an
/// empty tag list in a file record. `.` and `..` are rejected because they
/// cannot name a file.
#[must_use]
pub fn is_valid_tag(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && name.chars().all(is_tag_char)
}

/// A validated tag name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagName(String);

impl TagName {
    /// Strip surrounding whitespace and validate
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` with the raw input if the trimmed name is
    /// not a valid tag.
    pub fn parse(raw: &str) -> Result<Self, DbError> {
        let trimmed = raw.trim();
        if is_valid_tag(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DbError::InvalidTag(raw.to_string()))
        }
    }

    /// Validate every name in a batch, failing on the first invalid one
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidTag` for the first invalid name.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, DbError> {
        raw.iter().map(|t| Self::parse(t.as_ref())).collect()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for TagName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for TagName {
    type Error = DbError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}
