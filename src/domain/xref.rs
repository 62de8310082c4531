use std::{fmt, hash::Hash, hash::Hasher, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A cross-reference identifier for an individual or family record.
///
/// Identifiers are normalized on construction: surrounding whitespace is
/// trimmed and the remainder is uppercased, so `@i1@` and `@I1@` compare
/// equal. An identifier must be non-empty after trimming.
///
/// Examples: `@I1@`, `@F12@`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Xref(NonEmptyString);

impl Xref {
    /// Creates a normalized identifier from a raw string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidXrefError`] if the string is empty or
    /// whitespace-only.
    pub fn new(s: &str) -> Result<Self, InvalidXrefError> {
        let normalized = s.trim().to_uppercase();
        let non_empty =
            NonEmptyString::new(normalized).map_err(|_| InvalidXrefError(s.to_string()))?;
        Ok(Self(non_empty))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Derives a de-duplicated identifier by appending an ordinal.
    ///
    /// Used by the store when two records share a raw identifier: the second
    /// `@I1@` is stored as `@I1@2`, the third as `@I1@3`, and so on.
    #[must_use]
    pub(crate) fn with_ordinal(&self, ordinal: usize) -> Self {
        let suffixed = format!("{}{ordinal}", self.0);
        // The base is non-empty, so the suffixed form is too.
        NonEmptyString::new(suffixed).map_or_else(|_| self.clone(), Self)
    }
}

impl Hash for Xref {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_str().hash(state);
    }
}

impl TryFrom<&str> for Xref {
    type Error = InvalidXrefError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Xref {
    type Err = InvalidXrefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Xref {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Xref {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Xref {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when an identifier is empty or whitespace-only.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid identifier '{0}': must not be empty")]
pub struct InvalidXrefError(String);
