//! Attribute code validation rules.

use crate::{CartqlError, CartqlResult};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateLength;

/// Shortest attribute code accepted by default.
pub const ATTRIBUTE_CODE_MIN_LENGTH: usize = 1;

/// Longest attribute code accepted by default.
pub const ATTRIBUTE_CODE_MAX_LENGTH: usize = 60;

/// Default length bounds for attribute codes.
pub const ATTRIBUTE_CODE_LENGTH: StringLength =
    StringLength::fixed(ATTRIBUTE_CODE_MIN_LENGTH, ATTRIBUTE_CODE_MAX_LENGTH);

/// Characters stripped from both ends of a code before it is checked.
const TRIMMED_CHARS: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

static ATTRIBUTE_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z]+[a-zA-Z0-9_]*$").expect("attribute code pattern must compile")
});

/// Inclusive character-length bounds for a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLength {
    min: usize,
    max: usize,
}

impl StringLength {
    /// Creates bounds from compile-time constants.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`. In a `const` item this fails the build.
    #[must_use]
    pub const fn fixed(min: usize, max: usize) -> Self {
        assert!(min <= max, "string length minimum exceeds maximum");
        Self { min, max }
    }

    /// Creates bounds from runtime values.
    ///
    /// Returns a configuration error when `min > max`.
    pub fn new(min: usize, max: usize) -> CartqlResult<Self> {
        if min > max {
            return Err(CartqlError::Configuration(format!(
                "String length minimum ({}) cannot exceed maximum ({})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum length.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Returns the maximum length.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Returns true if the character count of `value` lies within the bounds.
    #[must_use]
    pub fn is_valid(&self, value: &str) -> bool {
        value.validate_length(Some(self.min as u64), Some(self.max as u64), None)
    }
}

impl Default for StringLength {
    fn default() -> Self {
        ATTRIBUTE_CODE_LENGTH
    }
}

/// Syntactic rule for attribute codes.
///
/// A code is trimmed, then must start with a letter, continue with letters,
/// digits or underscores, and fit the configured length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeCodeRule {
    length: StringLength,
}

impl AttributeCodeRule {
    /// Creates a rule with custom length bounds.
    #[must_use]
    pub const fn new(length: StringLength) -> Self {
        Self { length }
    }

    /// Returns the length bounds of this rule.
    #[must_use]
    pub const fn length(&self) -> StringLength {
        self.length
    }

    /// Checks whether `code` looks like a legitimate attribute code.
    ///
    /// Only ASCII space, tab, line feed, carriage return, NUL and vertical
    /// tab are trimmed; other Unicode whitespace is part of the code.
    #[must_use]
    pub fn is_valid(&self, code: &str) -> bool {
        let code = code.trim_matches(TRIMMED_CHARS);
        // The empty string skips the pattern and is rejected by the length check.
        if !code.is_empty() && !ATTRIBUTE_CODE_PATTERN.is_match(code) {
            return false;
        }
        self.length.is_valid(code)
    }
}

/// Checks `code` against the default attribute code rule.
#[must_use]
pub fn is_valid_attribute_code(code: &str) -> bool {
    AttributeCodeRule::default().is_valid(code)
}
