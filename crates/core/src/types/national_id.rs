//! National taxpayer ID (Brazilian CPF).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`NationalId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NationalIdError {
    /// The input contains no digits.
    #[error("national ID cannot be empty")]
    Empty,
    /// The input contains something other than digits and `.`/`-` separators.
    #[error("national ID may only contain digits, '.' and '-'")]
    InvalidCharacter,
    /// The input does not have exactly 11 digits.
    #[error("national ID must have {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digits found in the input.
        actual: usize,
    },
}

/// A CPF number, stored as its 11 bare digits.
///
/// Accepts both the formatted (`123.456.789-09`) and the bare form; both parse
/// to the same value so the uniqueness constraint on accounts sees them as the
/// same person. Check digits are not verified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Number of digits in a CPF.
    pub const DIGITS: usize = 11;

    /// Parse a `NationalId`, stripping `.`, `-` and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains other characters, or
    /// does not have exactly 11 digits.
    pub fn parse(s: &str) -> Result<Self, NationalIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NationalIdError::Empty);
        }

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' => {}
                _ => return Err(NationalIdError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(NationalIdError::WrongLength {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the bare digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the conventional `000.000.000-00` rendering.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (a, rest) = self.0.split_at(3);
        let (b, rest) = rest.split_at(3);
        let (c, check) = rest.split_at(3);
        format!("{a}.{b}.{c}-{check}")
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for NationalId {
    type Err = NationalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_and_bare_forms_are_equal() {
        let formatted = NationalId::parse("123.456.789-09").unwrap();
        let bare = NationalId::parse("12345678909").unwrap();
        assert_eq!(formatted, bare);
        assert_eq!(bare.as_str(), "12345678909");
    }

    #[test]
    fn test_display_uses_cpf_format() {
        let id = NationalId::parse("12345678909").unwrap();
        assert_eq!(id.to_string(), "123.456.789-09");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(NationalId::parse(" "), Err(NationalIdError::Empty));
        assert_eq!(
            NationalId::parse("123.456.789/09"),
            Err(NationalIdError::InvalidCharacter)
        );
        assert_eq!(
            NationalId::parse("1234567890"),
            Err(NationalIdError::WrongLength {
                expected: 11,
                actual: 10
            })
        );
    }
}
