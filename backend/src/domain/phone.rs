//! Normalised Iranian mobile numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Validation failure for [`PhoneNumber`].
///
/// The display text doubles as the user-facing form message, so it is kept
/// in Persian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("شماره تلفن باید با 09 شروع شود و 11 رقم باشد")]
pub struct PhoneNumberFormatError;

/// A mobile number normalised to `09` followed by nine digits.
///
/// ## Invariants
/// - Spaces and dashes are stripped before validation.
/// - The stored value is exactly 11 ASCII digits starting with `09`.
///
/// # Examples
/// ```
/// use landing_backend::domain::PhoneNumber;
///
/// let phone: PhoneNumber = "0912 345-6789".parse().expect("valid number");
/// assert_eq!(phone.as_str(), "09123456789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strip separators and validate the `09\d{9}` shape.
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberFormatError> {
        let cleaned: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();
        let valid = cleaned.starts_with("09")
            && cleaned.len() == 11
            && cleaned.chars().all(|c| c.is_ascii_digit());
        if valid {
            Ok(Self(cleaned))
        } else {
            Err(PhoneNumberFormatError)
        }
    }

    /// The normalised digit string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneNumberFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}
