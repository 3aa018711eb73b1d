//! EVM account address syntax.
//!
//! Validation and normalization are deliberately separate: callers check the
//! user-typed text with [`is_valid_address`] and only lowercase it (via
//! [`normalize_address`] or [`WalletAddress::parse`]) right before it leaves
//! the form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ADDRESS_PREFIX: &str = "0x";
pub const ADDRESS_HEX_DIGITS: usize = 40;
pub const ADDRESS_LEN: usize = ADDRESS_PREFIX.len() + ADDRESS_HEX_DIGITS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must be {ADDRESS_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("non-hex character at position {0}")]
    NonHex(usize),
}

/// Returns true iff `s` is `0x` followed by exactly 40 hex digits.
pub fn is_valid_address(s: &str) -> bool {
    check_address(s).is_ok()
}

pub fn check_address(s: &str) -> Result<(), AddressError> {
    if s.len() != ADDRESS_LEN {
        return Err(AddressError::WrongLength(s.chars().count()));
    }
    let Some(digits) = s.strip_prefix(ADDRESS_PREFIX) else {
        return Err(AddressError::MissingPrefix);
    };
    match digits.bytes().position(|b| !b.is_ascii_hexdigit()) {
        Some(idx) => Err(AddressError::NonHex(idx + ADDRESS_PREFIX.len())),
        None => Ok(()),
    }
}

/// Trimmed, lowercased form of `s`. Does not validate.
pub fn normalize_address(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

/// A syntactically valid address, always stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        check_address(s)?;
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd` form used on the confirmation screen.
    pub fn short(&self) -> String {
        shorten_address(&self.0)
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keeps the first six and last four characters. Short or non-ASCII input is
/// returned unchanged.
pub fn shorten_address(s: &str) -> String {
    if s.len() <= 10 || !s.is_ascii() {
        return s.to_string();
    }
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

#[cfg(test)]
#[path = "tests/address_tests.rs"]
mod tests;
