use serde::{Deserialize, Serialize};

use crate::address::{AddressError, WalletAddress};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(WalletId);
id_newtype!(SubmissionId);

pub const MIN_HANDLE_CHARS: usize = 2;
pub const MAX_HANDLE_CHARS: usize = 100;
pub const MAX_QUOTE_URL_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One social task gating the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    pub link: String,
    #[serde(default)]
    pub requires_url: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            label: label.into(),
            link: link.into(),
            requires_url: false,
        }
    }

    pub fn requiring_url(mut self) -> Self {
        self.requires_url = true;
        self
    }
}

/// Validated, storage-ready form of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSubmission {
    pub address: WalletAddress,
    pub handle: Option<String>,
    pub quote_url: Option<String>,
}

impl CleanSubmission {
    /// Applies the server-side cleanup rules: the address must parse, the
    /// optional fields are trimmed and clipped, and empty values become `None`.
    pub fn from_raw(
        address: &str,
        handle: Option<&str>,
        quote_url: Option<&str>,
    ) -> Result<Self, AddressError> {
        Ok(Self {
            address: WalletAddress::parse(address)?,
            handle: clean_optional(handle, MAX_HANDLE_CHARS),
            quote_url: clean_optional(quote_url, MAX_QUOTE_URL_CHARS),
        })
    }
}

fn clean_optional(value: Option<&str>, max_chars: usize) -> Option<String> {
    let value = truncate_chars(value?.trim(), max_chars);
    (!value.is_empty()).then(|| value.to_string())
}

/// Clips `value` to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
