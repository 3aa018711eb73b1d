use shared::address::shorten_address;
use url::Url;

use crate::session::SessionEcho;

pub const SHARE_INTENT_BASE: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareConfig {
    pub text: String,
    pub url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            text: "just registered for the allowlist\n\nyou might be early.".to_string(),
            url: "https://example.com".to_string(),
        }
    }
}

/// Read-only model of the terminal confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationView {
    pub handle: String,
    pub address: String,
}

impl ConfirmationView {
    pub fn from_echo(echo: SessionEcho) -> Self {
        Self {
            handle: echo.handle,
            address: echo.address,
        }
    }

    /// Empty when no address was carried over.
    pub fn short_address(&self) -> String {
        shorten_address(&self.address)
    }

    pub fn share_intent(&self, share: &ShareConfig) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            SHARE_INTENT_BASE,
            &[("text", share.text.as_str()), ("url", share.url.as_str())],
        )
    }
}
