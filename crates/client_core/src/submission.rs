//! Transmits a [`RegistrationDraft`] and classifies the backend's answer.
//!
//! One attempt per call. There is no automatic retry: the insert behind the
//! endpoint is not idempotent, so a failed request is resubmitted by the user.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::protocol::WALLETS_ROUTE;
use tracing::{info, warn};

use crate::form::RegistrationDraft;

pub const DUPLICATE_MARKER: &str = "duplicate";
pub const REJECTED_FALLBACK: &str = "submission failed. try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Accepted,
    /// Address already registered; treated as success by the flow.
    Duplicate,
    Rejected(String),
    NetworkFailure,
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted | Self::Duplicate)
    }
}

#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn submit(&self, draft: &RegistrationDraft) -> SubmissionResult;
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a status and raw body onto a [`SubmissionResult`]. A body that is not
/// a JSON object counts as a transport failure.
pub fn classify_response(status: StatusCode, body: &str) -> SubmissionResult {
    let Ok(reply) = serde_json::from_str::<SubmissionReply>(body) else {
        return SubmissionResult::NetworkFailure;
    };

    if status.is_success() {
        return SubmissionResult::Accepted;
    }
    if status == StatusCode::CONFLICT || reply.error.as_deref() == Some(DUPLICATE_MARKER) {
        return SubmissionResult::Duplicate;
    }
    SubmissionResult::Rejected(
        reply
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK.to_string()),
    )
}

pub struct HttpSubmissionClient {
    http: Client,
    server_url: String,
}

impl HttpSubmissionClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{WALLETS_ROUTE}", self.server_url)
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, draft: &RegistrationDraft) -> SubmissionResult {
        let endpoint = self.endpoint();
        let response = match self
            .http
            .post(&endpoint)
            .json(&draft.to_request())
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(%endpoint, %error, "wallet submission transport failure");
                return SubmissionResult::NetworkFailure;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                warn!(%endpoint, %status, %error, "failed reading submission response");
                return SubmissionResult::NetworkFailure;
            }
        };

        let result = classify_response(status, &body);
        info!(%status, address = %draft.address, ?result, "wallet submission answered");
        result
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
