use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const API_PREFIX: &str = "/api";
pub const WALLETS_ROUTE: &str = "/api/wallets";
pub const WALLETS_CSV_ROUTE: &str = "/api/wallets/csv";
pub const HEALTH_ROUTE: &str = "/healthz";

/// Body of `POST /api/wallets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWalletRequest {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(
        default,
        rename = "quoteUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub quote_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWalletResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub address: String,
    pub handle: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletListResponse {
    pub count: usize,
    pub wallets: Vec<WalletRecord>,
}
