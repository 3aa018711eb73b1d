use chrono::SecondsFormat;
use shared::{
    domain::CleanSubmission,
    error::ApiError,
    protocol::{SubmitWalletRequest, SubmitWalletResponse, WalletListResponse, WalletRecord},
};
use storage::{Storage, StoredWallet, WalletInsert};
use tracing::{error, info};

pub const CSV_HEADER: &str = "address,handle,created_at";
pub const CSV_FILENAME: &str = "allowlist.csv";

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// Validates and stores one allowlist submission.
///
/// Every syntactically valid request lands in the submissions log first. The
/// wallet row is only inserted for addresses not seen before; a repeat address
/// yields a `duplicate` error and leaves the stored handle untouched.
pub async fn submit_wallet(
    ctx: &ApiContext,
    req: &SubmitWalletRequest,
) -> Result<SubmitWalletResponse, ApiError> {
    let submission = CleanSubmission::from_raw(
        &req.address,
        req.handle.as_deref(),
        req.quote_url.as_deref(),
    )
    .map_err(|_| ApiError::invalid("Invalid Ethereum address"))?;

    ctx.storage
        .record_submission(&submission)
        .await
        .map_err(|e| internal(e, "Internal server error"))?;

    let outcome = ctx
        .storage
        .insert_wallet(&submission.address, submission.handle.as_deref())
        .await
        .map_err(|e| internal(e, "Internal server error"))?;

    match outcome {
        WalletInsert::Inserted(wallet_id) => {
            info!(address = %submission.address, wallet_id = wallet_id.0, "wallet added to allowlist");
            Ok(SubmitWalletResponse {
                success: true,
                message: "Wallet added to allowlist".to_string(),
            })
        }
        WalletInsert::Duplicate => {
            info!(address = %submission.address, "wallet already on allowlist");
            Err(ApiError::duplicate("Wallet already on allowlist"))
        }
    }
}

pub async fn list_wallets(ctx: &ApiContext) -> Result<WalletListResponse, ApiError> {
    let wallets = ctx
        .storage
        .list_wallets()
        .await
        .map_err(|e| internal(e, "Failed to list wallets"))?;
    let wallets: Vec<WalletRecord> = wallets
        .into_iter()
        .map(|w| WalletRecord {
            address: w.address,
            handle: w.handle,
            created_at: w.created_at,
        })
        .collect();
    Ok(WalletListResponse {
        count: wallets.len(),
        wallets,
    })
}

pub async fn export_wallets_csv(ctx: &ApiContext) -> Result<String, ApiError> {
    let wallets = ctx
        .storage
        .list_wallets()
        .await
        .map_err(|e| internal(e, "Failed to export wallets"))?;
    Ok(render_wallets_csv(&wallets))
}

/// One line per wallet. Commas and line breaks are stripped from handles so
/// every row keeps exactly three columns.
pub fn render_wallets_csv(wallets: &[StoredWallet]) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + wallets.len() * 96);
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for wallet in wallets {
        let handle: String = wallet
            .handle
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !matches!(c, ',' | '\n' | '\r'))
            .collect();
        csv.push_str(&format!(
            "{},{},{}\n",
            wallet.address,
            handle,
            wallet.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    csv
}

fn internal(err: anyhow::Error, public_message: &str) -> ApiError {
    error!(error = ?err, "{public_message}");
    ApiError::server(public_message)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
