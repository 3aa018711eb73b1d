use super::*;
use chrono::{TimeZone, Utc};
use shared::{domain::WalletId, error::ErrorCode};

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext { storage }
}

fn request(address: &str, handle: Option<&str>) -> SubmitWalletRequest {
    SubmitWalletRequest {
        address: address.to_string(),
        handle: handle.map(str::to_string),
        quote_url: None,
    }
}

const MIXED_CASE: &str = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";

#[tokio::test]
async fn accepts_new_wallet_and_stores_lowercase() {
    let ctx = setup().await;
    let resp = submit_wallet(&ctx, &request(MIXED_CASE, Some("  ab  ")))
        .await
        .expect("accepted");
    assert!(resp.success);

    let listed = list_wallets(&ctx).await.expect("list");
    assert_eq!(listed.count, 1);
    assert_eq!(listed.wallets[0].address, MIXED_CASE.to_ascii_lowercase());
    assert_eq!(listed.wallets[0].handle.as_deref(), Some("ab"));
}

#[tokio::test]
async fn repeat_address_in_other_case_is_duplicate() {
    let ctx = setup().await;
    submit_wallet(&ctx, &request(MIXED_CASE, None))
        .await
        .expect("accepted");
    let err = submit_wallet(&ctx, &request(&MIXED_CASE.to_ascii_lowercase(), Some("x")))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code, ErrorCode::Duplicate);
    assert_eq!(err.message, "Wallet already on allowlist");

    let log = ctx.storage.list_submissions().await.expect("log");
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn invalid_address_is_rejected_before_logging() {
    let ctx = setup().await;
    let err = submit_wallet(&ctx, &request("0x1234", Some("ab")))
        .await
        .expect_err("invalid");
    assert_eq!(err.code, ErrorCode::Invalid);
    assert_eq!(err.message, "Invalid Ethereum address");
    assert!(ctx.storage.list_submissions().await.expect("log").is_empty());
}

#[test]
fn csv_strips_commas_and_renders_missing_handle_as_empty() {
    let created_at = Utc.with_ymd_and_hms(2025, 2, 18, 12, 0, 0).single().expect("ts");
    let wallets = vec![
        StoredWallet {
            wallet_id: WalletId(1),
            address: format!("0x{}", "a".repeat(40)),
            handle: Some("de,gen\n".to_string()),
            created_at,
        },
        StoredWallet {
            wallet_id: WalletId(2),
            address: format!("0x{}", "b".repeat(40)),
            handle: None,
            created_at,
        },
    ];
    let csv = render_wallets_csv(&wallets);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(
        lines[1],
        format!("0x{},degen,2025-02-18T12:00:00Z", "a".repeat(40))
    );
    assert_eq!(lines[2], format!("0x{},,2025-02-18T12:00:00Z", "b".repeat(40)));
}

#[tokio::test]
async fn csv_export_of_empty_allowlist_is_header_only() {
    let ctx = setup().await;
    let csv = export_wallets_csv(&ctx).await.expect("csv");
    assert_eq!(csv, format!("{CSV_HEADER}\n"));
}
