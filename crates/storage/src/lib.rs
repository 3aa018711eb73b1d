use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::{
    address::WalletAddress,
    domain::{CleanSubmission, SubmissionId, WalletId},
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWallet {
    pub wallet_id: WalletId,
    pub address: String,
    pub handle: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    pub submission_id: SubmissionId,
    pub address: String,
    pub handle: Option<String>,
    pub quote_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of adding an address to the allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletInsert {
    Inserted(WalletId),
    /// The address was already present; the existing row is left untouched.
    Duplicate,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        // Every connection to `sqlite::memory:` opens a fresh database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Appends one attempt to the submissions log. Duplicates are logged too.
    pub async fn record_submission(&self, submission: &CleanSubmission) -> Result<SubmissionId> {
        let rec = sqlx::query(
            "INSERT INTO submissions (address, handle, quote_url, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(submission.address.as_str())
        .bind(submission.handle.as_deref())
        .bind(submission.quote_url.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("failed to record submission")?;
        Ok(SubmissionId(rec.get::<i64, _>(0)))
    }

    pub async fn insert_wallet(
        &self,
        address: &WalletAddress,
        handle: Option<&str>,
    ) -> Result<WalletInsert> {
        let row = sqlx::query(
            "INSERT INTO wallets (address, handle, created_at) VALUES (?, ?, ?)
             ON CONFLICT(address) DO NOTHING
             RETURNING id",
        )
        .bind(address.as_str())
        .bind(handle)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .context("failed to insert wallet")?;

        Ok(match row {
            Some(row) => WalletInsert::Inserted(WalletId(row.get::<i64, _>(0))),
            None => {
                debug!(address = %address, "wallet already present");
                WalletInsert::Duplicate
            }
        })
    }

    /// All wallets in insertion order.
    pub async fn list_wallets(&self) -> Result<Vec<StoredWallet>> {
        let rows = sqlx::query("SELECT id, address, handle, created_at FROM wallets ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list wallets")?;
        Ok(rows
            .into_iter()
            .map(|r| StoredWallet {
                wallet_id: WalletId(r.get::<i64, _>(0)),
                address: r.get::<String, _>(1),
                handle: r.get::<Option<String>, _>(2),
                created_at: r.get::<DateTime<Utc>, _>(3),
            })
            .collect())
    }

    pub async fn find_wallet(&self, address: &WalletAddress) -> Result<Option<StoredWallet>> {
        let row = sqlx::query("SELECT id, address, handle, created_at FROM wallets WHERE address = ?")
            .bind(address.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| StoredWallet {
            wallet_id: WalletId(r.get::<i64, _>(0)),
            address: r.get::<String, _>(1),
            handle: r.get::<Option<String>, _>(2),
            created_at: r.get::<DateTime<Utc>, _>(3),
        }))
    }

    pub async fn list_submissions(&self) -> Result<Vec<StoredSubmission>> {
        let rows = sqlx::query(
            "SELECT id, address, handle, quote_url, created_at FROM submissions ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list submissions")?;
        Ok(rows
            .into_iter()
            .map(|r| StoredSubmission {
                submission_id: SubmissionId(r.get::<i64, _>(0)),
                address: r.get::<String, _>(1),
                handle: r.get::<Option<String>, _>(2),
                quote_url: r.get::<Option<String>, _>(3),
                created_at: r.get::<DateTime<Utc>, _>(4),
            })
            .collect())
    }

    pub async fn count_submissions_for(&self, address: &WalletAddress) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE address = ?")
            .bind(address.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.contains(":memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
