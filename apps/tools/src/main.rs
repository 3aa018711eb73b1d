use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use server_api::render_wallets_csv;
use shared::address::WalletAddress;
use storage::{Storage, WalletInsert};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/allowlist.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every allowlisted wallet.
    List,
    /// Write the allowlist as csv to a file, or stdout.
    ExportCsv {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the submission log, optionally for one address.
    Submissions {
        address: Option<String>,
    },
    AddWallet {
        address: String,
        #[arg(long)]
        handle: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::List => {
            let wallets = storage.list_wallets().await?;
            for wallet in &wallets {
                println!(
                    "{} {} {}",
                    wallet.address,
                    wallet.handle.as_deref().unwrap_or("-"),
                    wallet.created_at.to_rfc3339()
                );
            }
            println!("count={}", wallets.len());
        }
        Command::ExportCsv { output } => {
            let csv = render_wallets_csv(&storage.list_wallets().await?);
            match output {
                Some(path) => {
                    fs::write(&path, csv)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => print!("{csv}"),
            }
        }
        Command::Submissions { address } => {
            let filter = address
                .as_deref()
                .map(WalletAddress::parse)
                .transpose()
                .context("invalid address filter")?;
            let submissions = storage.list_submissions().await?;
            for submission in submissions
                .iter()
                .filter(|s| filter.as_ref().map_or(true, |f| s.address == f.as_str()))
            {
                println!(
                    "{} {} {} {}",
                    submission.created_at.to_rfc3339(),
                    submission.address,
                    submission.handle.as_deref().unwrap_or("-"),
                    submission.quote_url.as_deref().unwrap_or("-")
                );
            }
        }
        Command::AddWallet { address, handle } => {
            let address = WalletAddress::parse(&address).context("invalid address")?;
            match storage.insert_wallet(&address, handle.as_deref()).await? {
                WalletInsert::Inserted(wallet_id) => {
                    println!("added wallet_id={} address={address}", wallet_id.0)
                }
                WalletInsert::Duplicate => println!("already allowlisted: {address}"),
            }
        }
    }

    Ok(())
}
