use clap::{Parser, Subcommand};
use std::path::Path;

use crate::config::{Config, StorageBackend};
use crate::domain::{TransactionRecord, VerificationOutcome};
use crate::services::TransactionService;

#[derive(Parser)]
#[command(name = "storefront-payments")]
#[command(about = "Storefront Payments - payment transaction lifecycle service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction management commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Show a transaction by authority
    Show {
        #[arg(value_name = "AUTHORITY")]
        authority: String,
    },

    /// Mark a pending transaction as verified
    Verify {
        #[arg(value_name = "AUTHORITY")]
        authority: String,
    },

    /// Mark a pending transaction as failed
    Fail {
        #[arg(value_name = "AUTHORITY")]
        authority: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_show(service: &TransactionService, authority: &str) -> anyhow::Result<()> {
    let record = service.lookup_transaction(authority).await?;
    print_record(&record);
    Ok(())
}

pub async fn handle_tx_verify(service: &TransactionService, authority: &str) -> anyhow::Result<()> {
    let outcome = service.verify_transaction(authority).await?;
    report_outcome(authority, &outcome);
    Ok(())
}

pub async fn handle_tx_fail(service: &TransactionService, authority: &str) -> anyhow::Result<()> {
    let outcome = service.fail_transaction(authority).await?;
    report_outcome(authority, &outcome);
    Ok(())
}

fn report_outcome(authority: &str, outcome: &VerificationOutcome) {
    match outcome {
        VerificationOutcome::Verified(_) | VerificationOutcome::Failed(_) => {
            tracing::info!(authority, status = %outcome.status(), "Transaction finalized from CLI");
            println!("✓ Transaction {} marked as {}", authority, outcome.status());
        }
        VerificationOutcome::AlreadyFinalized(status) => {
            println!("Transaction {} was already {}; nothing changed", authority, status);
        }
    }
}

fn print_record(record: &TransactionRecord) {
    println!("Transaction {}", record.identifier);
    println!("  Owner:      {}", record.owner_id);
    println!("  Amount:     {}", record.amount);
    println!("  Status:     {}", record.status);
    println!("  Created at: {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated at: {}", record.updated_at.format("%Y-%m-%d %H:%M:%S"));
}

/// Rejects commands that need state surviving the process when the store is in-memory.
pub fn require_persistent_store(config: &Config, command: &str) -> anyhow::Result<()> {
    if config.storage_backend == StorageBackend::Memory {
        anyhow::bail!("'{}' requires STORAGE_BACKEND=postgres", command);
    }
    Ok(())
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    require_persistent_store(config, "db migrate")?;

    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool, Path::new(crate::db::MIGRATIONS_DIR)).await?;

    println!("✓ Database migrations completed");

    Ok(())
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Storage Backend: {:?}", config.storage_backend);
    if let Some(url) = &config.database_url {
        println!("  Database URL: {}", mask_password(url));
    }
    println!("  Log Format: {:?}", config.log_format);

    let repository = crate::db::build_repository(config, false).await?;
    let report = crate::startup::validate_environment(config, repository.as_ref()).await;
    report.print();

    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    tracing::info!("Configuration is valid");
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
