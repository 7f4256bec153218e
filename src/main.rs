use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_payments::cli::{self, Cli, Commands, DbCommands, TxCommands};
use storefront_payments::config::{Config, LogFormat};
use storefront_payments::domain::RandomAuthority;
use storefront_payments::services::TransactionService;
use storefront_payments::{create_app, db, with_cors, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config).await,
        Commands::Tx(command) => {
            cli::require_persistent_store(&config, "tx")?;
            let repository = db::build_repository(&config, false).await?;
            let service = TransactionService::new(repository, Arc::new(RandomAuthority));
            match command {
                TxCommands::Show { authority } => cli::handle_tx_show(&service, &authority).await,
                TxCommands::Verify { authority } => {
                    cli::handle_tx_verify(&service, &authority).await
                }
                TxCommands::Fail { authority } => cli::handle_tx_fail(&service, &authority).await,
            }
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let repository = db::build_repository(&config, true).await?;
    tracing::info!(backend = ?config.storage_backend, "Transaction store initialized");

    let mut app = create_app(AppState::new(repository));
    if let Some(origins) = &config.cors_allowed_origins {
        app = with_cors(app, origins);
        tracing::info!(origins = ?origins, "CORS restricted to configured origins");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
