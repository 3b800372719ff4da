//! KeyDesk — License Key Dispenser Bot
//!
//! Main entry point that wires all crates together and starts the
//! update poller.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use keydesk_core::config::AppConfig;
use keydesk_core::error::AppError;
use keydesk_core::traits::KeyLedger;

#[tokio::main]
async fn main() {
    let env = std::env::var("KEYDESK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main bot run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting KeyDesk v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Key ledger ───────────────────────────────────────
    tracing::info!(
        "Initializing key ledger (provider: {})...",
        config.ledger.provider
    );
    let ledger: Arc<dyn KeyLedger> = match config.ledger.provider.as_str() {
        "sheets" => Arc::new(keydesk_ledger::SheetsLedger::new(&config.ledger)?),
        "memory" => Arc::new(keydesk_ledger::MemoryLedger::with_categories(
            config.ledger.pools.iter().map(|p| p.category.clone()),
        )),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown ledger provider '{other}'"
            )));
        }
    };
    tracing::info!("Key ledger initialized");

    // ── Step 2: Allocator ────────────────────────────────────────
    let allocator = Arc::new(keydesk_allocator::KeyAllocator::new(
        ledger,
        &config.allocator,
    ));
    tracing::info!(
        serialize_allocations = config.allocator.serialize_allocations,
        "Allocator initialized"
    );

    // ── Step 3: Access guard ─────────────────────────────────────
    let guard = keydesk_bot::AccessGuard::new(&config.access);
    if guard.is_empty() {
        tracing::warn!("Allow-list is empty: every requester will be rejected");
    } else {
        tracing::info!(requesters = guard.len(), "Access guard initialized");
    }

    // ── Step 4: Transport + dispatcher ───────────────────────────
    let client = Arc::new(keydesk_telegram::TelegramClient::new(&config.telegram)?);
    let dispatcher = Arc::new(keydesk_bot::Dispatcher::new(
        guard,
        allocator,
        client.clone(),
        config.ledger.pools.clone(),
    ));
    let poller = keydesk_telegram::UpdatePoller::new(client, dispatcher);

    // ── Step 5: Run until shutdown ───────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_task = tokio::spawn(async move { poller.run(shutdown_rx).await });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;
    tracing::info!("Shutdown signal received");

    shutdown_tx
        .send(true)
        .map_err(|e| AppError::internal(format!("Failed to signal shutdown: {e}")))?;

    poller_task
        .await
        .map_err(|e| AppError::internal(format!("Poller task failed: {e}")))?;

    tracing::info!("KeyDesk stopped");
    Ok(())
}
