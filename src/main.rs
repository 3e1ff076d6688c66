//! Ledger Saga server
//!
//! Usage:
//!   ledger_saga [--env dev|prod] [--port 8080]

use std::sync::Arc;

use anyhow::Context;

use ledger_saga::account::{AccountService, PgAccountRepository};
use ledger_saga::clock::{Clock, SystemClock};
use ledger_saga::config::{AppConfig, IdempotencyBackend};
use ledger_saga::db::Database;
use ledger_saga::gateway::{self, state::AppState};
use ledger_saga::idempotency::{IdempotencyStore, InMemoryIdempotencyStore, PgIdempotencyStore};
use ledger_saga::movement::{
    HttpMovementLedger, LocalMovementLedger, MovementLedger, MovementService, PgMovementStore,
};
use ledger_saga::transfer::{PgTransferStore, TransferSaga};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config =
        AppConfig::load(&env).with_context(|| format!("loading config for env '{}'", env))?;
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }
    let _log_guard = ledger_saga::logging::init_logging(&config);

    tracing::info!("Starting ledger_saga in {} mode", env);

    let db = Arc::new(
        Database::connect(&config.postgres_url)
            .await
            .context("connecting to PostgreSQL")?,
    );
    db.migrate().await.context("applying migrations")?;
    let pool = db.pool().clone();

    let idempotency: Arc<dyn IdempotencyStore> = match config.idempotency_backend {
        IdempotencyBackend::Postgres => Arc::new(PgIdempotencyStore::new(pool.clone())),
        IdempotencyBackend::Memory => {
            tracing::warn!("Idempotency records are in memory and will not survive a restart");
            Arc::new(InMemoryIdempotencyStore::new())
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository = Arc::new(PgAccountRepository::new(pool.clone()));

    let movements = Arc::new(MovementService::new(
        repository.clone(),
        Arc::new(PgMovementStore::new(pool.clone())),
        idempotency.clone(),
        clock.clone(),
    ));

    let ledger: Arc<dyn MovementLedger> = match config.movement_api {
        Some(ref api) => {
            tracing::info!("Transfers use the remote movement API at {}", api.base_url);
            Arc::new(HttpMovementLedger::from_config(api).context("building movement API client")?)
        }
        None => {
            tracing::info!("Transfers use the in-process movement ledger");
            Arc::new(LocalMovementLedger::new(movements.clone()))
        }
    };

    tracing::info!(ledger = ledger.name(), "Movement ledger ready");

    let saga = Arc::new(TransferSaga::new(
        repository.clone(),
        ledger,
        Arc::new(PgTransferStore::new(pool)),
        idempotency,
        clock,
        &config.saga,
    ));

    let accounts = Arc::new(AccountService::new(repository));
    let state = AppState::new(saga, movements, accounts).with_database(db);

    gateway::run_server(&config.gateway, Arc::new(state))
        .await
        .context("gateway server")?;

    tracing::info!("Gateway stopped");
    Ok(())
}
