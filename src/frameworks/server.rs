// Framework bootstrap for the idle miner server runtime.

use crate::domain::ports::LedgerStore;
use crate::domain::tuning::production::ProductionTuning;
use crate::frameworks::config;
use crate::frameworks::store::{FileLedgerStore, InMemoryLedgerStore};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{LedgerService, ProductionScheduler, SessionSettings, production_task};

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::Notify;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves on `listener` with the ledger store selected by `LEDGER_PATH`.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let store: Arc<dyn LedgerStore> = match config::ledger_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "using file ledger store");
            Arc::new(FileLedgerStore::new(path))
        }
        None => {
            tracing::info!("using in-memory ledger store");
            Arc::new(InMemoryLedgerStore::new())
        }
    };
    run_with_store(listener, store).await
}

pub async fn run_with_store(
    listener: tokio::net::TcpListener,
    store: Arc<dyn LedgerStore>,
) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state(store).await?;

    // Passive production runs for the lifetime of the server.
    let shutdown = Arc::new(Notify::new());
    let scheduler = ProductionScheduler::new(
        state.ledger.clone(),
        config::production_publish_every(),
    );
    tokio::spawn(production_task(
        scheduler,
        config::production_tick(),
        shutdown.clone(),
    ));

    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    shutdown.notify_one();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

async fn build_state(store: Arc<dyn LedgerStore>) -> Result<Arc<AppState>> {
    let ledger = Arc::new(LedgerService::new(
        store,
        ProductionTuning::default(),
        config::LEDGER_BROADCAST_CAPACITY,
    ));

    // Load the persisted ledger, or seed the starting one on first boot.
    let initial = ledger
        .initialize()
        .await
        .map_err(|e| std::io::Error::other(format!("failed to initialize ledger: {}", e.message())))?;
    tracing::debug!(
        crystals = initial.ledger.crystals,
        energy = initial.ledger.energy,
        upgrades = initial.upgrades.len(),
        "ledger ready"
    );

    let session_settings = SessionSettings {
        frame_interval: config::FRAME_INTERVAL,
        event_buffer: config::SESSION_EVENT_CAPACITY,
        notice_buffer: config::SESSION_NOTICE_CAPACITY,
        ..SessionSettings::default()
    };

    Ok(Arc::new(AppState::new(ledger, session_settings)))
}
