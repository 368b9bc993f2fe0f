//! # settings-gate Binary
//!
//! The entry point that assembles the service from settings and compile-time features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::Settings;
use domains::{Clock, FeedbackRepo, PreferenceRepo, SystemClock};
use services::{FeedbackGate, PreferenceService};
use storage_adapters::{InMemoryFeedbackRepo, InMemoryPreferenceRepo};
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(feature = "db-sqlite")]
use storage_adapters::SqliteStore;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

type Storage = (Arc<dyn PreferenceRepo>, Arc<dyn FeedbackRepo>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(settings.log.json);
    if let Some(path) = &settings.env_file {
        info!(path = %path.display(), "loaded .env");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 1. Storage implementation
    let (preference_repo, feedback_repo) = build_storage(&settings, clock.clone()).await?;

    // 2. Services, wired by hand
    let cooldown = chrono::Duration::try_hours(settings.feedback.cooldown_hours)
        .context("feedback.cooldown_hours out of range")?;
    let state = AppState {
        preferences: Arc::new(PreferenceService::new(preference_repo)),
        feedback: Arc::new(FeedbackGate::new(feedback_repo, clock.clone(), cooldown)),
        clock,
    };
    info!(cooldown_hours = settings.feedback.cooldown_hours, "services ready");

    // 3. HTTP
    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("settings-gate listening on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("settings-gate stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

async fn build_storage(settings: &Settings, clock: Arc<dyn Clock>) -> anyhow::Result<Storage> {
    #[cfg(feature = "db-sqlite")]
    if let Some(url) = settings.database.url.as_ref() {
        use secrecy::ExposeSecret;

        let store = Arc::new(SqliteStore::connect(url.expose_secret()).await?.with_clock(clock));
        info!("using sqlite storage");
        let preferences: Arc<dyn PreferenceRepo> = store.clone();
        let feedback: Arc<dyn FeedbackRepo> = store;
        return Ok((preferences, feedback));
    }

    #[cfg(not(feature = "db-sqlite"))]
    if settings.database.url.is_some() {
        warn!("database.url is set but this build has no sqlite support");
    }

    #[cfg(not(feature = "db-sqlite"))]
    let _ = clock;

    warn!("no database configured, state is kept in memory only");
    let preferences: Arc<dyn PreferenceRepo> = Arc::new(InMemoryPreferenceRepo::new());
    let feedback: Arc<dyn FeedbackRepo> = Arc::new(InMemoryFeedbackRepo::new());
    Ok((preferences, feedback))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
