#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use volunteer_hub::scheduler::MetricsJob;
use volunteer_hub::{
    build_router, store, validate_startup_config, AppConfig, AppState, Repositories, RuntimeMode,
};

fn env_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("HUB_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = AppConfig {
        runtime_mode: RuntimeMode::parse(&env_str("HUB_ENV", "")),
        site_title: env_str("HUB_SITE_TITLE", "NGO Volunteer Management"),
        static_dir: env_str("HUB_STATIC_DIR", "public").into(),
        max_body_bytes: env_usize("HUB_MAX_BODY_BYTES", 16 * 1024),
    };
    validate_startup_config(&config)?;

    let bind_addr = env_str("HUB_BIND", "0.0.0.0:3000");
    let mongodb_url = env_str("HUB_MONGODB_URL", "mongodb://127.0.0.1:27017");
    let db_name = env_str("HUB_MONGODB_DB", "volunteer_hub");

    // Fail-fast: a missing document store at startup is unrecoverable.
    let db = match store::connect(&mongodb_url, &db_name).await {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, "failed to connect to document store");
            std::process::exit(1);
        }
    };

    let repos = Repositories::mongo(&db);
    let job = MetricsJob::new(Arc::clone(&repos.projects));
    job.spawn_daily();

    let state = AppState { repos, config };
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("volunteer-hub listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
