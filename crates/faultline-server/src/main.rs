#![forbid(unsafe_code)]

use faultline_server::{build_router, ApiConfig, AppState};
use faultline_store::{IssueStore, LocalFsStore, MemoryStore};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

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

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("FAULTLINE_LOG_JSON", true) {
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

fn build_store() -> Result<Arc<dyn IssueStore>, String> {
    let kind = env::var("FAULTLINE_STORE").unwrap_or_else(|_| "local".to_string());
    match kind.as_str() {
        "local" => {
            let root = PathBuf::from(
                env::var("FAULTLINE_STORE_ROOT").unwrap_or_else(|_| "data/issues".to_string()),
            );
            Ok(Arc::new(LocalFsStore::new(root)))
        }
        "memory" => {
            warn!("memory store selected; issues will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        other => Err(format!(
            "unsupported FAULTLINE_STORE value {other}; use local or memory"
        )),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("FAULTLINE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("FAULTLINE_MAX_BODY_BYTES", 16 * 1024),
        slow_request_threshold: env_duration_ms("FAULTLINE_SLOW_REQUEST_MS", 200),
        enable_debug_endpoints: env_bool("FAULTLINE_ENABLE_DEBUG_ENDPOINTS", false),
    };

    let store = build_store()?;
    let state = AppState::with_config(store, api_cfg);
    let app = build_router(state.clone());

    // Ready only once the store answers a ping; the connection-equivalent
    // is established here and shared for the process lifetime.
    state.ready.store(false, Ordering::Relaxed);
    match state.store.ping().await {
        Ok(()) => state.ready.store(true, Ordering::Relaxed),
        Err(e) => {
            error!("store ping failed at startup: {e}");
        }
    }

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket
        .set_keepalive(env_bool("FAULTLINE_TCP_KEEPALIVE_ENABLED", true))
        .map_err(|e| format!("set_keepalive failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    info!(
        "faultline-server listening on {bind_addr} (store: {})",
        state.store.backend_tag()
    );

    let accepting = state.accepting_requests.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            accepting.store(false, Ordering::Relaxed);
            let drain_ms = env_u64("FAULTLINE_SHUTDOWN_DRAIN_MS", 5000);
            tokio::time::sleep(Duration::from_millis(drain_ms)).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
