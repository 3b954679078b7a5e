use axum::extract::Query;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router, routing::get};
use peercache::remote::protocol::CONTENT_TYPE_OCTET_STREAM;
use peercache::{Group, GroupRegistry, HttpPool};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SCORES_CACHE_BYTES: usize = 2 << 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PEERCACHE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> [--peer <http://addr:port>]... [--api <addr:port>]",
            args[0]
        );
        eprintln!("Example: {} --bind 127.0.0.1:8001", args[0]);
        eprintln!(
            "Example: {} --bind 127.0.0.1:8001 --peer http://127.0.0.1:8002 --api 127.0.0.1:9999",
            args[0]
        );

        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut api_addr: Option<SocketAddr> = None;
    let mut peers: Vec<String> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--peer" if i + 1 < args.len() => {
                peers.push(args[i + 1].clone());
                i += 2;
            }
            "--api" if i + 1 < args.len() => {
                api_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.ok_or_else(|| anyhow::anyhow!("--bind is required"))?;
    let self_addr = format!("http://{}", bind_addr);

    // 1. Groups:
    let registry = GroupRegistry::new();
    let scores = registry.new_group("scores", SCORES_CACHE_BYTES, load_score)?;

    // 2. Peers (this node always owns its own share of the ring):
    let pool = HttpPool::new(&self_addr);
    if !peers.iter().any(|peer| peer.trim_end_matches('/') == self_addr) {
        peers.push(self_addr.clone());
    }
    pool.set_peers(&peers);
    scores.register_peers(pool.clone())?;

    // 3. Front API:
    if let Some(api_addr) = api_addr {
        let api = Router::new()
            .route("/api", get(handle_api_get))
            .route("/api/stats", get(handle_api_stats))
            .layer(Extension(scores.clone()));

        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tracing::info!("Front API listening on {}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("Front API stopped: {}", e);
            }
        });
    }

    // 4. Peer server:
    let app = pool.router(registry.clone());
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("Cache node {} serving groups {:?}", self_addr, registry.names());
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Stand-in for the slow backing store.
async fn load_score(key: String) -> anyhow::Result<Vec<u8>> {
    let db = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    tracing::info!("[SlowDB] search key {}", key);
    match db.get(key.as_str()) {
        Some(value) => Ok(value.as_bytes().to_vec()),
        None => Err(anyhow::anyhow!("{} not exist", key)),
    }
}

#[derive(Deserialize)]
struct ApiParams {
    key: String,
}

async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => (e.status_code(), e.to_string()).into_response(),
    }
}

async fn handle_api_stats(Extension(group): Extension<Arc<Group>>) -> Response {
    match group.stats().to_json() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => (e.status_code(), e.to_string()).into_response(),
    }
}
