use super::protocol::{
    CONTENT_TYPE_OCTET_STREAM, Response, encode_response, normalize_base_path, parse_peer_path,
};
use crate::error::CacheError;
use crate::group::GroupRegistry;

use axum::{
    Extension, Router,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response as HttpResponse},
    routing::get,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Server-side state: which groups this node hosts and where it listens for peers.
pub struct PeerServer {
    registry: Arc<GroupRegistry>,
    base_path: String,
}

impl PeerServer {
    pub fn new(registry: Arc<GroupRegistry>, base_path: &str) -> Arc<Self> {
        Arc::new(Self {
            registry,
            base_path: normalize_base_path(base_path),
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }
}

/// Builds the peer router. Anything outside `<base_path><group>/<key>` gets a 400.
pub fn router(registry: Arc<GroupRegistry>, base_path: &str) -> Router {
    let server = PeerServer::new(registry, base_path);
    let route = format!("{}*path", server.base_path());

    Router::new()
        .route(&route, get(handle_peer_get))
        .fallback(handle_malformed)
        .layer(Extension(server))
}

pub async fn handle_peer_get(
    Extension(server): Extension<Arc<PeerServer>>,
    uri: Uri,
) -> HttpResponse {
    tracing::debug!("[Server] GET {}", uri.path());

    let (group_name, key) = match parse_peer_path(server.base_path(), uri.path()) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::warn!("Rejected peer request {}: {}", uri.path(), e);
            return error_response(&e);
        }
    };

    let group = match server.registry().get(&group_name) {
        Some(group) => group,
        None => {
            tracing::warn!("Peer requested unknown group: {}", group_name);
            return error_response(&CacheError::GroupNotFound(group_name));
        }
    };

    let view = match AssertUnwindSafe(group.get(&key)).catch_unwind().await {
        Ok(Ok(view)) => view,
        Ok(Err(e)) => {
            tracing::error!("[{}] failed to serve key {}: {}", group_name, key, e);
            return error_response(&e);
        }
        Err(_) => {
            tracing::error!("[{}] panic while serving key {}", group_name, key);
            return error_response(&CacheError::Internal(format!(
                "panic while loading key {}",
                key
            )));
        }
    };

    match encode_response(&Response {
        value: view.byte_slice(),
    }) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode response for {}/{}: {}", group_name, key, e);
            error_response(&e)
        }
    }
}

pub async fn handle_malformed(uri: Uri) -> HttpResponse {
    tracing::warn!("Rejected peer request {}: unexpected path", uri.path());
    error_response(&CacheError::BadRequest(format!(
        "unexpected path: {}",
        uri.path()
    )))
}

fn error_response(err: &CacheError) -> HttpResponse {
    (err.status_code(), err.to_string()).into_response()
}
