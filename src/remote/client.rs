//! HTTP Peer Client
//!
//! `HttpGetter` fetches one `(group, key)` from one peer. Every request carries
//! a deadline; transport failures other than a timeout are retried with
//! exponential backoff, status failures are not.

use super::protocol::{Request, Response, decode_response, peer_path};
use crate::error::{CacheError, Result};
use crate::group::PeerGetter;

use async_trait::async_trait;
use std::time::Duration;

pub struct HttpGetter {
    /// Peer address as it appears on the ring, e.g. `http://10.0.0.2:8001`.
    peer: String,
    base_path: String,
    client: reqwest::Client,
    timeout: Duration,
    attempts: usize,
}

impl HttpGetter {
    pub fn new(
        peer: &str,
        base_path: &str,
        client: reqwest::Client,
        timeout: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            peer: peer.trim_end_matches('/').to_string(),
            base_path: base_path.to_string(),
            client,
            timeout,
            attempts: attempts.max(1),
        }
    }

    /// Full URL for a lookup on this peer.
    pub fn url_for(&self, req: &Request) -> String {
        format!(
            "{}{}",
            self.peer,
            peer_path(&self.base_path, &req.group, &req.key)
        )
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut delay_ms = 50u64;

        for attempt in 0..self.attempts {
            let response = self
                .client
                .get(url)
                .timeout(self.timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    // The deadline is the caller's budget; never stretch it with retries.
                    if e.is_timeout() || attempt + 1 == self.attempts {
                        return Err(self.transport_error(e));
                    }
                    tracing::debug!(
                        "GET {} failed (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        self.attempts,
                        e
                    );
                    let jitter = rand::random::<u64>() % 25;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(800);
                }
            }
        }

        Err(CacheError::Transport {
            peer: self.peer.clone(),
            msg: "retry attempts exhausted".to_string(),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> CacheError {
        if err.is_timeout() {
            CacheError::Timeout {
                peer: self.peer.clone(),
            }
        } else {
            CacheError::Transport {
                peer: self.peer.clone(),
                msg: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, req: &Request) -> Result<Response> {
        let url = self.url_for(req);
        let response = self.get_with_retry(&url).await?;

        if !response.status().is_success() {
            return Err(CacheError::RemoteFetch {
                peer: self.peer.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        decode_response(&body)
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}
