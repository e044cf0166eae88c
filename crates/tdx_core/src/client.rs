//! HTTP client for the TrainerDex REST API.
//!
//! The command layer only ever talks to the [`ProfileApi`] trait; the
//! concrete [`TrainerDexClient`] is one implementation of it. Tests swap in
//! a mock instead of standing up an HTTP server.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TdxError};

/// Default production API root.
pub const DEFAULT_API_BASE: &str = "https://trainerdex.app/api/v1";

/// Narrow contract over the remote profile service.
///
/// Every method performs network I/O and returns raw JSON; decoding into
/// typed objects happens in the model layer. Failures are never retried
/// here, callers decide how to surface them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetch a trainer by its legacy id.
    async fn get_trainer(&self, trainer_id: u64) -> Result<Value>;

    /// Patch a trainer addressed by its legacy id and return the fresh
    /// payload the service answers with.
    async fn edit_trainer(&self, trainer_id: u64, fields: Value) -> Result<Value>;

    /// Fetch the full detail of one stat update.
    async fn get_update(&self, trainer_id: u64, update_uuid: &str) -> Result<Value>;
}

/// reqwest-backed [`ProfileApi`] implementation.
pub struct TrainerDexClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TrainerDexClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn decode_response(endpoint: String, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body_excerpt = if body.chars().count() > 200 {
                let head: String = body.chars().take(200).collect();
                format!("{head}...")
            } else {
                body
            };
            return Err(TdxError::ApiStatus {
                endpoint,
                status: status.as_u16(),
                body_excerpt,
            });
        }
        response.json().await.map_err(|cause| TdxError::Api {
            endpoint,
            status: Some(status.as_u16()),
            cause,
        })
    }
}

#[async_trait]
impl ProfileApi for TrainerDexClient {
    async fn get_trainer(&self, trainer_id: u64) -> Result<Value> {
        let endpoint = self.endpoint(&format!("trainers/{trainer_id}/"));
        debug!(%endpoint, "fetching trainer");
        let response = self
            .http
            .get(&endpoint)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|cause| TdxError::Api {
                endpoint: endpoint.clone(),
                status: None,
                cause,
            })?;
        Self::decode_response(endpoint, response).await
    }

    async fn edit_trainer(&self, trainer_id: u64, fields: Value) -> Result<Value> {
        let endpoint = self.endpoint(&format!("trainers/{trainer_id}/"));
        debug!(%endpoint, "editing trainer");
        let response = self
            .http
            .patch(&endpoint)
            .header("Authorization", format!("Token {}", self.token))
            .json(&fields)
            .send()
            .await
            .map_err(|cause| TdxError::Api {
                endpoint: endpoint.clone(),
                status: None,
                cause,
            })?;
        Self::decode_response(endpoint, response).await
    }

    async fn get_update(&self, trainer_id: u64, update_uuid: &str) -> Result<Value> {
        let endpoint = self.endpoint(&format!("trainers/{trainer_id}/updates/{update_uuid}/"));
        debug!(%endpoint, "fetching update detail");
        let response = self
            .http
            .get(&endpoint)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await
            .map_err(|cause| TdxError::Api {
                endpoint: endpoint.clone(),
                status: None,
                cause,
            })?;
        Self::decode_response(endpoint, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = TrainerDexClient::with_base_url("k", "https://example.org/api/v1/");
        assert_eq!(
            client.endpoint("trainers/42/"),
            "https://example.org/api/v1/trainers/42/"
        );
    }
}
