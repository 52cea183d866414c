//! Hospital REST API Client
//!
//! Translates CRUD intents into HTTP requests against the configured
//! collection endpoints.
//!
//! Every operation logs its own failure and hands the error back to the
//! caller, which decides how to surface it. There is no retry and no request
//! deduplication; a timeout applies only when one is configured.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

use super::error::{GatewayError, GatewayResult};
use crate::config::ApiConfig;
use crate::records::{ClaimStatus, EntityKind, FinancialRecord, Record, RecordId};

/// REST client for the hospital API
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    config: ApiConfig,
}

impl Gateway {
    /// Create a new gateway with the given configuration
    pub fn new(config: ApiConfig) -> GatewayResult<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("infirmary/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        self.config.collection_url(kind)
    }

    fn resource_url(&self, kind: EntityKind, id: &RecordId) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    /// GET the whole collection of `R`
    pub async fn list<R: Record>(&self) -> GatewayResult<Vec<R>> {
        let url = self.collection_url(R::KIND);
        let result = self.fetch_json(self.client.get(&url), &url).await;

        log_outcome("list", R::KIND, None, &result);
        result
    }

    /// GET a single `R` by id
    pub async fn get_by_id<R: Record>(&self, id: &RecordId) -> GatewayResult<R> {
        let url = self.resource_url(R::KIND, id);
        let result = self.fetch_json(self.client.get(&url), &url).await;

        log_outcome("get", R::KIND, Some(id), &result);
        result
    }

    /// POST a new `R`; the server assigns its id
    ///
    /// Returns the created record including server-assigned fields.
    pub async fn create<R: Record>(&self, payload: &R) -> GatewayResult<R> {
        let url = self.collection_url(R::KIND);
        let result = self.fetch_json(self.client.post(&url).json(payload), &url).await;

        log_outcome("create", R::KIND, None, &result);
        result
    }

    /// PUT the full body of `R` (not a partial patch)
    pub async fn update<R: Record>(&self, id: &RecordId, payload: &R) -> GatewayResult<R> {
        let url = self.resource_url(R::KIND, id);
        let result = self.fetch_json(self.client.put(&url).json(payload), &url).await;

        log_outcome("update", R::KIND, Some(id), &result);
        result
    }

    /// DELETE an `R`
    ///
    /// `send` already turns any non-2xx response into `GatewayError::Status`,
    /// so a successful call always yields `Ok(true)`. The body is ignored.
    pub async fn remove<R: Record>(&self, id: &RecordId) -> GatewayResult<bool> {
        let url = self.resource_url(R::KIND, id);
        let result = self.send(self.client.delete(&url), &url).await.map(|_| true);

        log_outcome("remove", R::KIND, Some(id), &result);
        result
    }

    /// Flip a bill's claim status and PUT the result
    ///
    /// The bill is read as raw JSON and only `claimStatus` is replaced, so
    /// every other field goes back exactly as the server sent it. See
    /// [`ClaimStatus::toggled`] for how Pending and missing states are handled.
    pub async fn toggle_claim_status(&self, id: &RecordId) -> GatewayResult<FinancialRecord> {
        let url = self.resource_url(EntityKind::Financial, id);
        let result = self.flip_claim(&url, id).await;

        log_outcome("toggle claim", EntityKind::Financial, Some(id), &result);
        result
    }

    async fn flip_claim(&self, url: &str, id: &RecordId) -> GatewayResult<FinancialRecord> {
        let mut fields: Map<String, Value> = self.fetch_json(self.client.get(url), url).await?;
        let previous = fields
            .get("claimStatus")
            .and_then(Value::as_str)
            .and_then(|label| label.parse::<ClaimStatus>().ok());
        let next = ClaimStatus::toggled(previous);
        fields.insert("claimStatus".to_string(), Value::from(next.label()));

        tracing::debug!(id = %id, from = ?previous, to = %next, "Toggling claim status");

        self.fetch_json(self.client.put(url).json(&fields), url).await
    }

    /// Send a request and parse the JSON body of a 2xx response
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> GatewayResult<T> {
        let response = self.send(request, url).await?;
        decode(response, url).await
    }

    /// Send a request and turn non-2xx responses into `GatewayError::Status`
    async fn send(&self, request: RequestBuilder, url: &str) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|source| GatewayError::Transport {
            url: url.to_string(),
            source,
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("").to_string()
            } else {
                text
            };
            Err(GatewayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            })
        }
    }
}

/// Read a response body and parse it as JSON
async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> GatewayResult<T> {
    let bytes = response.bytes().await.map_err(|source| GatewayError::Transport {
        url: url.to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| GatewayError::Decode {
        url: url.to_string(),
        source,
    })
}

fn log_outcome<T>(
    operation: &str,
    kind: EntityKind,
    id: Option<&RecordId>,
    result: &GatewayResult<T>,
) {
    let id = id.map(|id| id.to_string()).unwrap_or_default();
    match result {
        Ok(_) => tracing::debug!(operation, entity = %kind, id = %id, "Gateway request succeeded"),
        Err(e) => tracing::error!(
            operation,
            entity = %kind,
            id = %id,
            status = ?e.status(),
            error = %e,
            "Gateway request failed"
        ),
    }
}
