//! Remote Service Gateway
//!
//! Typed access to the five care plan endpoints. No business logic: each call either
//! returns a tagged [`Outcome`] or raises a [`GatewayError`] when no structured answer
//! could be obtained.

use crate::config::ServerConfig;
use crate::error::{ClientError, GatewayError};
use crate::types::{
    ErrorListBody, ExportErrorBody, FullOrder, GenerationPayload, OrderForm, Outcome,
    SanitizedOrder, StatsSnapshot, ValidationPayload,
};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const STATS_PATH: &str = "/care-plan/stats";
pub const VALIDATE_PATH: &str = "/care-plan/validate";
pub const GENERATE_PATH: &str = "/care-plan/generate";
pub const SUBMIT_PATH: &str = "/care-plan/submit";
pub const ORDERS_PATH: &str = "/care-plan/orders";

/// Care plan service operations
#[async_trait]
pub trait CarePlanGateway: Send + Sync {
    /// Current aggregate counts. Any non-success status is an error; the body is ignored.
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError>;

    async fn validate_order(
        &self,
        form: &OrderForm,
    ) -> Result<Outcome<ValidationPayload>, GatewayError>;

    async fn generate_care_plan(
        &self,
        order: &SanitizedOrder,
    ) -> Result<Outcome<GenerationPayload>, GatewayError>;

    async fn submit_order(&self, order: &FullOrder) -> Result<Outcome<()>, GatewayError>;

    /// CSV export of every persisted order. A refusal is raised as
    /// [`GatewayError::Rejected`] carrying the server's `error` message.
    async fn export_orders(&self) -> Result<Vec<u8>, GatewayError>;
}

// Helper function to map transport errors to GatewayError
fn map_http_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GatewayError::Transport(format!("Connection error: {}", error))
    } else {
        GatewayError::Transport(format!("HTTP error: {}", error))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let body = response.bytes().await.map_err(map_http_error)?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Reads the body as `{errors}` on failure, or as `T` on success.
async fn read_outcome<T: DeserializeOwned>(response: Response) -> Result<Outcome<T>, GatewayError> {
    if response.status().is_success() {
        Ok(Outcome::Success(read_json(response).await?))
    } else {
        let body: ErrorListBody = read_json(response).await?;
        Ok(Outcome::Failure(body.errors))
    }
}

/// HTTP implementation of [`CarePlanGateway`]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl CarePlanGateway for HttpGateway {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError> {
        let response = self
            .client
            .get(self.url(STATS_PATH))
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Stats response");
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus(status.as_u16()));
        }
        read_json(response).await
    }

    async fn validate_order(
        &self,
        form: &OrderForm,
    ) -> Result<Outcome<ValidationPayload>, GatewayError> {
        let response = self
            .client
            .post(self.url(VALIDATE_PATH))
            .json(form)
            .send()
            .await
            .map_err(map_http_error)?;
        debug!(status = response.status().as_u16(), "Validate response");
        read_outcome(response).await
    }

    async fn generate_care_plan(
        &self,
        order: &SanitizedOrder,
    ) -> Result<Outcome<GenerationPayload>, GatewayError> {
        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(order)
            .send()
            .await
            .map_err(map_http_error)?;
        debug!(status = response.status().as_u16(), "Generate response");
        read_outcome(response).await
    }

    async fn submit_order(&self, order: &FullOrder) -> Result<Outcome<()>, GatewayError> {
        let response = self
            .client
            .post(self.url(SUBMIT_PATH))
            .json(order)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Submit response");
        if status.is_success() {
            return Ok(Outcome::Success(()));
        }
        let body: ErrorListBody = read_json(response).await?;
        Ok(Outcome::Failure(body.errors))
    }

    async fn export_orders(&self) -> Result<Vec<u8>, GatewayError> {
        let response = self
            .client
            .get(self.url(ORDERS_PATH))
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Export response");
        if !status.is_success() {
            let body: ExportErrorBody = read_json(response).await?;
            return Err(GatewayError::Rejected(body.error));
        }
        let blob = response.bytes().await.map_err(map_http_error)?;
        Ok(blob.to_vec())
    }
}
