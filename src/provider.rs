//! Sources of walking routes for a navigation session

use std::future::Future;
use std::sync::Arc;

use campusnav_core::{CampusModel, RouteRequest, RouteResponse, RouteResult, campus_routing};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error(transparent)]
    Routing(#[from] campusnav_core::Error),
}

impl ProviderError {
    /// Whether another provider might still answer the same request
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) => true,
            ProviderError::Status { status, .. } => status.is_server_error(),
            ProviderError::Routing(_) => false,
        }
    }
}

/// Computes routes for navigation sessions
pub trait RouteProvider: Send + Sync {
    fn route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<RouteResult, ProviderError>> + Send;
}

/// Routes in-process on a locally built campus model
#[derive(Debug, Clone)]
pub struct LocalRouter {
    model: Arc<CampusModel>,
}

impl LocalRouter {
    pub fn new(model: Arc<CampusModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &CampusModel {
        &self.model
    }
}

impl RouteProvider for LocalRouter {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        Ok(campus_routing(&self.model, request)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Routes through the `/route` endpoint of a campus routing server
#[derive(Debug, Clone)]
pub struct HttpRouter {
    client: Client,
    base_url: String,
}

impl HttpRouter {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl RouteProvider for HttpRouter {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        let url = format!("{}/route", self.base_url);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(&request.to_query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ProviderError::Status { status, message });
        }

        let body: RouteResponse = response.json().await?;
        #[allow(clippy::cast_precision_loss)]
        let length_m = body.length_m as f64;
        Ok(RouteResult {
            nodes: Vec::new(),
            path: body.path,
            length_m,
        })
    }
}

/// Tries `primary` and falls back to `fallback` on transient failures
#[derive(Debug, Clone)]
pub struct FallbackRouter<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackRouter<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RouteProvider, F: RouteProvider> RouteProvider for FallbackRouter<P, F> {
    async fn route(&self, request: &RouteRequest) -> Result<RouteResult, ProviderError> {
        match self.primary.route(request).await {
            Err(err) if err.is_transient() => {
                warn!("Primary route provider failed ({err}), using fallback");
                self.fallback.route(request).await
            }
            other => other,
        }
    }
}
