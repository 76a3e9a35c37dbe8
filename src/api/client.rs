use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{Endpoint, FetchError, MarketApi, StatusPolicy};
use crate::config::ApiSettings;
use crate::types::{MarketBar, PerformanceSummary, Position, Signal};

/// reqwest-backed client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GETs `endpoint` and decodes the body, applying the endpoint's status policy.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, FetchError> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if endpoint.status_policy() == StatusPolicy::CheckStatus && !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let value = serde_json::from_slice(&body)?;
        debug!("{} -> {} ({} bytes)", endpoint, status, body.len());
        Ok(value)
    }
}

#[async_trait]
impl MarketApi for HttpApiClient {
    async fn portfolio(&self) -> Result<Vec<Position>, FetchError> {
        self.get_json(&Endpoint::Portfolio).await
    }

    async fn performance(&self) -> Result<PerformanceSummary, FetchError> {
        self.get_json(&Endpoint::Performance).await
    }

    async fn symbols(&self) -> Result<Vec<String>, FetchError> {
        self.get_json(&Endpoint::Symbols).await
    }

    async fn market_data(&self) -> Result<Vec<MarketBar>, FetchError> {
        self.get_json(&Endpoint::MarketData).await
    }

    async fn market_data_for(&self, symbol: &str) -> Result<Vec<MarketBar>, FetchError> {
        self.get_json(&Endpoint::MarketDataFor(symbol.to_string())).await
    }

    async fn knn_signals(&self, symbol: &str) -> Result<Vec<Signal>, FetchError> {
        self.get_json(&Endpoint::KnnSignals(symbol.to_string())).await
    }
}
