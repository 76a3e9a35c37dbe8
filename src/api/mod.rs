pub mod client;
pub mod endpoint;
pub mod error;

pub use client::*;
pub use endpoint::*;
pub use error::*;

use async_trait::async_trait;
use crate::types::{MarketBar, PerformanceSummary, Position, Signal};

/// Read-only view of the dashboard backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketApi: Send + Sync {
    async fn portfolio(&self) -> Result<Vec<Position>, FetchError>;
    async fn performance(&self) -> Result<PerformanceSummary, FetchError>;
    async fn symbols(&self) -> Result<Vec<String>, FetchError>;
    async fn market_data(&self) -> Result<Vec<MarketBar>, FetchError>;
    async fn market_data_for(&self, symbol: &str) -> Result<Vec<MarketBar>, FetchError>;
    async fn knn_signals(&self, symbol: &str) -> Result<Vec<Signal>, FetchError>;
}
