use serde::{Deserialize, Serialize};

/// One holding from `/api/portfolio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares: f64,
    pub avg_price: f64,
}

/// Body of `/api/performance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    #[serde(rename = "totalValue")]
    pub total_value: f64,
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
}
