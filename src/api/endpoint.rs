use std::fmt;

/// Whether a non-2xx response is an error before the body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Parse the body regardless of status; only transport and JSON errors count.
    ParseOnly,
    /// Reject non-2xx with `FetchError::Status` without reading the body.
    CheckStatus,
}

/// Backend endpoints the dashboard reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Portfolio,
    Performance,
    Symbols,
    MarketData,
    MarketDataFor(String),
    KnnSignals(String),
}

impl Endpoint {
    /// Request path. Symbols are substituted verbatim.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Portfolio => "/api/portfolio".to_string(),
            Endpoint::Performance => "/api/performance".to_string(),
            Endpoint::Symbols => "/api/symbols".to_string(),
            Endpoint::MarketData => "/api/market-data".to_string(),
            Endpoint::MarketDataFor(symbol) => format!("/api/market-data/{}", symbol),
            Endpoint::KnnSignals(symbol) => format!("/api/knn-signals/{}", symbol),
        }
    }

    pub fn status_policy(&self) -> StatusPolicy {
        match self {
            Endpoint::KnnSignals(_) => StatusPolicy::CheckStatus,
            _ => StatusPolicy::ParseOnly,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
