use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Addressable render targets on the dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContainerId {
    PortfolioTable,
    Performance,
    SymbolDropdown,
    MarketDataTable,
    Chart,
}

impl ContainerId {
    pub const ALL: [ContainerId; 5] = [
        ContainerId::PortfolioTable,
        ContainerId::Performance,
        ContainerId::SymbolDropdown,
        ContainerId::MarketDataTable,
        ContainerId::Chart,
    ];

    /// CSS selector of the element this container renders into.
    pub fn selector(&self) -> &'static str {
        match self {
            ContainerId::PortfolioTable => "#portfolioTable tbody",
            ContainerId::Performance => "#performance",
            ContainerId::SymbolDropdown => "#symbolDropdown",
            ContainerId::MarketDataTable => "#marketDataTable tbody",
            ContainerId::Chart => "#chartContainer",
        }
    }

    fn index(&self) -> usize {
        match self {
            ContainerId::PortfolioTable => 0,
            ContainerId::Performance => 1,
            ContainerId::SymbolDropdown => 2,
            ContainerId::MarketDataTable => 3,
            ContainerId::Chart => 4,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub container: ContainerId,
    pub seq: u64,
}

/// Last-issued-wins bookkeeping, one sequence per container.
///
/// A response may only be applied while its token is still the latest one
/// issued for its container.
#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: [AtomicU64; 5],
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, container: ContainerId) -> RequestToken {
        let seq = self.latest[container.index()].fetch_add(1, Ordering::AcqRel) + 1;
        RequestToken { container, seq }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest[token.container.index()].load(Ordering::Acquire) == token.seq
    }

    pub fn latest(&self, container: ContainerId) -> u64 {
        self.latest[container.index()].load(Ordering::Acquire)
    }
}
