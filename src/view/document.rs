use serde::Serialize;

use super::{ChartView, ContainerId, Panel, Selector, TableBody};

/// Lifecycle of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContainerState {
    #[default]
    Empty,
    Loaded,
    /// Chart only: signal markers appended to the loaded base figure.
    Annotated,
}

/// Every render target on the dashboard page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub portfolio_table: TableBody,
    pub performance: Panel,
    pub symbol_dropdown: Selector,
    pub market_data_table: TableBody,
    pub chart: ChartView,
}

impl Document {
    pub fn state(&self, container: ContainerId) -> ContainerState {
        match container {
            ContainerId::PortfolioTable => self.portfolio_table.state(),
            ContainerId::Performance => self.performance.state(),
            ContainerId::SymbolDropdown => self.symbol_dropdown.state(),
            ContainerId::MarketDataTable => self.market_data_table.state(),
            ContainerId::Chart => self.chart.state(),
        }
    }
}
