use serde::Serialize;

use super::format::{fixed2, plain, plain_number, text};
use super::ContainerState;
use crate::config::IndicatorSet;
use crate::types::{ema_periods, MarketBar, Position, CLASSIC_FIELDS};

/// Header plus body rows, already formatted for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableContent {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A `<tbody>` render target. Each render replaces every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableBody {
    content: TableContent,
    state: ContainerState,
}

impl TableBody {
    pub fn replace(&mut self, content: TableContent) {
        self.content = content;
        self.state = ContainerState::Loaded;
    }

    pub fn columns(&self) -> &[String] {
        &self.content.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.content.rows
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}

pub fn portfolio_table(positions: &[Position]) -> TableContent {
    TableContent {
        columns: vec!["Symbol".into(), "Shares".into(), "Avg Price".into()],
        rows: positions
            .iter()
            .map(|p| vec![p.symbol.clone(), plain(p.shares), plain(p.avg_price)])
            .collect(),
    }
}

/// Column set of the market-data table after resolving `IndicatorSet::Auto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketLayout {
    Basic,
    Classic,
    EmaRibbon(Vec<u32>),
}

impl MarketLayout {
    pub fn resolve(set: IndicatorSet, bars: &[MarketBar]) -> Self {
        match set {
            IndicatorSet::Basic => MarketLayout::Basic,
            IndicatorSet::Classic => MarketLayout::Classic,
            IndicatorSet::EmaRibbon => MarketLayout::EmaRibbon(ema_periods(bars)),
            IndicatorSet::Auto => {
                let periods = ema_periods(bars);
                if !periods.is_empty() {
                    MarketLayout::EmaRibbon(periods)
                } else if bars.iter().any(MarketBar::has_classic_fields) {
                    MarketLayout::Classic
                } else {
                    MarketLayout::Basic
                }
            }
        }
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = ["Date", "Open", "High", "Low", "Close", "Volume"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        match self {
            MarketLayout::Basic => {}
            MarketLayout::Classic => columns.extend(
                [
                    "MA 50", "MA 200", "RSI 14", "MACD", "MACD Signal", "BB Upper", "BB Mid",
                    "BB Lower",
                ]
                .iter()
                .map(|c| c.to_string()),
            ),
            MarketLayout::EmaRibbon(periods) => {
                columns.extend(periods.iter().map(|p| format!("EMA {}", p)));
                columns.push("Signals".to_string());
            }
        }
        columns
    }

    pub fn row(&self, bar: &MarketBar) -> Vec<String> {
        let mut row = vec![
            bar.date.clone(),
            fixed2(bar.open),
            fixed2(bar.high),
            fixed2(bar.low),
            fixed2(bar.close),
            plain_number(bar.volume.as_ref()),
        ];

        match self {
            MarketLayout::Basic => {}
            MarketLayout::Classic => {
                row.extend(CLASSIC_FIELDS.iter().map(|f| fixed2(bar.classic(f))));
            }
            MarketLayout::EmaRibbon(periods) => {
                row.extend(periods.iter().map(|p| fixed2(bar.ema(*p))));
                row.push(text(bar.signals.as_deref()));
            }
        }
        row
    }
}

pub fn market_table(bars: &[MarketBar], layout: &MarketLayout) -> TableContent {
    TableContent {
        columns: layout.columns(),
        rows: bars.iter().map(|b| layout.row(b)).collect(),
    }
}
