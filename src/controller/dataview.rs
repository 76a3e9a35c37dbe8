use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::{BootstrapReport, LoadReport, RenderOutcome};
use crate::api::{FetchError, MarketApi};
use crate::config::{ChartSettings, IndicatorSet, PagePanel, Settings};
use crate::view::chart::{base_figure, signal_markers, Figure, Trace};
use crate::view::{
    market_table, performance_lines, portfolio_table, ContainerId, Document, MarketLayout,
    RequestToken, RequestTokens,
};

/// Drives every fetch → transform → render pipeline of the dashboard.
///
/// Fetches never hold the document lock. Each result is settled in one place:
/// failures are logged and leave the container untouched, and successes are
/// applied only while their request token is still the container's latest.
pub struct DataViewController {
    api: Arc<dyn MarketApi>,
    document: Arc<RwLock<Document>>,
    tokens: RequestTokens,
    bootstrap_panels: Vec<PagePanel>,
    indicator_set: IndicatorSet,
    chart: ChartSettings,
}

impl DataViewController {
    pub fn new(api: Arc<dyn MarketApi>, settings: &Settings) -> Self {
        Self {
            api,
            document: Arc::new(RwLock::new(Document::default())),
            tokens: RequestTokens::new(),
            bootstrap_panels: settings.page.bootstrap.clone(),
            indicator_set: settings.market_table.indicator_set,
            chart: settings.chart.clone(),
        }
    }

    pub async fn document(&self) -> Document {
        self.document.read().await.clone()
    }

    /// The dropdown's current value, as the load trigger would read it.
    pub async fn selected_symbol(&self) -> Option<String> {
        self.document
            .read()
            .await
            .symbol_dropdown
            .current_value()
            .map(str::to_string)
    }

    /// Page-load fetches. Panels are fetched concurrently and settle independently.
    pub async fn bootstrap(&self) -> BootstrapReport {
        debug!("Bootstrapping panels: {:?}", self.bootstrap_panels);

        let outcomes = join_all(self.bootstrap_panels.iter().map(|p| self.refresh(*p))).await;
        let report = BootstrapReport {
            panels: self.bootstrap_panels.iter().copied().zip(outcomes).collect(),
        };

        if report.failures() > 0 {
            warn!("{} of {} panels failed to load", report.failures(), report.panels.len());
        }

        let doc = self.document.read().await;
        for container in ContainerId::ALL {
            debug!("{} is {:?}", container, doc.state(container));
        }
        report
    }

    pub async fn refresh(&self, panel: PagePanel) -> RenderOutcome {
        match panel {
            PagePanel::Portfolio => self.refresh_portfolio().await,
            PagePanel::Performance => self.refresh_performance().await,
            PagePanel::Symbols => self.refresh_symbols().await,
            PagePanel::MarketData => self.refresh_market_data().await,
        }
    }

    pub async fn refresh_portfolio(&self) -> RenderOutcome {
        let token = self.tokens.issue(ContainerId::PortfolioTable);
        let result = self.api.portfolio().await;

        self.settle(token, "Error fetching portfolio", result, |doc, positions| {
            doc.portfolio_table.replace(portfolio_table(&positions));
        })
        .await
    }

    pub async fn refresh_performance(&self) -> RenderOutcome {
        let token = self.tokens.issue(ContainerId::Performance);
        let result = self.api.performance().await;

        self.settle(token, "Error fetching performance", result, |doc, summary| {
            doc.performance.replace(performance_lines(&summary));
        })
        .await
    }

    pub async fn refresh_symbols(&self) -> RenderOutcome {
        let token = self.tokens.issue(ContainerId::SymbolDropdown);
        let result = self.api.symbols().await;

        self.settle(token, "Error fetching symbols", result, |doc, symbols| {
            debug!("Populating symbol dropdown with {} options", symbols.len());
            doc.symbol_dropdown.replace(symbols);
        })
        .await
    }

    /// Unparametrized market data: basic table plus a candles-only chart.
    pub async fn refresh_market_data(&self) -> RenderOutcome {
        let table_token = self.tokens.issue(ContainerId::MarketDataTable);
        let chart_token = self.tokens.issue(ContainerId::Chart);

        let bars = match self.api.market_data().await {
            Ok(bars) => bars,
            Err(e) => return Self::report("Error fetching market data", e),
        };

        let content = market_table(&bars, &MarketLayout::Basic);
        let table = self
            .apply_if_current(table_token, |doc| doc.market_data_table.replace(content))
            .await;

        let figure = base_figure(&bars, &self.chart.title);
        self.render_chart(chart_token, figure).await;

        table
    }

    /// The load trigger: table, chart, then the signal overlay for `symbol`.
    pub async fn load_symbol(&self, symbol: &str) -> LoadReport {
        info!("Loading market data for {}", symbol);
        self.document.write().await.symbol_dropdown.select(symbol);

        let table_token = self.tokens.issue(ContainerId::MarketDataTable);
        let chart_token = self.tokens.issue(ContainerId::Chart);

        let bars = match self.api.market_data_for(symbol).await {
            Ok(bars) => bars,
            Err(e) => {
                return LoadReport {
                    symbol: symbol.to_string(),
                    table: Self::report("Error fetching market data", e),
                    chart: RenderOutcome::Skipped,
                    overlay: RenderOutcome::Skipped,
                }
            }
        };

        let layout = MarketLayout::resolve(self.indicator_set, &bars);
        let content = market_table(&bars, &layout);
        let table = self
            .apply_if_current(table_token, |doc| doc.market_data_table.replace(content))
            .await;

        let chart = self.render_chart(chart_token, base_figure(&bars, symbol)).await;

        let overlay = if chart.is_rendered() {
            self.overlay_signals(symbol, chart_token).await
        } else {
            RenderOutcome::Skipped
        };

        LoadReport {
            symbol: symbol.to_string(),
            table,
            chart,
            overlay,
        }
    }

    async fn render_chart(&self, chart_token: RequestToken, figure: Figure) -> RenderOutcome {
        debug!(
            "Chart traces: {:?}",
            figure.data.iter().map(Trace::name).collect::<Vec<_>>()
        );
        self.apply_if_current(chart_token, |doc| doc.chart.replace(figure))
            .await
    }

    /// Appends buy/sell markers to the chart rendered under `chart_token`.
    pub async fn overlay_signals(&self, symbol: &str, chart_token: RequestToken) -> RenderOutcome {
        let result = self.api.knn_signals(symbol).await;
        let offset = self.chart.signal_offset;

        self.settle(chart_token, "Error fetching signals", result, |doc, signals| {
            let markers = {
                let axis = doc.chart.x_axis();
                signal_markers(&signals, &axis, offset)
            };
            doc.chart.append_overlay(markers);
            debug!(
                "Overlaid {} signals for {} ({} base traces, {} markers)",
                signals.len(),
                symbol,
                doc.chart.base().len(),
                doc.chart.overlay().len()
            );
        })
        .await
    }

    /// The single render-or-report decision point.
    async fn settle<T>(
        &self,
        token: RequestToken,
        context: &'static str,
        result: Result<T, FetchError>,
        apply: impl FnOnce(&mut Document, T),
    ) -> RenderOutcome {
        match result {
            Ok(payload) => self.apply_if_current(token, |doc| apply(doc, payload)).await,
            Err(e) => Self::report(context, e),
        }
    }

    async fn apply_if_current(
        &self,
        token: RequestToken,
        apply: impl FnOnce(&mut Document),
    ) -> RenderOutcome {
        let mut doc = self.document.write().await;
        if !self.tokens.is_current(token) {
            debug!(
                "Discarding stale response for {} (request {}, latest {})",
                token.container,
                token.seq,
                self.tokens.latest(token.container)
            );
            return RenderOutcome::Stale;
        }
        apply(&mut doc);
        RenderOutcome::Rendered
    }

    fn report(context: &'static str, err: FetchError) -> RenderOutcome {
        error!("{}: {}", context, err);
        RenderOutcome::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketApi;
    use crate::types::{MarketBar, PerformanceSummary, Position, Signal, SignalKind};
    use crate::view::ContainerState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn bars_for(symbol: &str) -> Vec<MarketBar> {
        serde_json::from_value(serde_json::json!([
            {"symbol": symbol, "date": "2025-01-07", "open": 149.0, "high": 150.5,
             "low": 148.7, "close": 150.2, "volume": 900, "ma_50": 148.0},
            {"symbol": symbol, "date": "2025-01-08", "open": 150.2, "high": 151.0,
             "low": 149.8, "close": 150.9, "volume": 1000, "ma_50": 148.5}
        ]))
        .unwrap()
    }

    fn buy_signal() -> Vec<Signal> {
        vec![Signal {
            kind: SignalKind::Buy,
            date: "2025-01-08".to_string(),
            price: 150.0,
        }]
    }

    fn controller(api: impl MarketApi + 'static) -> DataViewController {
        DataViewController::new(Arc::new(api), &Settings::default())
    }

    fn overlay_y(doc: &Document, index: usize) -> Vec<Option<f64>> {
        match &doc.chart.overlay()[index] {
            Trace::Scatter(s) => s.y.clone(),
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_new_controller_has_empty_document() {
        let controller = controller(MockMarketApi::new());
        let doc = tokio_test::block_on(controller.document());
        assert_eq!(doc, Document::default());
    }

    #[tokio::test]
    async fn test_bootstrap_renders_each_panel() {
        let mut api = MockMarketApi::new();
        api.expect_portfolio().times(1).returning(|| {
            Ok(vec![Position {
                symbol: "AAPL".to_string(),
                shares: 10.0,
                avg_price: 150.0,
            }])
        });
        api.expect_performance().times(1).returning(|| {
            Ok(PerformanceSummary {
                total_value: 120000.0,
                unrealized_pnl: 5000.0,
            })
        });
        api.expect_symbols()
            .times(1)
            .returning(|| Err(FetchError::Transport("connection refused".to_string())));

        let controller = controller(api);
        let report = controller.bootstrap().await;

        assert!(report.get(PagePanel::Portfolio).unwrap().is_rendered());
        assert!(report.get(PagePanel::Performance).unwrap().is_rendered());
        assert!(report.get(PagePanel::Symbols).unwrap().is_failed());
        assert_eq!(report.failures(), 1);

        let doc = controller.document().await;
        assert_eq!(doc.portfolio_table.rows()[0], vec!["AAPL", "10", "150"]);
        assert_eq!(doc.performance.lines()[0], "Total Value: $120000");
        assert_eq!(doc.symbol_dropdown.state(), ContainerState::Empty);
    }

    #[tokio::test]
    async fn test_failed_symbol_fetch_keeps_options() {
        let calls = AtomicUsize::new(0);
        let mut api = MockMarketApi::new();
        api.expect_symbols().times(2).returning(move || {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec!["AAPL".to_string(), "MSFT".to_string()])
            } else {
                Err(FetchError::Transport("network down".to_string()))
            }
        });

        let controller = controller(api);
        assert!(controller.refresh_symbols().await.is_rendered());
        let before = controller.document().await.symbol_dropdown;

        assert!(controller.refresh_symbols().await.is_failed());
        let after = controller.document().await.symbol_dropdown;
        assert_eq!(before, after);
        assert_eq!(after.options().len(), 2);
    }

    #[tokio::test]
    async fn test_load_symbol_renders_table_chart_and_overlay() {
        let mut api = MockMarketApi::new();
        api.expect_market_data_for().times(1).returning(|s| {
            assert_eq!(s, "AAPL");
            Ok(bars_for(s))
        });
        api.expect_knn_signals().times(1).returning(|_| Ok(buy_signal()));

        let controller = controller(api);
        let report = controller.load_symbol("AAPL").await;

        assert!(report.table.is_rendered());
        assert!(report.chart.is_rendered());
        assert!(report.overlay.is_rendered());

        let doc = controller.document().await;
        assert_eq!(
            doc.market_data_table.rows()[1][1..6],
            ["150.20", "151.00", "149.80", "150.90", "1000"]
        );
        assert_eq!(doc.chart.state(), ContainerState::Annotated);
        // candlestick + MA 50
        assert_eq!(doc.chart.base().len(), 2);
        assert_eq!(overlay_y(&doc, 0), vec![Some(155.0)]);
        assert!(overlay_y(&doc, 1).is_empty());
    }

    #[tokio::test]
    async fn test_signal_status_error_adds_no_overlay() {
        let mut api = MockMarketApi::new();
        api.expect_market_data_for().returning(|s| Ok(bars_for(s)));
        api.expect_knn_signals()
            .returning(|_| Err(FetchError::Status(500)));

        let controller = controller(api);
        let report = controller.load_symbol("AAPL").await;

        assert!(report.chart.is_rendered());
        assert!(matches!(report.overlay.error(), Some(FetchError::Status(500))));

        let doc = controller.document().await;
        assert_eq!(doc.chart.state(), ContainerState::Loaded);
        assert!(doc.chart.overlay().is_empty());
    }

    #[tokio::test]
    async fn test_reload_drops_previous_overlay() {
        let calls = AtomicUsize::new(0);
        let mut api = MockMarketApi::new();
        api.expect_market_data_for().returning(|s| Ok(bars_for(s)));
        api.expect_knn_signals().times(2).returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(buy_signal())
            } else {
                Err(FetchError::Status(503))
            }
        });

        let controller = controller(api);
        controller.load_symbol("AAPL").await;
        assert_eq!(controller.document().await.chart.state(), ContainerState::Annotated);

        controller.load_symbol("AAPL").await;
        let doc = controller.document().await;
        assert_eq!(doc.chart.state(), ContainerState::Loaded);
        assert!(doc.chart.overlay().is_empty());
    }

    #[tokio::test]
    async fn test_overlay_for_replaced_chart_is_stale() {
        let mut api = MockMarketApi::new();
        api.expect_knn_signals().times(1).returning(|_| Ok(buy_signal()));
        let controller = controller(api);

        let first = controller.tokens.issue(ContainerId::Chart);
        let figure = base_figure(&bars_for("AAPL"), "AAPL");
        assert!(controller.render_chart(first, figure).await.is_rendered());
        controller.tokens.issue(ContainerId::Chart);

        let outcome = controller.overlay_signals("AAPL", first).await;
        assert!(matches!(outcome, RenderOutcome::Stale));

        let doc = controller.document().await;
        assert_eq!(doc.chart.state(), ContainerState::Loaded);
        assert!(doc.chart.overlay().is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_prior_table_and_chart() {
        let calls = AtomicUsize::new(0);
        let mut api = MockMarketApi::new();
        api.expect_market_data_for().times(2).returning(move |s| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(bars_for(s))
            } else {
                Err(FetchError::Decode(
                    serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
                ))
            }
        });
        api.expect_knn_signals().times(1).returning(|_| Ok(Vec::new()));

        let controller = controller(api);
        controller.load_symbol("AAPL").await;
        let before = controller.document().await;

        let report = controller.load_symbol("MSFT").await;
        assert!(report.table.is_failed());
        assert!(matches!(report.chart, RenderOutcome::Skipped));
        assert!(matches!(report.overlay, RenderOutcome::Skipped));

        let after = controller.document().await;
        assert_eq!(after.market_data_table, before.market_data_table);
        assert_eq!(after.chart, before.chart);
    }

    #[tokio::test]
    async fn test_same_response_renders_identically() {
        let mut api = MockMarketApi::new();
        api.expect_market_data().times(2).returning(|| Ok(bars_for("AAPL")));

        let controller = controller(api);
        controller.refresh_market_data().await;
        let first = controller.document().await.market_data_table;
        controller.refresh_market_data().await;
        let second = controller.document().await.market_data_table;

        assert_eq!(first, second);
        assert_eq!(second.rows().len(), 2);
        assert_eq!(second.columns().len(), 6);
    }

    /// Holds `market_data_for("SLOW")` until released.
    struct GatedApi {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl MarketApi for GatedApi {
        async fn portfolio(&self) -> Result<Vec<Position>, FetchError> {
            Ok(Vec::new())
        }

        async fn performance(&self) -> Result<PerformanceSummary, FetchError> {
            Err(FetchError::Status(404))
        }

        async fn symbols(&self) -> Result<Vec<String>, FetchError> {
            Ok(Vec::new())
        }

        async fn market_data(&self) -> Result<Vec<MarketBar>, FetchError> {
            Ok(Vec::new())
        }

        async fn market_data_for(&self, symbol: &str) -> Result<Vec<MarketBar>, FetchError> {
            if symbol == "SLOW" {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(bars_for(symbol))
        }

        async fn knn_signals(&self, _symbol: &str) -> Result<Vec<Signal>, FetchError> {
            Ok(buy_signal())
        }
    }

    #[tokio::test]
    async fn test_last_issued_request_wins() {
        let api = Arc::new(GatedApi {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let controller = Arc::new(DataViewController::new(api.clone(), &Settings::default()));

        let slow = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.load_symbol("SLOW").await })
        };
        api.entered.notified().await;

        let fast = controller.load_symbol("FAST").await;
        assert!(fast.table.is_rendered());
        assert!(fast.overlay.is_rendered());

        api.release.notify_one();
        let slow = slow.await.unwrap();
        assert!(matches!(slow.table, RenderOutcome::Stale));
        assert!(matches!(slow.chart, RenderOutcome::Stale));
        assert!(matches!(slow.overlay, RenderOutcome::Skipped));

        let doc = controller.document().await;
        assert_eq!(doc.chart.state(), ContainerState::Annotated);
        assert_eq!(doc.market_data_table.rows().len(), 2);
        match &doc.chart.base()[0] {
            Trace::Candlestick(c) => assert_eq!(c.name, "FAST"),
            other => panic!("expected candlestick, got {:?}", other),
        }
    }
}
