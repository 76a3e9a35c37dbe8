use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub server: ServerSettings,
    pub page: PageSettings,
    pub chart: ChartSettings,
    pub market_table: MarketTableSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // API validation
        match reqwest::Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!("api.base_url: unsupported scheme '{}'", url.scheme())),
            Err(e) => errors.push(format!("api.base_url: {}", e)),
        }
        if self.api.request_timeout_secs == Some(0) {
            errors.push("api.request_timeout_secs must be > 0 when set".to_string());
        }

        // Page validation
        let mut seen = HashSet::new();
        for panel in &self.page.bootstrap {
            if !seen.insert(*panel) {
                errors.push(format!("page.bootstrap lists '{}' more than once", panel));
            }
        }

        // Chart validation
        if !self.chart.signal_offset.is_finite() || self.chart.signal_offset < 0.0 {
            errors.push("chart.signal_offset must be a finite value >= 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Panels fetched when the page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePanel {
    Portfolio,
    Performance,
    Symbols,
    MarketData,
}

impl PagePanel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PagePanel::Portfolio => "portfolio",
            PagePanel::Performance => "performance",
            PagePanel::Symbols => "symbols",
            PagePanel::MarketData => "market_data",
        }
    }
}

impl fmt::Display for PagePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub title: String,
    pub bootstrap: Vec<PagePanel>,
    pub plotly_src: String,
    pub static_dir: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: "Portfolio Dashboard".to_string(),
            bootstrap: vec![PagePanel::Portfolio, PagePanel::Performance, PagePanel::Symbols],
            plotly_src: "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Vertical distance between a signal's price and its marker.
    pub signal_offset: f64,
    pub title: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            signal_offset: 5.0,
            title: "Price".to_string(),
        }
    }
}

/// Which indicator columns the market-data table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSet {
    /// Pick from the fields present in the response.
    #[default]
    Auto,
    Basic,
    Classic,
    EmaRibbon,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketTableSettings {
    pub indicator_set: IndicatorSet,
}
