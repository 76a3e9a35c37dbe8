use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

const EMA_PREFIX: &str = "ema_";

/// Classic indicator columns, in display order.
pub const CLASSIC_FIELDS: [&str; 8] = [
    "ma_50",
    "ma_200",
    "rsi_14",
    "macd",
    "macd_signal",
    "bb_upper",
    "bb_mid",
    "bb_lower",
];

/// One row of `/api/market-data[/symbol]`.
///
/// Every numeric field is optional: the backend emits `null` for warm-up
/// periods of the indicators and may omit columns entirely. EMA columns are
/// named `ema_<period>` and are kept in `extra` so any set of periods works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBar {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ma_200: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MarketBar {
    pub fn classic(&self, field: &str) -> Option<f64> {
        match field {
            "ma_50" => self.ma_50,
            "ma_200" => self.ma_200,
            "rsi_14" => self.rsi_14,
            "macd" => self.macd,
            "macd_signal" => self.macd_signal,
            "bb_upper" => self.bb_upper,
            "bb_mid" => self.bb_mid,
            "bb_lower" => self.bb_lower,
            _ => None,
        }
    }

    pub fn has_classic_fields(&self) -> bool {
        CLASSIC_FIELDS.iter().any(|f| self.classic(f).is_some())
    }

    /// EMA value for `period`; non-numeric values read as missing.
    pub fn ema(&self, period: u32) -> Option<f64> {
        self.extra
            .get(&format!("{}{}", EMA_PREFIX, period))
            .and_then(Value::as_f64)
    }

    /// EMA periods present as keys on this bar, ascending.
    pub fn ema_periods(&self) -> Vec<u32> {
        let mut periods: Vec<u32> = self
            .extra
            .keys()
            .filter_map(|k| k.strip_prefix(EMA_PREFIX))
            .filter_map(|p| p.parse().ok())
            .collect();
        periods.sort_unstable();
        periods
    }
}

/// Union of EMA periods over a response, ascending and deduplicated.
pub fn ema_periods(bars: &[MarketBar]) -> Vec<u32> {
    let mut periods: Vec<u32> = bars.iter().flat_map(|b| b.ema_periods()).collect();
    periods.sort_unstable();
    periods.dedup();
    periods
}
