//! Plotly figure model for `#chartContainer`.
//!
//! The base figure is a candlestick trace plus one line per moving-average
//! series. KNN signals are appended afterwards as two marker traces without
//! touching the base traces.

use serde::Serialize;
use std::collections::HashSet;

use super::ContainerState;
use crate::types::{ema_periods, MarketBar, Signal, SignalKind};

pub const INCREASING_COLOR: &str = "green";
pub const DECREASING_COLOR: &str = "red";

// Every MA line shares one style so the set reads as a ribbon.
pub const MA_LINE_COLOR: &str = "rgba(31, 119, 180, 1)";
pub const MA_LINE_WIDTH: f64 = 1.0;
pub const MA_LINE_OPACITY: f64 = 0.35;

pub const BUY_MARKER_COLOR: &str = "green";
pub const SELL_MARKER_COLOR: &str = "red";
pub const MARKER_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Scatter(ScatterTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick(t) => &t.name,
            Trace::Scatter(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<String>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub increasing: CandleStyle,
    pub decreasing: CandleStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleStyle {
    pub line: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub symbol: String,
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

impl Layout {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            xaxis: Axis {
                title: "Date".to_string(),
                kind: Some("date".to_string()),
                rangeslider: Some(RangeSlider { visible: false }),
            },
            yaxis: Axis {
                title: "Price".to_string(),
                kind: None,
                rangeslider: None,
            },
            showlegend: true,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::titled("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

pub fn candlestick(bars: &[MarketBar], name: &str) -> Trace {
    let line = |color: &str| CandleStyle {
        line: LineStyle {
            color: color.to_string(),
            width: None,
        },
    };

    Trace::Candlestick(CandlestickTrace {
        name: name.to_string(),
        x: bars.iter().map(|b| b.date.clone()).collect(),
        open: bars.iter().map(|b| b.open).collect(),
        high: bars.iter().map(|b| b.high).collect(),
        low: bars.iter().map(|b| b.low).collect(),
        close: bars.iter().map(|b| b.close).collect(),
        increasing: line(INCREASING_COLOR),
        decreasing: line(DECREASING_COLOR),
    })
}

fn ma_line(bars: &[MarketBar], name: String, y: Vec<Option<f64>>) -> Trace {
    Trace::Scatter(ScatterTrace {
        name,
        mode: "lines".to_string(),
        x: bars.iter().map(|b| b.date.clone()).collect(),
        y,
        line: Some(LineStyle {
            color: MA_LINE_COLOR.to_string(),
            width: Some(MA_LINE_WIDTH),
        }),
        marker: None,
        opacity: Some(MA_LINE_OPACITY),
    })
}

/// One line per moving-average series that has at least one value.
pub fn moving_average_traces(bars: &[MarketBar]) -> Vec<Trace> {
    let mut series: Vec<(String, Vec<Option<f64>>)> = vec![
        ("MA 50".to_string(), bars.iter().map(|b| b.ma_50).collect()),
        ("MA 200".to_string(), bars.iter().map(|b| b.ma_200).collect()),
    ];
    for period in ema_periods(bars) {
        series.push((
            format!("EMA {}", period),
            bars.iter().map(|b| b.ema(period)).collect(),
        ));
    }

    series
        .into_iter()
        .filter(|(_, y)| y.iter().any(Option::is_some))
        .map(|(name, y)| ma_line(bars, name, y))
        .collect()
}

pub fn base_figure(bars: &[MarketBar], title: &str) -> Figure {
    let mut data = vec![candlestick(bars, title)];
    data.extend(moving_average_traces(bars));
    Figure {
        data,
        layout: Layout::titled(title),
    }
}

fn marker_trace(name: &str, symbol: &str, color: &str, points: Vec<(String, f64)>) -> Trace {
    let (x, y): (Vec<String>, Vec<Option<f64>>) = points.into_iter().map(|(d, p)| (d, Some(p))).unzip();
    Trace::Scatter(ScatterTrace {
        name: name.to_string(),
        mode: "markers".to_string(),
        x,
        y,
        line: None,
        marker: Some(MarkerStyle {
            symbol: symbol.to_string(),
            color: color.to_string(),
            size: MARKER_SIZE,
        }),
        opacity: None,
    })
}

/// Buy and sell marker traces, in that order. Buys sit `offset` above the
/// signal price and sells `offset` below it. Signals dated off the chart's
/// x-axis are left out, as are signals that are neither buy nor sell.
pub fn signal_markers(signals: &[Signal], axis: &HashSet<&str>, offset: f64) -> [Trace; 2] {
    let mut buys = Vec::new();
    let mut sells = Vec::new();

    for signal in signals.iter().filter(|s| axis.contains(s.date.as_str())) {
        match signal.kind {
            SignalKind::Buy => buys.push((signal.date.clone(), signal.price + offset)),
            SignalKind::Sell => sells.push((signal.date.clone(), signal.price - offset)),
            SignalKind::Other => {}
        }
    }

    [
        marker_trace("Buy", "triangle-up", BUY_MARKER_COLOR, buys),
        marker_trace("Sell", "triangle-down", SELL_MARKER_COLOR, sells),
    ]
}

/// The chart render target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartView {
    figure: Figure,
    base_traces: usize,
    state: ContainerState,
}

impl ChartView {
    /// Replaces the whole figure. Any overlay from a previous render is gone.
    pub fn replace(&mut self, figure: Figure) {
        self.base_traces = figure.data.len();
        self.figure = figure;
        self.state = ContainerState::Loaded;
    }

    /// Appends overlay traces after the base traces. A repeated overlay
    /// replaces the previous one. Returns false on an empty chart.
    pub fn append_overlay(&mut self, traces: impl IntoIterator<Item = Trace>) -> bool {
        if self.state == ContainerState::Empty {
            return false;
        }
        self.figure.data.truncate(self.base_traces);
        self.figure.data.extend(traces);
        self.state = ContainerState::Annotated;
        true
    }

    /// Dates on the x-axis of the candlestick trace.
    pub fn x_axis(&self) -> HashSet<&str> {
        self.figure
            .data
            .iter()
            .find_map(|t| match t {
                Trace::Candlestick(c) => Some(c.x.iter().map(String::as_str).collect()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn base(&self) -> &[Trace] {
        &self.figure.data[..self.base_traces]
    }

    pub fn overlay(&self) -> &[Trace] {
        &self.figure.data[self.base_traces..]
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }
}
