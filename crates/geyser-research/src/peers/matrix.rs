//! Side-by-side metric matrix for a target and its peers

use crate::analysis::mean;
use crate::collector::CompanyData;
use geyser_template::format;
use serde::{Deserialize, Serialize};

/// How a metric is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    Multiple,
    Percent,
    MarketCap,
}

impl MetricKind {
    pub fn display(&self, value: Option<f64>) -> String {
        match self {
            Self::Multiple => format::fixed(value, 2),
            Self::Percent => format::percent(value),
            Self::MarketCap => format::billions(value),
        }
    }
}

type Extractor = fn(&CompanyData) -> Option<f64>;

/// Compared metrics in display order
const METRICS: &[(&str, MetricKind, Extractor)] = &[
    ("P/E (TTM)", MetricKind::Multiple, |d| d.statistics.pe_trailing),
    ("P/E (Forward)", MetricKind::Multiple, |d| d.statistics.pe_forward),
    ("PEG Ratio", MetricKind::Multiple, |d| d.statistics.peg_ratio),
    ("P/B", MetricKind::Multiple, |d| d.statistics.price_to_book),
    ("P/S", MetricKind::Multiple, |d| d.statistics.price_to_sales),
    ("EV/EBITDA", MetricKind::Multiple, |d| d.statistics.ev_to_ebitda),
    ("EV/Revenue", MetricKind::Multiple, |d| d.statistics.ev_to_revenue),
    ("Gross Margin", MetricKind::Percent, |d| d.statistics.gross_margin),
    ("Operating Margin", MetricKind::Percent, |d| d.statistics.operating_margin),
    ("Net Margin", MetricKind::Percent, |d| d.statistics.profit_margin),
    ("ROE", MetricKind::Percent, |d| d.statistics.roe),
    ("ROA", MetricKind::Percent, |d| d.statistics.roa),
    ("Revenue Growth", MetricKind::Percent, |d| d.statistics.revenue_growth),
    ("Earnings Growth", MetricKind::Percent, |d| d.statistics.earnings_growth),
    ("Current Ratio", MetricKind::Multiple, |d| d.statistics.current_ratio),
    ("Debt/Equity", MetricKind::Multiple, |d| d.statistics.debt_to_equity),
    ("Market Cap ($B)", MetricKind::MarketCap, |d| d.overview.market_cap),
    ("Beta", MetricKind::Multiple, |d| d.statistics.beta),
    ("1Y Return", MetricKind::Percent, |d| d.returns.return_1y),
    ("YTD Return", MetricKind::Percent, |d| d.returns.return_ytd),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub metric: String,
    pub kind: MetricKind,
    pub target: Option<f64>,
    /// One entry per collected peer, in peer order
    pub peers: Vec<Option<f64>>,
    /// Mean of the non-missing peer values
    pub peer_avg: Option<f64>,
}

impl MatrixRow {
    /// Present peer values only
    pub fn peer_values(&self) -> Vec<f64> {
        self.peers.iter().flatten().copied().collect()
    }

    /// Target, each peer and the average, formatted for a table
    pub fn display_cells(&self) -> Vec<String> {
        let mut cells = vec![self.metric.clone(), self.kind.display(self.target)];
        cells.extend(self.peers.iter().map(|v| self.kind.display(*v)));
        cells.push(self.kind.display(self.peer_avg));
        cells
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub target: String,
    /// Peers that were collected successfully
    pub peers: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl ComparisonMatrix {
    pub fn build(target: &CompanyData, peers: &[CompanyData]) -> Self {
        let rows = METRICS
            .iter()
            .map(|(label, kind, extract)| {
                let values: Vec<Option<f64>> = peers.iter().map(extract).collect();
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                MatrixRow {
                    metric: (*label).to_string(),
                    kind: *kind,
                    target: extract(target),
                    peer_avg: mean(&present),
                    peers: values,
                }
            })
            .collect();

        Self {
            target: target.ticker.clone(),
            peers: peers.iter().map(|p| p.ticker.clone()).collect(),
            rows,
        }
    }

    pub fn row(&self, metric: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }

    /// Table header: metric, target, peers, average
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["Metric".to_string(), self.target.clone()];
        headers.extend(self.peers.iter().cloned());
        headers.push("Peer Avg".to_string());
        headers
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
