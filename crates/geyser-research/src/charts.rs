//! Vega-Lite chart specifications
//!
//! Each builder returns `None` when it has nothing to plot. [`ChartWriter`]
//! saves a spec as raw JSON or as a standalone HTML page that renders it
//! with vega-embed.

use crate::analysis::technical::moving_average;
use crate::analysis::{FinancialAnalysis, MetricHistory};
use crate::config::ChartFormat;
use crate::error::{ResearchError, Result};
use crate::model::PriceBar;
use crate::peers::ComparisonMatrix;
use crate::scoring::ScoreReport;
use chrono::Duration;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const PRIMARY: &str = "#1f77b4";
const NEUTRAL: &str = "#7f7f7f";
const PEER_CHART_METRICS: &[&str] = &["P/E (TTM)", "EV/EBITDA", "P/S", "P/B"];
const GAUGE_BANDS: &[(f64, f64, &str)] = &[
    (0.0, 3.5, "#d62728"),
    (3.5, 5.0, "#ff7f0e"),
    (5.0, 6.5, "#bcbd22"),
    (6.5, 8.0, "#98df8a"),
    (8.0, 10.0, "#2ca02c"),
];

/// A named chart ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// File stem suffix, e.g. `price_chart`
    pub name: &'static str,
    pub title: String,
    pub spec: Value,
}

fn base(title: &str) -> serde_json::Map<String, Value> {
    let mut map = serde_json::Map::new();
    map.insert("$schema".into(), json!(SCHEMA));
    map.insert("title".into(), json!({ "text": title, "fontSize": 20 }));
    map
}

fn chart(name: &'static str, title: String, body: Value) -> ChartSpec {
    let mut map = base(&title);
    if let Value::Object(extra) = body {
        map.extend(extra);
    }
    ChartSpec {
        name,
        title,
        spec: Value::Object(map),
    }
}

/// Closing price with moving averages over the trailing window, plus volume
pub fn price_chart(
    ticker: &str,
    prices: &[PriceBar],
    years: u32,
    ma_short: usize,
    ma_long: usize,
) -> Result<Option<ChartSpec>> {
    let Some(last) = prices.last() else {
        return Ok(None);
    };

    let closes: Vec<f64> = prices.iter().map(|b| b.close).collect();
    let short = moving_average(&closes, ma_short)?;
    let long = moving_average(&closes, ma_long)?;

    let cutoff = last.date - Duration::days(i64::from(years) * 365);
    let start = prices.iter().position(|b| b.date >= cutoff).unwrap_or(0);

    let mut values = Vec::with_capacity(prices.len() - start);
    for (i, bar) in prices.iter().enumerate().skip(start) {
        let date = bar.date.to_string();
        values.push(json!({ "date": date, "series": "Price", "value": bar.close, "volume": bar.volume }));
        if let Some(v) = short[i] {
            values.push(json!({ "date": date, "series": format!("{ma_short}-day MA"), "value": v }));
        }
        if let Some(v) = long[i] {
            values.push(json!({ "date": date, "series": format!("{ma_long}-day MA"), "value": v }));
        }
    }

    let title = format!("{ticker} Price Chart ({years} Year)");
    Ok(Some(chart(
        "price_chart",
        title,
        json!({
            "data": { "values": values },
            "vconcat": [
                {
                    "width": 800,
                    "height": 420,
                    "mark": "line",
                    "encoding": {
                        "x": { "field": "date", "type": "temporal", "title": null },
                        "y": { "field": "value", "type": "quantitative", "title": "Price ($)", "scale": { "zero": false } },
                        "color": { "field": "series", "type": "nominal", "legend": { "orient": "top" } }
                    }
                },
                {
                    "width": 800,
                    "height": 120,
                    "transform": [{ "filter": "datum.series === 'Price'" }],
                    "mark": { "type": "bar", "color": NEUTRAL },
                    "encoding": {
                        "x": { "field": "date", "type": "temporal", "title": null },
                        "y": { "field": "volume", "type": "quantitative", "title": "Volume" }
                    }
                }
            ]
        }),
    )))
}

fn history_values(label: &str, history: &MetricHistory) -> Vec<Value> {
    history
        .years
        .iter()
        .zip(&history.values)
        .map(|(year, value)| {
            json!({
                "metric": label,
                "year": year,
                "billions": value.map_or(0.0, |v| v / 1e9)
            })
        })
        .collect()
}

/// Revenue, net income and free cash flow by year, in billions
pub fn financial_trends_chart(ticker: &str, analysis: &FinancialAnalysis) -> Option<ChartSpec> {
    let growth = &analysis.growth;
    if growth.revenue_history.is_empty()
        && growth.net_income_history.is_empty()
        && growth.fcf_history.is_empty()
    {
        return None;
    }

    let mut values = history_values("Revenue", &growth.revenue_history);
    values.extend(history_values("Net Income", &growth.net_income_history));
    values.extend(history_values("Free Cash Flow", &growth.fcf_history));

    Some(chart(
        "financial_trends",
        format!("{ticker} Financial Trends"),
        json!({
            "data": { "values": values },
            "facet": { "column": { "field": "metric", "type": "nominal", "title": null, "sort": ["Revenue", "Net Income", "Free Cash Flow"] } },
            "spec": {
                "width": 240,
                "height": 300,
                "mark": "bar",
                "encoding": {
                    "x": { "field": "year", "type": "ordinal", "title": "Year" },
                    "y": { "field": "billions", "type": "quantitative", "title": "$ Billions" },
                    "color": { "field": "metric", "type": "nominal", "legend": null }
                }
            }
        }),
    ))
}

/// Gross, operating and net margin by year
pub fn margin_chart(ticker: &str, analysis: &FinancialAnalysis) -> Option<ChartSpec> {
    let trends = &analysis.profitability.margin_trends;
    if trends.years.is_empty() {
        return None;
    }

    let mut values = Vec::new();
    for (label, series) in [
        ("Gross Margin", &trends.gross_margin),
        ("Operating Margin", &trends.operating_margin),
        ("Net Margin", &trends.net_margin),
    ] {
        // Trends are stored most recent first
        for (year, margin) in trends.years.iter().zip(series).rev() {
            if let Some(m) = margin {
                values.push(json!({ "year": year, "series": label, "margin": m * 100.0 }));
            }
        }
    }
    if values.is_empty() {
        return None;
    }

    Some(chart(
        "margin_analysis",
        format!("{ticker} Margin Analysis"),
        json!({
            "data": { "values": values },
            "width": 600,
            "height": 350,
            "mark": { "type": "line", "point": true },
            "encoding": {
                "x": { "field": "year", "type": "ordinal", "title": "Year" },
                "y": { "field": "margin", "type": "quantitative", "title": "Margin (%)" },
                "color": { "field": "series", "type": "nominal" }
            }
        }),
    ))
}

fn company_color(ticker: &str) -> Value {
    json!({
        "condition": { "test": format!("datum.company === '{ticker}'"), "value": PRIMARY },
        "value": NEUTRAL
    })
}

/// Valuation multiples of the target against each peer
pub fn peer_valuation_chart(matrix: &ComparisonMatrix) -> Option<ChartSpec> {
    let mut values = Vec::new();
    let mut metrics = Vec::new();
    for metric in PEER_CHART_METRICS {
        let Some(row) = matrix.row(metric) else {
            continue;
        };
        metrics.push(*metric);
        let companies = std::iter::once((&matrix.target, row.target))
            .chain(matrix.peers.iter().zip(row.peers.iter().copied()));
        for (company, value) in companies {
            values.push(json!({ "metric": metric, "company": company, "value": value.unwrap_or(0.0) }));
        }
    }
    if values.is_empty() {
        return None;
    }

    Some(chart(
        "peer_valuation",
        format!("{} Valuation vs Peers", matrix.target),
        json!({
            "data": { "values": values },
            "facet": { "field": "metric", "type": "nominal", "title": null, "sort": metrics },
            "columns": 2,
            "resolve": { "scale": { "y": "independent" } },
            "spec": {
                "width": 320,
                "height": 220,
                "mark": "bar",
                "encoding": {
                    "x": { "field": "company", "type": "nominal", "title": null, "sort": null },
                    "y": { "field": "value", "type": "quantitative", "title": null },
                    "color": company_color(&matrix.target)
                }
            }
        }),
    ))
}

/// Revenue growth against P/E for every company with both values
pub fn growth_vs_valuation_chart(matrix: &ComparisonMatrix) -> Option<ChartSpec> {
    let growth = matrix.row("Revenue Growth")?;
    let pe = matrix.row("P/E (TTM)")?;

    let companies = std::iter::once((&matrix.target, growth.target, pe.target)).chain(
        matrix
            .peers
            .iter()
            .zip(growth.peers.iter().copied().zip(pe.peers.iter().copied()))
            .map(|(c, (g, p))| (c, g, p)),
    );
    let values: Vec<Value> = companies
        .filter_map(|(company, growth, pe)| {
            let (growth, pe) = (growth?, pe?);
            Some(json!({ "company": company, "growth": growth * 100.0, "pe": pe }))
        })
        .collect();
    if values.len() < 2 {
        return None;
    }

    Some(chart(
        "growth_vs_valuation",
        format!("{} Growth vs Valuation", matrix.target),
        json!({
            "data": { "values": values },
            "width": 600,
            "height": 400,
            "layer": [
                {
                    "mark": { "type": "point", "filled": true },
                    "encoding": {
                        "x": { "field": "growth", "type": "quantitative", "title": "Revenue Growth (%)" },
                        "y": { "field": "pe", "type": "quantitative", "title": "P/E Ratio" },
                        "size": { "condition": { "test": format!("datum.company === '{}'", matrix.target), "value": 400 }, "value": 150 },
                        "color": company_color(&matrix.target)
                    }
                },
                {
                    "mark": { "type": "text", "dy": -14 },
                    "encoding": {
                        "x": { "field": "growth", "type": "quantitative" },
                        "y": { "field": "pe", "type": "quantitative" },
                        "text": { "field": "company" }
                    }
                }
            ]
        }),
    ))
}

/// Overall sentiment score on a banded 0-10 scale
pub fn sentiment_gauge(ticker: &str, score: f64, label: &str) -> ChartSpec {
    let bands: Vec<Value> = GAUGE_BANDS
        .iter()
        .map(|(start, end, color)| json!({ "start": start, "end": end, "color": color }))
        .collect();

    chart(
        "sentiment_gauge",
        format!("{ticker} Sentiment Score"),
        json!({
            "width": 600,
            "height": 80,
            "layer": [
                {
                    "data": { "values": bands },
                    "mark": { "type": "bar", "height": 40 },
                    "encoding": {
                        "x": { "field": "start", "type": "quantitative", "scale": { "domain": [0, 10] }, "title": label },
                        "x2": { "field": "end" },
                        "color": { "field": "color", "type": "nominal", "scale": null }
                    }
                },
                {
                    "data": { "values": [{ "score": score }] },
                    "mark": { "type": "tick", "thickness": 4, "size": 60, "color": "black" },
                    "encoding": { "x": { "field": "score", "type": "quantitative" } }
                },
                {
                    "data": { "values": [{ "score": score, "text": format!("{score:.1}") }] },
                    "mark": { "type": "text", "dy": -36, "fontSize": 18 },
                    "encoding": {
                        "x": { "field": "score", "type": "quantitative" },
                        "text": { "field": "text" }
                    }
                }
            ]
        }),
    )
}

/// Score per category with the total in the subtitle
pub fn score_breakdown_chart(scores: &ScoreReport) -> ChartSpec {
    let values: Vec<Value> = scores
        .categories
        .iter()
        .map(|c| {
            json!({
                "category": c.category.display_name(),
                "score": c.score,
                "weight": c.weight * 100.0,
                "weighted": c.weighted
            })
        })
        .collect();

    let mut spec = chart(
        "score_breakdown",
        format!("{} Investment Score Breakdown", scores.ticker),
        json!({
            "data": { "values": values },
            "width": 600,
            "height": 300,
            "layer": [
                {
                    "mark": { "type": "bar", "color": PRIMARY },
                    "encoding": {
                        "y": { "field": "category", "type": "nominal", "title": "Category", "sort": null },
                        "x": { "field": "score", "type": "quantitative", "title": "Score (out of 10)", "scale": { "domain": [0, 10] } },
                        "tooltip": [
                            { "field": "score" },
                            { "field": "weight", "title": "Weight (%)" },
                            { "field": "weighted" }
                        ]
                    }
                },
                {
                    "mark": { "type": "text", "align": "right", "dx": -4, "color": "white" },
                    "encoding": {
                        "y": { "field": "category", "type": "nominal", "sort": null },
                        "x": { "field": "score", "type": "quantitative" },
                        "text": { "field": "score", "format": ".1f" }
                    }
                }
            ]
        }),
    );
    spec.spec["title"]["subtitle"] = json!(format!("Total Score: {:.1}/10", scores.total_score));
    spec
}

fn html_page(title: &str, spec: &Value) -> Result<String> {
    let spec = serde_json::to_string(spec)?;
    Ok(format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
</head>
<body>
  <div id="chart"></div>
  <script>vegaEmbed("#chart", {spec});</script>
</body>
</html>
"##
    ))
}

/// Writes charts as `{dir}/{TICKER}_{name}.{ext}`
#[derive(Debug, Clone)]
pub struct ChartWriter {
    dir: PathBuf,
    ticker: String,
    format: ChartFormat,
}

impl ChartWriter {
    pub fn new(dir: impl Into<PathBuf>, ticker: impl Into<String>, format: ChartFormat) -> Self {
        Self {
            dir: dir.into(),
            ticker: ticker.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", self.ticker, name, self.format.extension()))
    }

    pub fn write(&self, chart: &ChartSpec) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let content = match self.format {
            ChartFormat::Json => serde_json::to_string_pretty(&chart.spec)?,
            ChartFormat::Html => html_page(&chart.title, &chart.spec)?,
        };
        let path = self.path_for(chart.name);
        std::fs::write(&path, content).map_err(|e| {
            ResearchError::ReportGeneration(format!(
                "failed to write chart {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!("Saved chart {}", path.display());
        Ok(path)
    }

    /// Write every chart, logging failures instead of returning them
    pub fn write_all(&self, charts: &[ChartSpec]) -> Vec<PathBuf> {
        charts
            .iter()
            .filter_map(|chart| match self.write(chart) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Could not save {} chart: {}", chart.name, e);
                    None
                }
            })
            .collect()
    }
}
