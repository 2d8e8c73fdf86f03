//! Markdown research report
//!
//! Sections are Jinja templates held in a [`TemplateRegistry`]. The
//! built-ins come from [`templates::SECTIONS`]; a template directory can
//! override any section by name.

mod context;
pub mod templates;

pub use context::ReportInputs;

use crate::error::{ResearchError, Result};
use geyser_template::TemplateRegistry;
use std::path::Path;

/// Renders and writes the research report
pub struct ReportComposer {
    registry: TemplateRegistry,
}

impl ReportComposer {
    /// Built-in sections only
    pub fn new() -> Result<Self> {
        let registry = TemplateRegistry::new();
        registry.register_sources(templates::SECTIONS.iter().copied())?;
        Ok(Self { registry })
    }

    /// Built-in sections, overridden by same-named files in `dir`
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self> {
        let composer = Self::new()?;
        let overridden = composer.registry.load_overrides(dir.as_ref())?;
        if !overridden.is_empty() {
            tracing::info!(
                "Using custom templates from {}: {}",
                dir.as_ref().display(),
                overridden.join(", ")
            );
        }
        Ok(composer)
    }

    /// Render every section in report order
    pub fn render(&self, inputs: &ReportInputs<'_>) -> Result<String> {
        let mut report = String::new();
        for (name, _) in templates::SECTIONS {
            let vars = match *name {
                "executive_summary" => context::executive_summary(inputs),
                "company_overview" => context::company_overview(inputs),
                "financial_analysis" => context::financial_analysis(inputs)?,
                "peer_comparison" => context::peer_comparison(inputs),
                "sentiment" => context::sentiment(inputs)?,
                "investment_thesis" => context::investment_thesis(inputs),
                "recommendation" => context::recommendation(inputs),
                "disclaimer" => context::disclaimer(inputs),
                other => {
                    return Err(ResearchError::ReportGeneration(format!(
                        "no context for section '{other}'"
                    )));
                }
            };
            report.push_str(&self.registry.render(name, &vars)?);
        }
        Ok(report)
    }

    /// Write the report, creating the parent directory
    pub fn write(path: &Path, report: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, report).map_err(|e| {
            ResearchError::ReportGeneration(format!("failed to write {}: {e}", path.display()))
        })?;
        tracing::info!("Report saved to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FinancialAnalysis, analyze};
    use crate::collector::CompanyData;
    use crate::scoring::{RecommendationThresholds, ScoringEngine, ScoringInputs};
    use crate::sentiment::SentimentSummary;
    use crate::thesis::{InvestmentThesis, ThesisComposer};
    use chrono::NaiveDate;

    struct Fixture {
        data: CompanyData,
        analysis: FinancialAnalysis,
        sentiment: SentimentSummary,
        scores: crate::scoring::ScoreReport,
        thesis: InvestmentThesis,
        thresholds: RecommendationThresholds,
    }

    fn fixture() -> Fixture {
        let mut data = CompanyData::empty("TEST");
        data.overview.name = Some("Test Corp".to_string());
        data.overview.sector = Some("Technology".to_string());
        data.overview.current_price = Some(123.45);
        data.overview.market_cap = Some(2.5e12);
        data.overview.employees = Some(12_345);
        data.statistics.pe_trailing = Some(30.0);
        let analysis = analyze(&data);
        let sentiment = SentimentSummary::analyze(&data);
        let inputs = ScoringInputs::from_stages(&analysis, None, Some(&sentiment));
        let scores = ScoringEngine::default().score("TEST", &inputs);
        let thesis = ThesisComposer {
            analysis: &analysis,
            scores: &scores,
            peers: None,
            sentiment: Some(&sentiment),
            industry: None,
        }
        .compose();
        Fixture {
            data,
            analysis,
            sentiment,
            scores,
            thesis,
            thresholds: RecommendationThresholds::default(),
        }
    }

    fn inputs(f: &Fixture) -> ReportInputs<'_> {
        ReportInputs {
            data: &f.data,
            analysis: &f.analysis,
            peers: None,
            sentiment: &f.sentiment,
            scores: &f.scores,
            thesis: &f.thesis,
            thresholds: &f.thresholds,
            generated_on: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            data_sources: "Yahoo Finance".to_string(),
        }
    }

    #[test]
    fn test_render_all_sections() {
        let f = fixture();
        let report = ReportComposer::new().unwrap().render(&inputs(&f)).unwrap();

        assert!(report.contains("# TEST Equity Research Report"));
        assert!(report.contains("**Company:** Test Corp"));
        assert!(report.contains("| Current Price | $123 |"));
        assert!(report.contains("| Market Cap | $2.50T |"));
        assert!(report.contains("| P/E (TTM) | 30.00x | Premium |"));
        assert!(report.contains("| Employees | 12,345 |"));
        assert!(report.contains("*Report generated on March 05, 2024*"));
        assert!(report.contains("Peer comparison data not available."));
        assert!(report.contains("| Valuation | 25% |"));
        assert!(report.contains("## Disclaimer"));
        assert!(report.contains("Business description not available."));

        let order = [
            "## Executive Summary",
            "## Company Overview",
            "## Financial Analysis",
            "## Peer Comparison",
            "## Sentiment & Catalyst Analysis",
            "## Investment Thesis",
            "## Valuation & Recommendation",
            "## Disclaimer",
        ];
        let positions: Vec<usize> = order.iter().map(|h| report.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_template_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("disclaimer.md.j2"),
            "\n## Disclaimer\nCustom notice for {{ data_sources }}\n",
        )
        .unwrap();

        let f = fixture();
        let report = ReportComposer::with_overrides(dir.path())
            .unwrap()
            .render(&inputs(&f))
            .unwrap();
        assert!(report.contains("Custom notice for Yahoo Finance"));
    }

    #[test]
    fn test_write_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("TEST_research_report.md");
        ReportComposer::write(&path, "# Report\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report\n");
    }
}
