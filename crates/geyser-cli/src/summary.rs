//! Terminal banner and run summary

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use geyser_research::{Recommendation, ResearchOutcome};

const RULE_WIDTH: usize = 60;

pub fn print_banner() {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}");
    println!("  GEYSER - Equity Research Report Generator");
    println!("  Version {}", env!("CARGO_PKG_VERSION"));
    println!("{rule}");
    println!();
}

fn recommendation_color(recommendation: Recommendation) -> Color {
    if recommendation.is_buy() {
        Color::Green
    } else if recommendation == Recommendation::Hold {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

/// Summary table for a finished run
pub fn summary_table(outcome: &ResearchOutcome) -> Table {
    let overview = &outcome.data.overview;
    let scores = &outcome.scores;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Metric").fg(Color::Cyan),
            Cell::new(outcome.ticker.as_str()).fg(Color::Cyan),
        ]);

    table.add_row(vec![
        Cell::new("Company"),
        Cell::new(overview.display_name()),
    ]);
    table.add_row(vec![
        Cell::new("Sector"),
        Cell::new(or_na(overview.sector.as_deref())),
    ]);
    table.add_row(vec![
        Cell::new("Industry"),
        Cell::new(or_na(overview.industry.as_deref())),
    ]);
    table.add_row(vec![
        Cell::new("Current Price"),
        Cell::new(format!("${:.2}", overview.current_price.unwrap_or(0.0))),
    ]);
    table.add_row(vec![
        Cell::new("Market Cap"),
        Cell::new(format!("${:.2}B", overview.market_cap.unwrap_or(0.0) / 1e9)),
    ]);
    table.add_row(vec![
        Cell::new("Investment Score").fg(Color::Yellow),
        Cell::new(format!("{:.1}/10", scores.total_score)).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Recommendation"),
        Cell::new(scores.recommendation.as_str())
            .fg(recommendation_color(scores.recommendation)),
    ]);
    table.add_row(vec![
        Cell::new("Report"),
        Cell::new(outcome.report_path.display().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Charts"),
        Cell::new(format!("{} files", outcome.charts.len())),
    ]);

    table
}

pub fn print_summary(outcome: &ResearchOutcome) {
    let rule = "=".repeat(RULE_WIDTH);
    println!();
    println!("{rule}");
    println!("  ANALYSIS COMPLETE: {}", outcome.ticker);
    println!("{rule}");
    println!("{}", summary_table(outcome));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_colors() {
        assert_eq!(recommendation_color(Recommendation::StrongBuy), Color::Green);
        assert_eq!(recommendation_color(Recommendation::Buy), Color::Green);
        assert_eq!(recommendation_color(Recommendation::Hold), Color::Yellow);
        assert_eq!(recommendation_color(Recommendation::Sell), Color::Red);
        assert_eq!(recommendation_color(Recommendation::StrongSell), Color::Red);
    }
}
