use serde::{Deserialize, Serialize};

/// Descriptive and market data for a company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub ticker: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub employees: Option<u64>,
    pub description: Option<String>,
    pub exchange: Option<String>,

    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub shares_outstanding: Option<f64>,

    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_day_avg: Option<f64>,
    pub two_hundred_day_avg: Option<f64>,
    pub avg_volume: Option<f64>,

    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,

    /// Percent distance of the price from the 52-week high (negative below it)
    pub pct_from_52w_high: Option<f64>,
    /// Percent distance of the price above the 52-week low
    pub pct_from_52w_low: Option<f64>,
}

impl CompanyOverview {
    /// Company name, falling back to the ticker
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ticker)
    }

    /// Recompute the 52-week distance fields from price, high and low
    pub fn refresh_52_week_position(&mut self) {
        self.pct_from_52w_high = pct_from(self.current_price, self.fifty_two_week_high);
        self.pct_from_52w_low = pct_from(self.current_price, self.fifty_two_week_low);
    }
}

fn pct_from(price: Option<f64>, reference: Option<f64>) -> Option<f64> {
    match (price, reference) {
        (Some(p), Some(r)) if p != 0.0 && r != 0.0 => Some((p - r) / r * 100.0),
        _ => None,
    }
}

/// Trailing ratios and per-share figures reported by the provider
///
/// Margins, returns and growth rates are fractions (0.25 = 25%).
/// `debt_to_equity` is in percent units (150.0 = 1.5x).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    pub pe_trailing: Option<f64>,
    pub pe_forward: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub ev_to_revenue: Option<f64>,

    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,

    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub earnings_quarterly_growth: Option<f64>,

    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,

    pub eps_trailing: Option<f64>,
    pub eps_forward: Option<f64>,
    pub book_value: Option<f64>,
    pub revenue_per_share: Option<f64>,

    pub operating_cash_flow: Option<f64>,
    pub free_cash_flow: Option<f64>,

    pub beta: Option<f64>,

    /// Fraction of shares held by institutions
    pub institutional_ownership: Option<f64>,
    /// Fraction of shares held by insiders
    pub insider_ownership: Option<f64>,
}

/// Overview plus statistics, as returned by one provider call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub overview: CompanyOverview,
    pub statistics: KeyStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_52_week_position() {
        let mut overview = CompanyOverview {
            current_price: Some(90.0),
            fifty_two_week_high: Some(100.0),
            fifty_two_week_low: Some(60.0),
            ..Default::default()
        };
        overview.refresh_52_week_position();
        assert!((overview.pct_from_52w_high.unwrap() + 10.0).abs() < 1e-9);
        assert!((overview.pct_from_52w_low.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_52_week_position_missing_price() {
        let mut overview = CompanyOverview {
            fifty_two_week_high: Some(100.0),
            ..Default::default()
        };
        overview.refresh_52_week_position();
        assert_eq!(overview.pct_from_52w_high, None);
    }

    #[test]
    fn test_display_name_fallback() {
        let overview = CompanyOverview {
            ticker: "AMD".into(),
            ..Default::default()
        };
        assert_eq!(overview.display_name(), "AMD");
    }
}
