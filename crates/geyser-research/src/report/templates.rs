//! Built-in report section templates
//!
//! Any of these can be replaced by a same-named `.md.j2` file in the
//! configured template directory.

pub const EXECUTIVE_SUMMARY: &str = r"
# {{ ticker }} Equity Research Report
## Executive Summary

**Company:** {{ company_name }}
**Sector:** {{ sector | na }} | **Industry:** {{ industry | na }}

**Investment Recommendation: {{ recommendation }}** (Score: {{ total_score }}/10)

| Metric | Value |
|---|---|
| Current Price | {{ current_price | currency }} |
| Market Cap | {{ market_cap | currency }} |
| P/E (TTM) | {{ pe_trailing | ratio }} |
| Revenue Growth | {{ revenue_growth | percent }} |
| Net Margin | {{ net_margin | percent }} |
| Investment Score | {{ total_score }}/10 |
| Recommendation | {{ recommendation }} |

*Report generated on {{ generated_on }}*

---
";

pub const COMPANY_OVERVIEW: &str = r"
## Company Overview

### Business Description

{{ description }}

### Key Facts

| Attribute | Value |
|-----------|-------|
| Headquarters | {{ country | na }} |
| Employees | {{ employees }} |
| Website | {{ website | na }} |
| Market Cap | {{ market_cap | currency }} |
| Enterprise Value | {{ enterprise_value | currency }} |

### Price Performance

| Metric | Value |
|--------|-------|
| 52-Week High | {{ fifty_two_week_high | currency }} |
| 52-Week Low | {{ fifty_two_week_low | currency }} |
| % From 52W High | {{ pct_from_52w_high | percent }} |
| 50-Day MA | {{ fifty_day_avg | currency }} |
| 200-Day MA | {{ two_hundred_day_avg | currency }} |
| 1Y Return | {{ return_1y | percent }} |
| YTD Return | {{ return_ytd | percent }} |
| Max Drawdown | {{ max_drawdown | percent }} |
| Sharpe Ratio (1Y) | {{ sharpe_ratio_1y | fixed(2) }} |

---
";

pub const FINANCIAL_ANALYSIS: &str = r"
## Financial Analysis

### Valuation Metrics

| Metric | Value | Assessment |
|--------|-------|------------|
| P/E (TTM) | {{ valuation.pe_trailing | ratio }} | {{ assessments.pe }} |
| P/E (Forward) | {{ valuation.pe_forward | ratio }} | - |
| PEG Ratio | {{ valuation.peg_ratio | ratio }} | {{ assessments.peg }} |
| P/B | {{ valuation.price_to_book | ratio }} | - |
| P/S | {{ valuation.price_to_sales | ratio }} | - |
| EV/EBITDA | {{ valuation.ev_to_ebitda | ratio }} | - |
| P/FCF | {{ valuation.price_to_fcf | ratio }} | - |

### Profitability Metrics

| Metric | Value |
|--------|-------|
| Gross Margin | {{ profitability.gross_margin | percent }} |
| Operating Margin | {{ profitability.operating_margin | percent }} |
| Net Margin | {{ profitability.net_margin | percent }} |
| ROE | {{ profitability.roe | percent }} |
| ROA | {{ profitability.roa | percent }} |
| ROIC | {{ profitability.roic | percent }} |

### Growth Metrics

| Metric | Value |
|--------|-------|
| Revenue Growth (YoY) | {{ growth.revenue_growth_1y | percent }} |
| Revenue CAGR (3Y) | {{ growth.revenue_cagr_3y | percent }} |
| EPS Growth (YoY) | {{ growth.eps_growth_1y | percent }} |
| FCF Growth (YoY) | {{ growth.fcf_growth_1y | percent }} |

### Financial Health

| Metric | Value | Assessment |
|--------|-------|------------|
| Current Ratio | {{ health.current_ratio | ratio }} | {{ assessments.current_ratio }} |
| Debt/Equity | {{ debt_to_equity_ratio | ratio }} | {{ assessments.debt_to_equity }} |
| Interest Coverage | {{ health.interest_coverage | ratio }} | {{ assessments.interest_coverage }} |
| Altman Z-Score | {{ health.altman_z_score | number }} | {{ assessments.altman_z }} |

### Efficiency

| Metric | Value |
|--------|-------|
| Asset Turnover | {{ efficiency.asset_turnover | ratio }} |
| Days Sales Outstanding | {{ efficiency.days_sales_outstanding | fixed(0) }} |
| Days Inventory | {{ efficiency.days_inventory | fixed(0) }} |
| Cash Conversion Cycle | {{ efficiency.cash_conversion_cycle | fixed(0) }} |

---
";

pub const PEER_COMPARISON: &str = r"
## Peer Comparison

### Peers Analyzed
{{ peers | join(', ') if peers else 'N/A' }}

### Comparative Metrics

{{ matrix_table }}

### Relative Valuation Assessment

**Status:** {{ assessment | na }}
**Detail:** {{ assessment_detail | na }}

### Valuation Justification Analysis

**Conclusion:** {{ conclusion | na }}

**Factors Supporting Valuation:**
{% for factor in factors_supporting %}
- {{ factor }}
{% endfor %}

**Factors Against Valuation:**
{% for factor in factors_against %}
- {{ factor }}
{% endfor %}

---
";

pub const SENTIMENT: &str = r"
## Sentiment & Catalyst Analysis

### Analyst Recommendations

| Metric | Value |
|--------|-------|
| Consensus | {{ analyst.consensus | na }} |
| Total Analysts | {{ analyst.total_analysts }} |
| Mean Rating | {{ analyst.mean_rating | number }} (1=Strong Buy, 5=Strong Sell) |

### Price Targets

| Metric | Value |
|--------|-------|
| Current Price | {{ targets.current_price | currency }} |
| Mean Target | {{ targets.target_mean | currency }} |
| Low Target | {{ targets.target_low | currency }} |
| High Target | {{ targets.target_high | currency }} |
| Implied Upside | {{ upside | percent }} |

### Earnings Performance

| Metric | Value |
|--------|-------|
| Quarters Analyzed | {{ earnings.quarters_analyzed }} |
| Beat Rate | {{ earnings.beat_rate | percent }} |
| Avg Surprise | {{ avg_surprise | percent }} |
| Trend | {{ earnings.trend | na }} |

### Insider Activity

| Metric | Value |
|--------|-------|
| Transactions | {{ insider.total_transactions }} |
| Buys / Sells | {{ insider.buy_transactions }} / {{ insider.sell_transactions }} |
| Net Sentiment | {{ insider.net_sentiment | na }} |
| Institutional Ownership | {{ ownership.institutional_ownership_pct | percent }} |
| Insider Ownership | {{ ownership.insider_ownership_pct | percent }} |

### Technical Momentum

**Overall Assessment:** {{ momentum.momentum_label }}
**Momentum Score:** {{ momentum.momentum_score }}/10

**Signals:**
{% for signal in momentum.signals %}
- {{ signal }}
{% endfor %}

### Overall Sentiment Score: {{ overall_score }}/10 ({{ overall_label }})

---
";

pub const INVESTMENT_THESIS: &str = r"
## Investment Thesis

### Bull Case

{% for point in bull_case %}
{{ loop.index }}. {{ point }}
{% endfor %}

### Bear Case

{% for point in bear_case %}
{{ loop.index }}. {{ point }}
{% endfor %}

### Key Metrics to Monitor

{% for metric in monitors %}
- {{ metric }}
{% endfor %}

---
";

pub const RECOMMENDATION: &str = r"
## Valuation & Recommendation

### Quantitative Scoring Matrix

| Category | Weight | Score | Weighted |
|---|---|---|---|
{% for row in categories %}
| {{ row.name }} | {{ row.weight }} | {{ row.score }} | {{ row.weighted }} |
{% endfor %}
| **TOTAL** | 100% | | **{{ total_score }}** |

### Final Recommendation: **{{ recommendation }}**

#### Score Interpretation:
- **Strong Buy** (>={{ thresholds.strong_buy }}): Compelling risk/reward, high conviction
- **Buy** ({{ thresholds.buy }}-{{ thresholds.strong_buy }}): Favorable outlook, attractive entry point
- **Hold** ({{ thresholds.hold }}-{{ thresholds.buy }}): Fairly valued, maintain position
- **Sell** ({{ thresholds.sell }}-{{ thresholds.hold }}): Unfavorable risk/reward
- **Strong Sell** (<{{ thresholds.sell }}): Significant downside risk

### Investment Commentary

{{ commentary }}

**Ideal Investor Profile:** {{ investor_profile }}

**Position Sizing Consideration:** {{ position_sizing }}

---
";

pub const DISCLAIMER: &str = r"
## Disclaimer

*This report is for informational purposes only and does not constitute financial advice,
investment recommendations, or an offer to buy or sell any securities. The analysis is based
on publicly available market data and may contain errors or inaccuracies.
Past performance is not indicative of future results. Always conduct your own research and
consult with a qualified financial advisor before making investment decisions.*

*Data sources: {{ data_sources }}*
*Report generated using automated analysis tools*
";

/// Section names in report order with their built-in sources
pub const SECTIONS: &[(&str, &str)] = &[
    ("executive_summary", EXECUTIVE_SUMMARY),
    ("company_overview", COMPANY_OVERVIEW),
    ("financial_analysis", FINANCIAL_ANALYSIS),
    ("peer_comparison", PEER_COMPARISON),
    ("sentiment", SENTIMENT),
    ("investment_thesis", INVESTMENT_THESIS),
    ("recommendation", RECOMMENDATION),
    ("disclaimer", DISCLAIMER),
];
