use crate::model::{InsiderTransaction, TransactionKind};
use serde::{Deserialize, Serialize};

const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsiderSentiment {
    pub has_data: bool,
    pub total_transactions: usize,
    pub buy_transactions: usize,
    pub sell_transactions: usize,
    /// Bought minus sold
    pub net_shares: f64,
    pub net_sentiment: Option<String>,
    pub recent_transactions: Vec<InsiderTransaction>,
}

impl InsiderSentiment {
    /// Sub-score on the 1-10 scale for the overall sentiment blend
    pub fn score(&self) -> Option<f64> {
        let score = match self.net_sentiment.as_deref()? {
            "Strongly Bullish" => 9.0,
            "Bullish" => 7.0,
            "Bearish" => 3.0,
            "Strongly Bearish" => 1.0,
            _ => 5.0,
        };
        Some(score)
    }
}

fn label(buys: usize, sells: usize) -> &'static str {
    if buys > sells * 2 {
        "Strongly Bullish"
    } else if buys > sells {
        "Bullish"
    } else if sells > buys * 2 {
        "Strongly Bearish"
    } else if sells > buys {
        "Bearish"
    } else {
        "Neutral"
    }
}

pub(super) fn analyze(transactions: &[InsiderTransaction]) -> InsiderSentiment {
    if transactions.is_empty() {
        return InsiderSentiment::default();
    }

    let mut result = InsiderSentiment {
        has_data: true,
        total_transactions: transactions.len(),
        ..Default::default()
    };
    for tx in transactions {
        let shares = tx.shares.unwrap_or(0.0);
        match tx.kind() {
            TransactionKind::Buy => {
                result.buy_transactions += 1;
                result.net_shares += shares;
            }
            TransactionKind::Sell => {
                result.sell_transactions += 1;
                result.net_shares -= shares;
            }
            TransactionKind::Other => {}
        }
    }
    result.recent_transactions = transactions.iter().take(RECENT_LIMIT).cloned().collect();
    result.net_sentiment =
        Some(label(result.buy_transactions, result.sell_transactions).to_string());
    result
}
