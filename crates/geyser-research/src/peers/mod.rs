//! Peer identification, collection and comparison

mod matrix;
pub mod universe;
mod valuation;

pub use matrix::{ComparisonMatrix, MatrixRow, MetricKind};
pub use universe::{identify_peers, sector_etf};
pub use valuation::{
    MetricComparison, RelativeValuation, ValuationBand, ValuationJustification, VALUATION_METRICS,
};

use crate::collector::{CompanyData, DataCollector};
use crate::config::PeerConfig;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Complete peer analysis for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSummary {
    pub ticker: String,
    /// Identified peers, including any that failed to collect
    pub peers: Vec<String>,
    pub matrix: ComparisonMatrix,
    pub relative_valuation: RelativeValuation,
    pub justification: ValuationJustification,
}

impl PeerSummary {
    /// Compare a target against already collected peers
    pub fn build(target: &CompanyData, peers: Vec<String>, peer_data: &[CompanyData]) -> Self {
        let matrix = ComparisonMatrix::build(target, peer_data);
        let relative_valuation = RelativeValuation::calculate(&matrix);
        let justification = ValuationJustification::assess(&matrix, &relative_valuation);
        Self {
            ticker: target.ticker.clone(),
            peers,
            matrix,
            relative_valuation,
            justification,
        }
    }

    pub fn avg_premium(&self) -> f64 {
        self.relative_valuation.avg_premium
    }
}

/// Finds and collects peers for a target
pub struct PeerComparator {
    collector: DataCollector,
    config: PeerConfig,
}

impl PeerComparator {
    pub fn new(collector: DataCollector, config: PeerConfig) -> Self {
        Self { collector, config }
    }

    pub fn identify(&self, target: &CompanyData) -> Vec<String> {
        identify_peers(
            &target.ticker,
            target.overview.sector.as_deref(),
            &self.config.custom,
        )
    }

    /// Collect peers, isolating failures; output keeps peer order
    pub async fn collect(&self, peers: &[String]) -> Vec<CompanyData> {
        tracing::info!("Collecting peer data: {}", peers.join(", "));

        let workers = if self.config.parallel_fetch {
            self.config.max_workers.max(1)
        } else {
            1
        };

        let mut results: Vec<(usize, CompanyData)> = stream::iter(peers.iter().enumerate())
            .map(|(index, peer)| async move {
                match self.collector.collect_peer(peer).await {
                    Ok(data) => Some((index, data)),
                    Err(e) => {
                        tracing::warn!("Could not collect data for peer {}: {}", peer, e);
                        None
                    }
                }
            })
            .buffer_unordered(workers)
            .filter_map(|result| async move { result })
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        tracing::info!("Collected data for {} of {} peers", results.len(), peers.len());
        results.into_iter().map(|(_, data)| data).collect()
    }

    /// Identify, collect and compare
    pub async fn analyze(&self, target: &CompanyData) -> PeerSummary {
        let peers = self.identify(target);
        let peer_data = self.collect(&peers).await;
        PeerSummary::build(target, peers, &peer_data)
    }
}
