//! Detection driver.
//!
//! Sorts copies of both feeds, walks trades in timestamp order while a single
//! [`CandidateWindow`] follows them, and applies the [`SuspicionRule`] to each
//! candidate.

use serde::Serialize;
use surveillance_core::{Config, DetectorConfig, Order, Result, SuspiciousEvent, Trade};
use surveillance_ingestion::{
    sort_orders, sort_trades, validate_order, validate_trade, FeedNormalizer,
};
use tracing::{debug, trace};

use crate::rule::SuspicionRule;
use crate::window::CandidateWindow;

/// A heuristic that flags orders suspicious against trades.
pub trait ManipulationDetector: Send + Sync {
    /// Detect suspicious events. Inputs are not reordered.
    fn detect(&self, orders: &[Order], trades: &[Trade]) -> Result<Vec<SuspiciousEvent>>;
}

/// Counters from a single detection run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionStats {
    /// Trades processed.
    pub trades_scanned: usize,
    /// Orders that entered the candidate window.
    pub orders_admitted: usize,
    /// Order/trade pairs the rule was applied to.
    pub pairs_evaluated: usize,
    /// Events emitted.
    pub events_emitted: usize,
    /// Largest candidate window seen.
    pub peak_window: usize,
}

/// Trailing-window detector: opposite-side orders placed shortly before a
/// trade at a price close to it.
#[derive(Debug, Clone)]
pub struct WindowedDetector {
    window_ms: i64,
    rule: SuspicionRule,
}

impl Default for WindowedDetector {
    fn default() -> Self {
        let config = DetectorConfig::default();
        Self {
            window_ms: config.window_ms,
            rule: SuspicionRule::new(config.price_range_pct),
        }
    }
}

impl WindowedDetector {
    /// Create a detector from validated configuration.
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window_ms: config.window_ms,
            rule: SuspicionRule::new(config.price_range_pct),
        })
    }

    /// Create a detector from the top-level configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.detector)
    }

    /// Window length (ms).
    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// The pairwise rule in use.
    pub fn rule(&self) -> &SuspicionRule {
        &self.rule
    }

    /// Detect suspicious events and report run counters.
    pub fn detect_with_stats(
        &self,
        orders: &[Order],
        trades: &[Trade],
    ) -> Result<(Vec<SuspiciousEvent>, DetectionStats)> {
        // Reject the whole call before any work if a record is malformed
        for order in orders {
            validate_order(order)?;
        }
        for trade in trades {
            validate_trade(trade)?;
        }

        let orders = sort_orders(orders);
        let trades = sort_trades(trades);
        debug!(
            orders = ?FeedNormalizer::order_stats(&orders),
            trades = ?FeedNormalizer::trade_stats(&trades),
            window_ms = self.window_ms,
            price_range_pct = self.rule.price_range_pct,
            "starting detection"
        );

        let mut stats = DetectionStats::default();
        let mut events = Vec::new();
        let mut window = CandidateWindow::new(&orders, self.window_ms);

        for trade in &trades {
            window.refresh(trade.ts_ms);
            stats.trades_scanned += 1;
            stats.pairs_evaluated += window.len();

            let suspicious: Vec<Order> = window
                .iter()
                .filter(|order| self.rule.is_suspicious(order, trade))
                .cloned()
                .collect();

            if suspicious.is_empty() {
                continue;
            }

            let event = SuspiciousEvent::new(suspicious, trade.clone())?;
            trace!(trade_id = trade.id, orders = event.len(), "{}", event);
            events.push(event);
        }

        stats.orders_admitted = window.admitted();
        stats.peak_window = window.peak_len();
        stats.events_emitted = events.len();
        debug!(?stats, "detection finished");

        Ok((events, stats))
    }
}

impl ManipulationDetector for WindowedDetector {
    fn detect(&self, orders: &[Order], trades: &[Trade]) -> Result<Vec<SuspiciousEvent>> {
        self.detect_with_stats(orders, trades).map(|(events, _)| events)
    }
}
