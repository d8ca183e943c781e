//! Pairwise order/trade suspicion rule.

use serde::{Deserialize, Serialize};
use surveillance_core::{Order, Side, Trade};

/// Inclusive price interval with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    /// Band between two bounds given in either order.
    pub fn between(a: f64, b: f64) -> Self {
        if b < a {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

/// Flags an order as suspicious against a trade when it sits on the opposite
/// side at a price close to the trade price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspicionRule {
    /// Tolerance as a fraction of the trade price.
    pub price_range_pct: f64,
}

impl Default for SuspicionRule {
    fn default() -> Self {
        Self {
            price_range_pct: 0.10,
        }
    }
}

impl SuspicionRule {
    pub fn new(price_range_pct: f64) -> Self {
        Self { price_range_pct }
    }

    /// Admissible order prices for a trade.
    ///
    /// A BUY at a non-negative price, or a SELL at a negative price, takes the
    /// band from `p` to `p * (1 + r)`. Every other trade takes `p * (1 - r)` to `p`.
    /// The branch keys on the sign of the price as well as the side.
    pub fn price_band(&self, trade: &Trade) -> PriceBand {
        let p = trade.price;
        let r = self.price_range_pct;

        let extends_from_trade = match trade.side {
            Side::Buy => p >= 0.0,
            Side::Sell => p < 0.0,
        };

        if extends_from_trade {
            PriceBand::between(p, p * (1.0 + r))
        } else {
            PriceBand::between(p * (1.0 - r), p)
        }
    }

    /// Opposite sides and the order price inside the trade's band.
    pub fn is_suspicious(&self, order: &Order, trade: &Trade) -> bool {
        order.side != trade.side && self.price_band(trade).contains(order.price)
    }
}
