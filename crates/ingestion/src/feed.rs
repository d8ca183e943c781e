//! Order and trade feed normalization.
//!
//! Raw records may arrive with missing sides or timestamps. Every record of a
//! feed is validated before any of it is used, so a malformed feed yields an
//! error and never a partial result. Valid feeds come back as stable-sorted
//! copies; callers' collections are left untouched.

use serde::{Deserialize, Serialize};
use surveillance_core::{Error, Order, Result, Side, TimestampMs, Trade};
use tracing::warn;

use crate::stats::FeedStats;

/// An order as received from an external source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
    pub side: Option<Side>,
    pub ts_ms: Option<TimestampMs>,
}

/// A trade as received from an external source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
    pub side: Option<Side>,
    pub ts_ms: Option<TimestampMs>,
}

impl OrderRecord {
    /// Convert into a typed order, enforcing mandatory fields.
    pub fn into_order(self) -> Result<Order> {
        let mut builder = Order::builder().id(self.id).price(self.price).volume(self.volume);
        if let Some(side) = self.side {
            builder = builder.side(side);
        }
        if let Some(ts_ms) = self.ts_ms {
            builder = builder.timestamp(ts_ms);
        }
        let order = builder.build()?;
        validate_order(&order)?;
        Ok(order)
    }
}

impl TradeRecord {
    /// Convert into a typed trade, enforcing mandatory fields.
    pub fn into_trade(self) -> Result<Trade> {
        let mut builder = Trade::builder().id(self.id).price(self.price).volume(self.volume);
        if let Some(side) = self.side {
            builder = builder.side(side);
        }
        if let Some(ts_ms) = self.ts_ms {
            builder = builder.timestamp(ts_ms);
        }
        let trade = builder.build()?;
        validate_trade(&trade)?;
        Ok(trade)
    }
}

fn check_finite(kind: &str, id: u64, field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "{} {}: {} must be finite, got {}",
            kind, id, field, value
        )))
    }
}

/// Check that an order's price and volume are finite numbers.
pub fn validate_order(order: &Order) -> Result<()> {
    check_finite("order", order.id, "price", order.price)?;
    check_finite("order", order.id, "volume", order.volume)
}

/// Check that a trade's price and volume are finite numbers.
pub fn validate_trade(trade: &Trade) -> Result<()> {
    check_finite("trade", trade.id, "price", trade.price)?;
    check_finite("trade", trade.id, "volume", trade.volume)
}

fn at_record(kind: &str, index: usize, err: Error) -> Error {
    warn!(index, error = %err, "rejecting {} feed", kind);
    match err {
        Error::Validation(msg) => Error::validation(format!("{} record #{}: {}", kind, index, msg)),
        other => other,
    }
}

/// Copy orders and stable-sort them by ascending timestamp.
pub fn sort_orders(orders: &[Order]) -> Vec<Order> {
    let mut sorted = orders.to_vec();
    sorted.sort_by_key(|o| o.ts_ms);
    sorted
}

/// Copy trades and stable-sort them by ascending timestamp.
pub fn sort_trades(trades: &[Trade]) -> Vec<Trade> {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.ts_ms);
    sorted
}

/// Turns raw record feeds into validated, timestamp-sorted feeds.
pub struct FeedNormalizer;

impl FeedNormalizer {
    /// Validate all order records, then return them sorted by timestamp.
    pub fn orders(records: Vec<OrderRecord>) -> Result<Vec<Order>> {
        let mut orders = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let order = record.into_order().map_err(|e| at_record("order", index, e))?;
            orders.push(order);
        }
        orders.sort_by_key(|o| o.ts_ms);
        Ok(orders)
    }

    /// Validate all trade records, then return them sorted by timestamp.
    pub fn trades(records: Vec<TradeRecord>) -> Result<Vec<Trade>> {
        let mut trades = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let trade = record.into_trade().map_err(|e| at_record("trade", index, e))?;
            trades.push(trade);
        }
        trades.sort_by_key(|t| t.ts_ms);
        Ok(trades)
    }

    /// Parse a JSON array of order records and normalize it.
    pub fn orders_from_json(json: &str) -> Result<Vec<Order>> {
        let records: Vec<OrderRecord> = serde_json::from_str(json)?;
        Self::orders(records)
    }

    /// Parse a JSON array of trade records and normalize it.
    pub fn trades_from_json(json: &str) -> Result<Vec<Trade>> {
        let records: Vec<TradeRecord> = serde_json::from_str(json)?;
        Self::trades(records)
    }

    /// Statistics over a sorted order feed.
    pub fn order_stats(orders: &[Order]) -> FeedStats {
        FeedStats::from_sorted(orders.iter().map(|o| o.ts_ms))
    }

    /// Statistics over a sorted trade feed.
    pub fn trade_stats(trades: &[Trade]) -> FeedStats {
        FeedStats::from_sorted(trades.iter().map(|t| t.ts_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(id: u64, ts_ms: i64) -> Order {
        Order {
            id,
            price: 100.0,
            volume: 1.0,
            side: Side::Buy,
            ts_ms,
        }
    }

    fn record(id: u64, side: Option<Side>, ts_ms: Option<i64>) -> OrderRecord {
        OrderRecord {
            id,
            price: 100.0,
            volume: 1.0,
            side,
            ts_ms,
        }
    }

    #[test]
    fn test_sort_is_stable_copy() {
        let original = vec![make_order(1, 3_000), make_order(2, 1_000), make_order(3, 1_000)];
        let sorted = sort_orders(&original);

        let ids: Vec<u64> = sorted.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        // Caller's feed keeps its order
        assert_eq!(original[0].id, 1);
    }

    #[test]
    fn test_normalize_sorts() {
        let orders = FeedNormalizer::orders(vec![
            record(1, Some(Side::Sell), Some(5_000)),
            record(2, Some(Side::Buy), Some(2_000)),
        ])
        .unwrap();
        assert_eq!(orders[0].id, 2);
        assert_eq!(orders[1].id, 1);
    }

    #[test]
    fn test_missing_side_fails_whole_feed() {
        let err = FeedNormalizer::orders(vec![
            record(1, Some(Side::Sell), Some(5_000)),
            record(2, None, Some(2_000)),
        ])
        .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("#1"));
        assert!(err.to_string().contains("side"));
    }

    #[test]
    fn test_missing_timestamp_fails() {
        let err = FeedNormalizer::trades(vec![TradeRecord {
            id: 4,
            side: Some(Side::Buy),
            ..TradeRecord::default()
        }])
        .unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_non_finite_price_fails() {
        let mut bad = record(8, Some(Side::Buy), Some(0));
        bad.price = f64::NAN;
        assert!(FeedNormalizer::orders(vec![bad]).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": 1, "price": -0.9, "volume": 1, "side": "SELL", "ts_ms": 120000},
            {"id": 2, "price": -0.99, "volume": 1, "side": "SELL", "ts_ms": 60000}
        ]"#;
        let orders = FeedNormalizer::orders_from_json(json).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, 2);
        assert_eq!(orders[1].price, -0.9);

        let null_side = r#"[{"id": 1, "price": 1, "volume": 1, "side": null, "ts_ms": 0}]"#;
        assert!(FeedNormalizer::trades_from_json(null_side).unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_feeds() {
        assert!(FeedNormalizer::orders(Vec::new()).unwrap().is_empty());
        assert!(FeedNormalizer::trade_stats(&[]).is_empty());
    }
}
