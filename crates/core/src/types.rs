//! Core data types for the trade-surveillance system.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Convert a UTC datetime to a millisecond timestamp.
#[inline]
pub fn ts_from_datetime(dt: DateTime<Utc>) -> TimestampMs {
    dt.timestamp_millis()
}

/// Convert a millisecond timestamp to a UTC datetime, if representable.
#[inline]
pub fn ts_to_datetime(ts_ms: TimestampMs) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
}

struct DisplayTs(TimestampMs);

impl fmt::Display for DisplayTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ts_to_datetime(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Direction of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The other side of the book.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// An order placed on the book, not yet executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: u64,
    /// Limit price. May be negative (spreads, basis quotes).
    pub price: f64,
    /// Order volume.
    pub volume: f64,
    /// Order side.
    pub side: Side,
    /// Placement timestamp in milliseconds.
    pub ts_ms: TimestampMs,
}

impl Order {
    /// Start building an order. Side and timestamp are mandatory.
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order(id={}, {} {}@{} at {})",
            self.id,
            self.side,
            self.volume,
            self.price,
            DisplayTs(self.ts_ms)
        )
    }
}

/// An executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier.
    pub id: u64,
    /// Execution price.
    pub price: f64,
    /// Executed volume.
    pub volume: f64,
    /// Aggressor side.
    pub side: Side,
    /// Execution timestamp in milliseconds.
    pub ts_ms: TimestampMs,
}

impl Trade {
    /// Start building a trade. Side and timestamp are mandatory.
    pub fn builder() -> TradeBuilder {
        TradeBuilder::default()
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade(id={}, {} {}@{} at {})",
            self.id,
            self.side,
            self.volume,
            self.price,
            DisplayTs(self.ts_ms)
        )
    }
}

/// Builder for [`Order`].
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    id: u64,
    price: f64,
    volume: f64,
    side: Option<Side>,
    ts_ms: Option<TimestampMs>,
}

impl OrderBuilder {
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn timestamp(mut self, ts_ms: TimestampMs) -> Self {
        self.ts_ms = Some(ts_ms);
        self
    }

    pub fn datetime(self, dt: DateTime<Utc>) -> Self {
        self.timestamp(ts_from_datetime(dt))
    }

    /// Finish the order, failing if side or timestamp was never set.
    pub fn build(self) -> Result<Order> {
        let side = self
            .side
            .ok_or_else(|| Error::validation(format!("order {}: side is required", self.id)))?;
        let ts_ms = self
            .ts_ms
            .ok_or_else(|| Error::validation(format!("order {}: timestamp is required", self.id)))?;

        Ok(Order {
            id: self.id,
            price: self.price,
            volume: self.volume,
            side,
            ts_ms,
        })
    }
}

/// Builder for [`Trade`].
#[derive(Debug, Clone, Default)]
pub struct TradeBuilder {
    id: u64,
    price: f64,
    volume: f64,
    side: Option<Side>,
    ts_ms: Option<TimestampMs>,
}

impl TradeBuilder {
    pub fn id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn timestamp(mut self, ts_ms: TimestampMs) -> Self {
        self.ts_ms = Some(ts_ms);
        self
    }

    pub fn datetime(self, dt: DateTime<Utc>) -> Self {
        self.timestamp(ts_from_datetime(dt))
    }

    /// Finish the trade, failing if side or timestamp was never set.
    pub fn build(self) -> Result<Trade> {
        let side = self
            .side
            .ok_or_else(|| Error::validation(format!("trade {}: side is required", self.id)))?;
        let ts_ms = self
            .ts_ms
            .ok_or_else(|| Error::validation(format!("trade {}: timestamp is required", self.id)))?;

        Ok(Trade {
            id: self.id,
            price: self.price,
            volume: self.volume,
            side,
            ts_ms,
        })
    }
}

/// A trade together with the earlier orders found suspicious against it.
///
/// The order list is never empty and keeps window order (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousEvent {
    orders: Vec<Order>,
    trade: Trade,
}

impl SuspiciousEvent {
    /// Create an event. Fails if `orders` is empty.
    pub fn new(orders: Vec<Order>, trade: Trade) -> Result<Self> {
        if orders.is_empty() {
            return Err(Error::validation(format!(
                "suspicious event for trade {} has no orders",
                trade.id
            )));
        }
        Ok(Self { orders, trade })
    }

    /// Orders suspicious against the trade, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The trade the orders are suspicious against.
    pub fn trade(&self) -> &Trade {
        &self.trade
    }

    /// Number of suspicious orders. Always at least one.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Decompose into orders and trade.
    pub fn into_parts(self) -> (Vec<Order>, Trade) {
        (self.orders, self.trade)
    }
}

impl fmt::Display for SuspiciousEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuspiciousEvent(trade={}, orders=[", self.trade)?;
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", order)?;
        }
        f.write_str("])")
    }
}
