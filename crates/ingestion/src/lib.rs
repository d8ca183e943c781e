//! Feed normalization for the trade-surveillance system.
//!
//! This crate handles:
//! - Raw order/trade record validation (missing side or timestamp, non-finite numbers)
//! - Defensive copy-then-sort of feeds by timestamp
//! - Feed statistics for logging

pub mod feed;
pub mod stats;

pub use feed::{
    sort_orders, sort_trades, validate_order, validate_trade, FeedNormalizer, OrderRecord,
    TradeRecord,
};
pub use stats::FeedStats;
