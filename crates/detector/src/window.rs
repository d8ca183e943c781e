//! Trailing time window of candidate orders.
//!
//! Orders are consumed once, through a forward-only cursor over a
//! timestamp-sorted feed, and kept in a FIFO while they stay inside the
//! window of the trade being processed. Trades must be fed in non-decreasing
//! timestamp order; the window is reused between trades.

use std::collections::VecDeque;
use std::iter::Peekable;
use std::slice;

use surveillance_core::{Order, TimestampMs};

/// Orders strictly inside `(trade_ts - window_ms, trade_ts)`.
pub struct CandidateWindow<'a> {
    /// Window length (ms).
    window_ms: i64,
    /// Orders currently inside the window, oldest first.
    orders: VecDeque<&'a Order>,
    /// Next order not yet pulled from the feed.
    cursor: Peekable<slice::Iter<'a, Order>>,
    /// Timestamp of the last refresh, for the monotonic precondition.
    last_trade_ts: Option<TimestampMs>,
    /// Orders ever pushed into the window.
    admitted: usize,
    /// Largest window size seen.
    peak_len: usize,
}

impl<'a> CandidateWindow<'a> {
    /// Create a window over an order feed sorted by ascending timestamp.
    pub fn new(sorted_orders: &'a [Order], window_ms: i64) -> Self {
        debug_assert!(
            sorted_orders.windows(2).all(|w| w[0].ts_ms <= w[1].ts_ms),
            "order feed must be sorted by timestamp"
        );
        Self {
            window_ms,
            orders: VecDeque::new(),
            cursor: sorted_orders.iter().peekable(),
            last_trade_ts: None,
            admitted: 0,
            peak_len: 0,
        }
    }

    /// Open interval test: `trade_ts - window_ms < order_ts < trade_ts`.
    #[inline]
    pub fn contains_ts(&self, order_ts: TimestampMs, trade_ts: TimestampMs) -> bool {
        order_ts > trade_ts.saturating_sub(self.window_ms) && order_ts < trade_ts
    }

    /// Pull every order placed at or before `trade_ts` from the cursor.
    ///
    /// Pulled orders outside the open interval are dropped for good, including
    /// orders placed at exactly `trade_ts`. Orders after `trade_ts` stay in the
    /// cursor for a later trade.
    pub fn advance(&mut self, trade_ts: TimestampMs) {
        while let Some(order) = self.cursor.next_if(|o| o.ts_ms <= trade_ts) {
            if self.contains_ts(order.ts_ms, trade_ts) {
                self.orders.push_back(order);
                self.admitted += 1;
            }
        }
        self.peak_len = self.peak_len.max(self.orders.len());
    }

    /// Drop orders that aged out at the head.
    ///
    /// Entries are in timestamp order, so once the head is inside the window
    /// every later entry is too.
    pub fn evict(&mut self, trade_ts: TimestampMs) {
        while let Some(head) = self.orders.front() {
            if self.contains_ts(head.ts_ms, trade_ts) {
                break;
            }
            self.orders.pop_front();
        }
    }

    /// Bring the window up to date for a trade at `trade_ts`.
    pub fn refresh(&mut self, trade_ts: TimestampMs) {
        debug_assert!(
            self.last_trade_ts.map_or(true, |last| last <= trade_ts),
            "trades must be processed in timestamp order"
        );
        self.last_trade_ts = Some(trade_ts);
        self.advance(trade_ts);
        self.evict(trade_ts);
    }

    /// Orders in the window, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Order> + '_ {
        self.orders.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total orders admitted over the window's lifetime.
    pub fn admitted(&self) -> usize {
        self.admitted
    }

    /// Largest number of orders held at once.
    pub fn peak_len(&self) -> usize {
        self.peak_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveillance_core::Side;

    const MIN: i64 = 60_000;

    fn make_order(id: u64, ts_ms: i64) -> Order {
        Order {
            id,
            price: 100.0,
            volume: 1.0,
            side: Side::Sell,
            ts_ms,
        }
    }

    fn ids(window: &CandidateWindow<'_>) -> Vec<u64> {
        window.iter().map(|o| o.id).collect()
    }

    #[test]
    fn test_open_interval() {
        let orders = Vec::new();
        let window = CandidateWindow::new(&orders, 30 * MIN);
        let trade_ts = 100 * MIN;

        assert!(window.contains_ts(trade_ts - 1, trade_ts));
        assert!(window.contains_ts(trade_ts - 30 * MIN + 1, trade_ts));
        // Both ends excluded
        assert!(!window.contains_ts(trade_ts, trade_ts));
        assert!(!window.contains_ts(trade_ts - 30 * MIN, trade_ts));
    }

    #[test]
    fn test_advance_stops_at_trade() {
        let orders = vec![
            make_order(1, 10 * MIN),
            make_order(2, 20 * MIN),
            make_order(3, 40 * MIN),
        ];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(30 * MIN);
        assert_eq!(ids(&window), vec![1, 2]);

        // Order 3 was left in the cursor, order 1 ages out
        window.refresh(45 * MIN);
        assert_eq!(ids(&window), vec![2, 3]);
    }

    #[test]
    fn test_too_old_orders_never_admitted() {
        let orders = vec![make_order(1, 0), make_order(2, 50 * MIN)];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(60 * MIN);
        assert_eq!(ids(&window), vec![2]);
        assert_eq!(window.admitted(), 1);
    }

    #[test]
    fn test_order_at_trade_time_is_consumed() {
        let orders = vec![make_order(1, 10 * MIN), make_order(2, 12 * MIN)];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(10 * MIN);
        assert!(window.is_empty());

        // Order 1 was pulled by the earlier trade and never comes back
        window.refresh(13 * MIN);
        assert_eq!(ids(&window), vec![2]);
        assert_eq!(window.admitted(), 1);
    }

    #[test]
    fn test_order_after_trade_stays_in_cursor() {
        let orders = vec![make_order(1, 10 * MIN + 1)];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(10 * MIN);
        assert!(window.is_empty());

        window.refresh(11 * MIN);
        assert_eq!(ids(&window), vec![1]);
    }

    #[test]
    fn test_window_boundary_eviction() {
        let orders = vec![make_order(1, 0), make_order(2, MIN)];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(30 * MIN - 1);
        assert_eq!(ids(&window), vec![1, 2]);

        // Exactly window_ms after order 1
        window.refresh(30 * MIN);
        assert_eq!(ids(&window), vec![2]);
        assert_eq!(window.peak_len(), 2);
    }

    #[test]
    fn test_same_trade_time_reuses_window() {
        let orders = vec![make_order(1, MIN), make_order(2, 2 * MIN)];
        let mut window = CandidateWindow::new(&orders, 30 * MIN);

        window.refresh(5 * MIN);
        window.refresh(5 * MIN);
        assert_eq!(ids(&window), vec![1, 2]);
        assert_eq!(window.admitted(), 2);
    }
}
