//! PyO3 bindings for trade-surveillance Rust components.
//!
//! Exposes the Rust detector to Python:
//! - Order, trade and side types
//! - Suspicious events
//! - Windowed manipulation detector

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use surveillance_core::{
    DetectorConfig, Error as RustError, Order as RustOrder, Side as RustSide,
    SuspiciousEvent as RustSuspiciousEvent, Trade as RustTrade,
};
use surveillance_detector::{ManipulationDetector, WindowedDetector};
use surveillance_ingestion::{FeedNormalizer, OrderRecord, TradeRecord};

fn to_py_err(err: RustError) -> PyErr {
    match err {
        RustError::Validation(_) | RustError::Config(_) => PyValueError::new_err(err.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Order or trade side.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, PartialEq)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for RustSide {
    fn from(s: Side) -> Self {
        match s {
            Side::Buy => RustSide::Buy,
            Side::Sell => RustSide::Sell,
        }
    }
}

impl From<RustSide> for Side {
    fn from(s: RustSide) -> Self {
        match s {
            RustSide::Buy => Side::Buy,
            RustSide::Sell => Side::Sell,
        }
    }
}

/// An order. Side and timestamp may be left unset; detection rejects such orders.
#[pyclass]
#[derive(Clone)]
pub struct Order {
    #[pyo3(get, set)]
    pub id: u64,
    #[pyo3(get, set)]
    pub price: f64,
    #[pyo3(get, set)]
    pub volume: f64,
    #[pyo3(get, set)]
    pub side: Option<Side>,
    #[pyo3(get, set)]
    pub ts_ms: Option<i64>,
}

#[pymethods]
impl Order {
    #[new]
    #[pyo3(signature = (id, price, volume, side=None, ts_ms=None))]
    fn new(id: u64, price: f64, volume: f64, side: Option<Side>, ts_ms: Option<i64>) -> Self {
        Order { id, price, volume, side, ts_ms }
    }

    fn __repr__(&self) -> String {
        format!(
            "Order(id={}, price={}, volume={}, side={:?}, ts_ms={:?})",
            self.id,
            self.price,
            self.volume,
            self.side.map(RustSide::from),
            self.ts_ms
        )
    }
}

impl From<Order> for OrderRecord {
    fn from(o: Order) -> Self {
        OrderRecord {
            id: o.id,
            price: o.price,
            volume: o.volume,
            side: o.side.map(Into::into),
            ts_ms: o.ts_ms,
        }
    }
}

impl From<RustOrder> for Order {
    fn from(o: RustOrder) -> Self {
        Order {
            id: o.id,
            price: o.price,
            volume: o.volume,
            side: Some(o.side.into()),
            ts_ms: Some(o.ts_ms),
        }
    }
}

/// An executed trade. Side and timestamp may be left unset; detection rejects such trades.
#[pyclass]
#[derive(Clone)]
pub struct Trade {
    #[pyo3(get, set)]
    pub id: u64,
    #[pyo3(get, set)]
    pub price: f64,
    #[pyo3(get, set)]
    pub volume: f64,
    #[pyo3(get, set)]
    pub side: Option<Side>,
    #[pyo3(get, set)]
    pub ts_ms: Option<i64>,
}

#[pymethods]
impl Trade {
    #[new]
    #[pyo3(signature = (id, price, volume, side=None, ts_ms=None))]
    fn new(id: u64, price: f64, volume: f64, side: Option<Side>, ts_ms: Option<i64>) -> Self {
        Trade { id, price, volume, side, ts_ms }
    }

    fn __repr__(&self) -> String {
        format!(
            "Trade(id={}, price={}, volume={}, side={:?}, ts_ms={:?})",
            self.id,
            self.price,
            self.volume,
            self.side.map(RustSide::from),
            self.ts_ms
        )
    }
}

impl From<Trade> for TradeRecord {
    fn from(t: Trade) -> Self {
        TradeRecord {
            id: t.id,
            price: t.price,
            volume: t.volume,
            side: t.side.map(Into::into),
            ts_ms: t.ts_ms,
        }
    }
}

impl From<RustTrade> for Trade {
    fn from(t: RustTrade) -> Self {
        Trade {
            id: t.id,
            price: t.price,
            volume: t.volume,
            side: Some(t.side.into()),
            ts_ms: Some(t.ts_ms),
        }
    }
}

/// A trade with the orders found suspicious against it.
#[pyclass]
#[derive(Clone)]
pub struct SuspiciousEvent {
    #[pyo3(get)]
    pub orders: Vec<Order>,
    #[pyo3(get)]
    pub trade: Trade,
    repr: String,
}

#[pymethods]
impl SuspiciousEvent {
    fn __len__(&self) -> usize {
        self.orders.len()
    }

    fn __repr__(&self) -> String {
        self.repr.clone()
    }
}

impl From<RustSuspiciousEvent> for SuspiciousEvent {
    fn from(e: RustSuspiciousEvent) -> Self {
        let repr = e.to_string();
        let (orders, trade) = e.into_parts();
        SuspiciousEvent {
            orders: orders.into_iter().map(Into::into).collect(),
            trade: trade.into(),
            repr,
        }
    }
}

// ============================================================================
// Detector Classes
// ============================================================================

/// Trailing-window manipulation detector.
#[pyclass]
pub struct PyManipulationDetector {
    inner: WindowedDetector,
}

#[pymethods]
impl PyManipulationDetector {
    #[new]
    #[pyo3(signature = (window_ms=1_800_000, price_range_pct=0.10))]
    fn new(window_ms: i64, price_range_pct: f64) -> PyResult<Self> {
        let config = DetectorConfig {
            window_ms,
            price_range_pct,
        };
        Ok(PyManipulationDetector {
            inner: WindowedDetector::new(&config).map_err(to_py_err)?,
        })
    }

    /// Detect suspicious events. Raises ValueError on a record without side or timestamp.
    fn detect(&self, orders: Vec<Order>, trades: Vec<Trade>) -> PyResult<Vec<SuspiciousEvent>> {
        let orders = FeedNormalizer::orders(orders.into_iter().map(Into::into).collect())
            .map_err(to_py_err)?;
        let trades = FeedNormalizer::trades(trades.into_iter().map(Into::into).collect())
            .map_err(to_py_err)?;

        let events = self.inner.detect(&orders, &trades).map_err(to_py_err)?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// Window length in milliseconds.
    #[getter]
    fn window_ms(&self) -> i64 {
        self.inner.window_ms()
    }

    /// Price tolerance as a fraction of the trade price.
    #[getter]
    fn price_range_pct(&self) -> f64 {
        self.inner.rule().price_range_pct
    }
}

// ============================================================================
// Module Definition
// ============================================================================

/// Trade Surveillance - Rust manipulation detectors for Python.
#[pymodule]
fn trade_surveillance(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<Side>()?;
    m.add_class::<Order>()?;
    m.add_class::<Trade>()?;
    m.add_class::<SuspiciousEvent>()?;

    // Detector classes
    m.add_class::<PyManipulationDetector>()?;

    Ok(())
}
