//! Trade surveillance detectors.
//!
//! This crate handles:
//! - Trailing candidate window over a sorted order feed
//! - Opposite-side, price-proximity suspicion rule
//! - Detection driver emitting suspicious events per trade

pub mod detector;
pub mod rule;
pub mod window;

pub use detector::{DetectionStats, ManipulationDetector, WindowedDetector};
pub use rule::{PriceBand, SuspicionRule};
pub use window::CandidateWindow;
