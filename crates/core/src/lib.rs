//! Core types and configuration for the trade-surveillance system.
//!
//! This crate provides shared types used across all other crates:
//! - Order and trade records, with builders that enforce mandatory fields
//! - Suspicious events emitted by detectors
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DetectorConfig};
pub use error::{Error, Result};
pub use types::*;
