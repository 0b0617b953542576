//! Swap Engine & Assistant
//!
//! The client-side core of a currency-swap platform:
//! - Resolves conversions (net payout, itemized fees, effective rate)
//!   against live or bundled rate and fee data
//! - Classifies free-text chat into a fixed intent set and answers in
//!   five languages, with optional speech in and out
//! - Publishes a polled rate board for passive displays
//! - Degrades tier by tier instead of crashing on a dead endpoint
//!
//! DATA CHAIN:
//! LIVE API → BUNDLED FALLBACK → EXPLICIT UNAVAILABILITY

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fees;
pub mod models;
pub mod poller;
pub mod rates;
pub mod resolver;
pub mod speech;
pub mod state;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use resolver::{resolve_conversion, LiveData};
