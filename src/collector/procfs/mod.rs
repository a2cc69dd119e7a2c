//! Collectors for Linux `/proc` filesystem.
//!
//! This module provides parsers and readers for the connection tables and
//! the proxy process accounting fields.

pub mod parser;
mod tcp;
mod uptime;

pub use tcp::ConnectionTableReader;
pub use uptime::{UptimeEstimator, clock_ticks_per_second, elapsed_secs};
