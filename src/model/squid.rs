//! Counters reported by the proxy manager interface.

use serde::Serialize;

/// Operational counters scraped from the manager info page.
///
/// Every field falls back to zero when the page is unavailable or the
/// matching line is missing or unparsable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProxyStatus {
    /// Total HTTP requests received since the proxy started.
    pub requests_total: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Byte hit ratio in percent, first window reported on the line.
    pub byte_hit_ratio: f64,
}
