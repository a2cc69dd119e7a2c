//! Parsers for cgroup memory counters.

use crate::collector::error::CollectError;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Parses `memory.current` (v2) or `memory.usage_in_bytes` (v1).
/// Format: number (bytes)
pub fn parse_memory_bytes(content: &str) -> Result<u64, CollectError> {
    let trimmed = content.trim();
    trimmed
        .parse()
        .map_err(|_| CollectError::parse(format!("invalid memory counter '{}'", trimmed)))
}

/// Converts bytes to megabytes rounded to one decimal.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 10.0).round() / 10.0
}
