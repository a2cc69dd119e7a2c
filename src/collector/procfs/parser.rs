//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions over file contents so they can be tested with
//! string inputs.

use crate::collector::addr::{decode_hex_addr, is_loopback};
use crate::collector::error::CollectError;
use crate::model::TcpState;

/// One counted row of `/proc/net/tcp{,6}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpEntry {
    pub local_port: u16,
    /// Decoded remote address.
    pub remote_addr: String,
    pub state: TcpState,
}

/// Parses a single connection table row.
///
/// Returns `None` for rows that are malformed or in a state that is not
/// counted. Loopback filtering is left to the caller.
///
/// Format: `sl local_address rem_address st ...` where addresses are
/// `HEXADDR:HEXPORT`.
pub fn parse_tcp_line(line: &str) -> Option<TcpEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let state = TcpState::from_hex(fields[3])?;

    let (_, local_port) = fields[1].rsplit_once(':')?;
    let local_port = u16::from_str_radix(local_port, 16).ok()?;

    let (remote_hex, _) = fields[2].rsplit_once(':')?;

    Some(TcpEntry {
        local_port,
        remote_addr: decode_hex_addr(remote_hex),
        state,
    })
}

/// Parses a whole connection table, skipping the header line.
///
/// Only rows on one of `ports` from a non-loopback peer are returned.
pub fn parse_tcp_table(content: &str, ports: &[u16]) -> Vec<TcpEntry> {
    content
        .lines()
        .skip(1)
        .filter_map(parse_tcp_line)
        .filter(|e| ports.contains(&e.local_port))
        .filter(|e| !is_loopback(&e.remote_addr))
        .collect()
}

/// Parses a PID file.
pub fn parse_pid(content: &str) -> Result<u32, CollectError> {
    let trimmed = content.trim();
    trimmed
        .parse()
        .map_err(|_| CollectError::parse(format!("invalid pid '{}'", trimmed)))
}

/// Extracts the start time (clock ticks after boot) from `/proc/[pid]/stat`.
///
/// The comm field may contain spaces and parentheses, so fields are counted
/// from the last `)`. Start time is the 20th field after it.
pub fn parse_stat_starttime(content: &str) -> Result<u64, CollectError> {
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| CollectError::parse("missing ')' in stat"))?;

    let starttime = content[close_paren + 1..]
        .split_whitespace()
        .nth(19)
        .ok_or_else(|| CollectError::parse("missing starttime in stat"))?;

    starttime
        .parse()
        .map_err(|_| CollectError::parse(format!("invalid starttime '{}'", starttime)))
}

/// Parses `/proc/uptime`: the first token is seconds since boot.
pub fn parse_uptime(content: &str) -> Result<f64, CollectError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or_else(|| CollectError::parse("empty uptime"))?;

    first
        .parse()
        .map_err(|_| CollectError::parse(format!("invalid uptime '{}'", first)))
}
