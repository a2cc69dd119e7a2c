//! Parser for the manager info page.
//!
//! The page is free text meant for humans, with labels and values padded by
//! whitespace. Fields are located by label substring and every field that
//! cannot be parsed keeps its default.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::ProxyStatus;

const REQUESTS_LABEL: &str = "Number of HTTP requests received";
const CACHE_HITS_LABEL: &str = "Cache Hits:";
const CACHE_MISSES_LABEL: &str = "Cache Misses:";
const BYTE_HIT_RATIO_LABEL: &str = "Byte Hit Ratio:";

/// First `<number>%` on a line.
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)%").expect("valid regex"));

/// Decodes a raw response, dropping byte sequences that are not valid UTF-8.
///
/// Valid text is kept as is, including any literal U+FFFD.
pub fn decode_response(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Extracts the counters from a manager info response (headers included).
///
/// Each line is checked against the labels in order and only the first
/// matching label is used. Later lines override earlier ones.
pub fn parse_manager_info(text: &str) -> ProxyStatus {
    let mut status = ProxyStatus::default();

    for line in text.lines() {
        if line.contains(REQUESTS_LABEL) {
            if let Some(v) = after_colon(line).and_then(|s| s.trim().parse().ok()) {
                status.requests_total = v;
            }
        } else if line.contains(CACHE_HITS_LABEL) {
            if let Some(v) = first_token_after_colon(line) {
                status.cache_hits = v;
            }
        } else if line.contains(CACHE_MISSES_LABEL) {
            if let Some(v) = first_token_after_colon(line) {
                status.cache_misses = v;
            }
        } else if line.contains(BYTE_HIT_RATIO_LABEL) {
            if let Some(v) = first_percentage(line) {
                status.byte_hit_ratio = v;
            }
        }
    }

    status
}

/// Text between the first and second `:`.
fn after_colon(line: &str) -> Option<&str> {
    line.split(':').nth(1)
}

/// `Cache Hits:          120 ( 40%)` -> 120
fn first_token_after_colon(line: &str) -> Option<u64> {
    after_colon(line)?.split_whitespace().next()?.parse().ok()
}

/// `Byte Hit Ratio:       12.5%  30.0%` -> 12.5
///
/// The manager may print several windows (5 and 60 minutes) on one line;
/// only the first one is kept.
fn first_percentage(line: &str) -> Option<f64> {
    PERCENT_RE.captures(line)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_PAGE: &str = "HTTP/1.1 200 OK\r
Server: squid/6.6\r
Content-Type: text/plain;charset=utf-8\r
Connection: close\r
\r
Squid Object Cache: Version 6.6
Service Name: squid
Connection information for squid:
\tNumber of clients accessing cache:\t3
\tNumber of HTTP requests received:\t1542
\tNumber of ICP messages received:\t0
Cache information for squid:
\tCache Hits:          120 ( 40%)
\tCache Misses:        180 ( 60%)
\tByte Hit Ratio:       12.5%  30.0%
\tStorage Swap size:\t1024 KB
";

    #[test]
    fn test_parse_full_page() {
        let status = parse_manager_info(INFO_PAGE);
        assert_eq!(status.requests_total, 1542);
        assert_eq!(status.cache_hits, 120);
        assert_eq!(status.cache_misses, 180);
        assert_eq!(status.byte_hit_ratio, 12.5);
    }

    #[test]
    fn test_cache_hits_ignores_percentage() {
        let status = parse_manager_info("Cache Hits:          120 ( 40%)");
        assert_eq!(status.cache_hits, 120);
        assert_eq!(status.byte_hit_ratio, 0.0);
    }

    #[test]
    fn test_byte_hit_ratio_takes_first_window() {
        let status = parse_manager_info("Byte Hit Ratio:       12.5%  30.0%");
        assert_eq!(status.byte_hit_ratio, 12.5);

        let status = parse_manager_info("\tByte Hit Ratio:\t5min: 7.0%, 60min: 9.5%");
        assert_eq!(status.byte_hit_ratio, 7.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let status = parse_manager_info("Number of HTTP requests received: 42\n");
        assert_eq!(
            status,
            ProxyStatus {
                requests_total: 42,
                ..ProxyStatus::default()
            }
        );
        assert_eq!(parse_manager_info(""), ProxyStatus::default());
    }

    #[test]
    fn test_bad_field_keeps_default_for_that_field_only() {
        let text = "\
Number of HTTP requests received: lots
Cache Hits: 7 (10%)
Cache Misses: n/a
Byte Hit Ratio: 1.2.3%
";
        let status = parse_manager_info(text);
        assert_eq!(status.requests_total, 0);
        assert_eq!(status.cache_hits, 7);
        assert_eq!(status.cache_misses, 0);
        assert_eq!(status.byte_hit_ratio, 0.0);
    }

    #[test]
    fn test_empty_value_after_label() {
        let status = parse_manager_info("Cache Hits:\nCache Misses:   \n");
        assert_eq!(status, ProxyStatus::default());
    }

    #[test]
    fn test_decode_response_drops_invalid_bytes() {
        let raw = b"Number of HTTP requests received: 4\xff2\n";
        let text = decode_response(raw);
        assert_eq!(text, "Number of HTTP requests received: 42\n");
        assert_eq!(parse_manager_info(&text).requests_total, 42);
    }

    #[test]
    fn test_decode_response_keeps_literal_replacement_char() {
        let raw = "Service Name: squid \u{FFFD}\n".as_bytes();
        assert_eq!(decode_response(raw), "Service Name: squid \u{FFFD}\n");

        let mut mixed = b"a\xc3".to_vec();
        mixed.extend_from_slice("\u{FFFD}b".as_bytes());
        assert_eq!(decode_response(&mixed), "a\u{FFFD}b");
    }
}
