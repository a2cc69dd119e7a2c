//! Decoding of the packed hex addresses used in `/proc/net/tcp{,6}`.
//!
//! The kernel prints each address as raw 32-bit words in host byte order,
//! so on little-endian machines `127.0.0.1` shows up as `0100007F`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Decodes a hex endpoint address into its textual form.
///
/// - 8 hex digits: one little-endian word, printed as dotted-decimal IPv4.
/// - 32 hex digits: four little-endian words forming an IPv6 address.
///   IPv4-mapped addresses (`::ffff:a.b.c.d`) are printed as plain IPv4.
///
/// Anything else is returned unchanged.
pub fn decode_hex_addr(hex: &str) -> String {
    decode_ip(hex)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| hex.to_string())
}

fn decode_ip(hex: &str) -> Option<IpAddr> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        8 => {
            let word = u32::from_str_radix(hex, 16).ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(word.to_le_bytes())))
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
                let word = u32::from_str_radix(&hex[i * 8..(i + 1) * 8], 16).ok()?;
                chunk.copy_from_slice(&word.to_le_bytes());
            }
            let v6 = Ipv6Addr::from(bytes);
            Some(match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            })
        }
        _ => None,
    }
}

/// Returns `true` for decoded addresses that point back at the local host.
///
/// Covers the whole `127.0.0.0/8` block, not just `127.0.0.1`, so a peer such
/// as `127.0.1.1` is dropped too. Also covers `::1` and mapped loopback that
/// slipped through undecoded as `::ffff:127.x.y.z`.
pub fn is_loopback(addr: &str) -> bool {
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
        Err(_) => addr.starts_with("::ffff:127."),
    }
}
