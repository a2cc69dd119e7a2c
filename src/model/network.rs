//! Connection table model: TCP states, protocol buckets and per-bucket stats.

use std::collections::BTreeSet;

/// TCP connection states that count as a live client connection.
///
/// Values are the kernel codes from `include/net/tcp_states.h`, as they
/// appear (hex) in the `st` column of `/proc/net/tcp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TcpState {
    Established,
    TimeWait,
    CloseWait,
}

impl TcpState {
    /// Maps a raw kernel state code. Codes that are not counted return `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(TcpState::Established),
            0x06 => Some(TcpState::TimeWait),
            0x08 => Some(TcpState::CloseWait),
            _ => None,
        }
    }

    /// Parses the hex `st` column of `/proc/net/tcp`.
    pub fn from_hex(s: &str) -> Option<Self> {
        u8::from_str_radix(s, 16).ok().and_then(Self::from_code)
    }
}

/// Protocol served on a proxy listening port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

/// Connection count and distinct client addresses for one protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolBucket {
    pub connections: u64,
    /// Ordered so that unchanged sources always produce identical output.
    pub clients: BTreeSet<String>,
}

impl ProtocolBucket {
    pub fn record(&mut self, client: String) {
        self.connections += 1;
        self.clients.insert(client);
    }

    pub fn client_list(&self) -> Vec<String> {
        self.clients.iter().cloned().collect()
    }
}

/// Result of scanning the connection tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    pub http: ProtocolBucket,
    pub https: ProtocolBucket,
}

impl ConnectionStats {
    pub fn bucket_mut(&mut self, protocol: Protocol) -> &mut ProtocolBucket {
        match protocol {
            Protocol::Http => &mut self.http,
            Protocol::Https => &mut self.https,
        }
    }

    pub fn total(&self) -> u64 {
        self.http.connections + self.https.connections
    }
}
