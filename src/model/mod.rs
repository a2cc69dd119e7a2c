//! Data model of one collection pass.

mod network;
mod snapshot;
mod squid;

pub use network::{ConnectionStats, Protocol, ProtocolBucket, TcpState};
pub use snapshot::Snapshot;
pub use squid::ProxyStatus;
