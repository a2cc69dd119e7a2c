//! The snapshot handed to the HTTP layer.
//!
//! A `Snapshot` is built once per request and never modified afterwards.
//! Fields are private and only reachable through accessors; the serialized
//! form is the JSON document consumed by the dashboard.

use serde::Serialize;

use super::network::ConnectionStats;
use super::squid::ProxyStatus;

/// One point-in-time view of the proxy host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    total_connections: u64,
    http_connections: u64,
    https_connections: u64,
    http_clients: Vec<String>,
    https_clients: Vec<String>,
    /// Proxy process uptime in seconds.
    uptime: u64,
    /// Memory usage of the cgroup in megabytes, one decimal.
    memory_mb: f64,
    squid: ProxyStatus,
}

impl Snapshot {
    /// Assembles a snapshot. The total is always derived from the buckets.
    pub fn new(
        connections: &ConnectionStats,
        uptime: u64,
        memory_mb: f64,
        squid: ProxyStatus,
    ) -> Self {
        Self {
            total_connections: connections.total(),
            http_connections: connections.http.connections,
            https_connections: connections.https.connections,
            http_clients: connections.http.client_list(),
            https_clients: connections.https.client_list(),
            uptime,
            memory_mb,
            squid,
        }
    }

    pub fn total_connections(&self) -> u64 {
        self.total_connections
    }

    pub fn http_connections(&self) -> u64 {
        self.http_connections
    }

    pub fn https_connections(&self) -> u64 {
        self.https_connections
    }

    pub fn http_clients(&self) -> &[String] {
        &self.http_clients
    }

    pub fn https_clients(&self) -> &[String] {
        &self.https_clients
    }

    pub fn uptime(&self) -> u64 {
        self.uptime
    }

    pub fn memory_mb(&self) -> f64 {
        self.memory_mb
    }

    pub fn squid(&self) -> &ProxyStatus {
        &self.squid
    }
}
