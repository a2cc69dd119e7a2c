//! squidmon - point-in-time stats collector for a Squid proxy host.
//!
//! This library provides the collection engine used by the `squidmon` binary:
//! - `collector` - readers for `/proc`, cgroup counters and the proxy manager
//! - `model` - the snapshot produced by one collection pass
//! - `config` - fixed paths, ports and timeouts, overridable for tests

pub mod collector;
pub mod config;
pub mod model;
