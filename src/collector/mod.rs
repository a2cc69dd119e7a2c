//! Stats collection for a proxy host.
//!
//! # Architecture
//!
//! ```text
//!                          Collector
//!      ┌───────────────────────┼───────────────────┬─────────────┐
//!      │                       │                   │             │
//! ConnectionTableReader  UptimeEstimator     MemoryReader   SquidClient
//!  /proc/net/tcp{,6}     pid file,           cgroup          plain → TLS
//!                        /proc/[pid]/stat    memory counter  manager info
//!      │                       │                   │
//!      └───────────────────────┼───────────────────┘
//!                         FileSystem (trait)
//!                        ┌─────┴─────┐
//!                      RealFs      MockFs
//! ```
//!
//! Every reader degrades to a zero default instead of failing, so a
//! snapshot can always be produced.
//!
//! # Usage
//!
//! ```
//! use squidmon::collector::{Collector, MockFs};
//! use squidmon::config::MonitorConfig;
//!
//! let config = MonitorConfig {
//!     clock_ticks: Some(100),
//!     manager_host: "host.invalid".to_string(),
//!     ..MonitorConfig::default()
//! };
//! let collector = Collector::new(MockFs::squid_host(), &config);
//! let snapshot = collector.collect_snapshot();
//! assert_eq!(snapshot.total_connections(), 5);
//! ```

pub mod addr;
pub mod cgroup;
#[allow(clippy::module_inception)]
mod collector;
pub mod error;
pub mod mock;
pub mod procfs;
pub mod squid;
pub mod traits;

pub use cgroup::MemoryReader;
pub use collector::{Collector, CollectorTiming};
pub use error::CollectError;
pub use mock::MockFs;
pub use procfs::{ConnectionTableReader, UptimeEstimator};
pub use squid::SquidClient;
pub use traits::{FileSystem, RealFs};
