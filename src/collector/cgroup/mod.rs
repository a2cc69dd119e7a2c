//! Cgroup memory usage.
//!
//! Reads the memory counter of the cgroup the proxy runs in, preferring the
//! cgroup v2 file and falling back to the v1 controller.

mod collector;
mod parser;

pub use collector::MemoryReader;
