//! Proxy manager status collection.
//!
//! Queries the manager info page of the co-located proxy and extracts a few
//! counters from its free-text output.

mod client;
mod parser;

pub use client::{Attempt, SquidClient, Transport};
pub use parser::{decode_response, parse_manager_info};
