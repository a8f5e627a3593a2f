//! Blog backend library: domain, adapters and middleware.
//!
//! The binary in `main.rs` wires these together; integration tests build the
//! same app from the public modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
