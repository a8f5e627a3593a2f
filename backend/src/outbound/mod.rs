//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel
//! - **memory**: in-process repositories for local runs and tests
//! - **password**: bcrypt password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod memory;
pub mod password;
pub mod persistence;
