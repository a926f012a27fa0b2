//! Application Layer
//!
//! Contains the use cases that orchestrate datasource construction.
//! Use cases depend on domain gateways (abstractions), not concrete implementations.

pub mod use_cases;
