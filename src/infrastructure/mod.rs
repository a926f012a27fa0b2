//! Infrastructure Layer
//!
//! Contains all external concerns: configuration sources and database pools.

pub mod driven_adapters;
