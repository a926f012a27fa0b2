//! Domain Models
//!
//! Core types for datasource configuration.

pub mod datasource;
pub mod properties;
