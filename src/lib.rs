//! External DataSource
//!
//! Binds the indexed `db.*` configuration namespace and builds one lazily
//! opened connection pool per configured database, following
//! Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
