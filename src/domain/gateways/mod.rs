//! Domain Gateways
//!
//! Traits defining contracts for external collaborators.
//! Implementations live in the infrastructure layer.

pub mod property_binder;

pub use property_binder::PropertyBinder;
