//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod locks;
pub mod service;

pub use locks::KeyedLocks;
pub use service::{TraceabilityDependencies, TraceabilityService};
