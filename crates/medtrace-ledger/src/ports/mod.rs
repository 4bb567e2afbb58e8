//! # Ports
//!
//! Inbound ports are the API this crate offers; outbound ports are what the
//! host must provide.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
