//! CRM Object Adapters
//!
//! Implementations of [`CrmObjectPort`](crate::ports::CrmObjectPort).
//!
//! # Available Adapters
//!
//! - **SandboxCrmObjectPort**: in-memory CRM used by tests and by the
//!   gateway's sandbox mode
//!
//! Real vendor wire clients plug in by implementing the same port.

pub mod sandbox;

pub use sandbox::SandboxCrmObjectPort;
