//! Core Kernel - shared vocabulary for the CRM adapter gateway
//!
//! This crate provides the building blocks every other crate depends on:
//! - The error taxonomy with stable response codes
//! - Caller identity and transaction identifiers
//! - The vendor routing key
//! - The port marker trait and the bounded vendor-call helper

pub mod error;
pub mod identifiers;
pub mod ports;
pub mod vendor;

pub use error::{CadError, ResponseCode};
pub use identifiers::{CrmUserId, TransactionId};
pub use ports::{with_timeout, DomainPort};
pub use vendor::Vendor;
