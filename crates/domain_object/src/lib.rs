//! Generic CRM Object Domain
//!
//! Uniform CRUD over heterogeneous CRM vendors:
//!
//! - **ObjectCommand / ObjectResponse**: the request/response envelope
//! - **BusinessObjectService**: per-vendor CRUD, always preceded by session
//!   acquisition through `domain_session`
//! - **ServiceFactory**: routes a command to the right vendor service
//! - **CrmObjectPort**: the vendor wire call, with an in-memory sandbox
//!   adapter

pub mod adapters;
pub mod command;
pub mod factory;
pub mod ports;
pub mod service;

pub use adapters::SandboxCrmObjectPort;
pub use command::{CrmObject, ObjectCommand, ObjectQuery, ObjectResponse};
pub use factory::{resolve_vendor, ServiceFactory, SingleServiceFactory, VendorServiceFactory};
pub use ports::CrmObjectPort;
pub use service::{BusinessObjectService, CrmObjectService};
