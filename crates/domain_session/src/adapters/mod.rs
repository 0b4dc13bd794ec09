//! Vendor Auth Adapters
//!
//! Implementations of the auth ports in [`crate::ports`].
//!
//! # Available Adapters
//!
//! - **SandboxZhAuthPort** / **SandboxOffice365AuthPort**: local endpoints
//!   that issue tokens for any caller presenting a login and password. Used
//!   by the gateway's sandbox mode.
//! - **MockZhAuthPort** / **MockOffice365AuthPort**: scripted endpoints for
//!   tests (re-exported from the ports module behind the `mock` feature)

pub mod sandbox;

pub use sandbox::{SandboxOffice365AuthPort, SandboxZhAuthPort};
