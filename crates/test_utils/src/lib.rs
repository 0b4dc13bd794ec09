//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! gateway test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built credential records
//! - `builders`: Builder for credential records with sensible defaults
//! - `assertions`: Assertion helpers for `CadError` codes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
