//! Gateway error taxonomy
//!
//! Every failure the gateway surfaces to a caller is a [`CadError`]. Each
//! variant carries a stable [`ResponseCode`] so that callers can branch on
//! the code rather than parse the message text.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::vendor::Vendor;

/// Stable numeric code attached to every caller-visible failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResponseCode(u16);

impl ResponseCode {
    pub const UNSUPPORTED_OPERATION: Self = Self(1003);
    pub const NOT_FOUND: Self = Self(1004);
    pub const VALIDATION: Self = Self(1008);
    pub const CONFIGURATION: Self = Self(1009);
    pub const AUTHENTICATION: Self = Self(1012);
    pub const ROUTING: Self = Self(1013);
    pub const TIMEOUT: Self = Self(1014);
    pub const SESSION_NOT_FOUND: Self = Self(1015);
    pub const VENDOR: Self = Self(1016);

    /// Returns the raw numeric value
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAD-{}", self.0)
    }
}

/// Error type shared by the session managers, the object services and the
/// service factory
///
/// Errors raised below the boundary layer propagate unchanged; the boundary
/// maps each kind onto a transport status.
#[derive(Debug, Error)]
pub enum CadError {
    /// A required integration field (service URL, protocol) is missing
    #[error("{}: CRM integration information is missing: {field}", ResponseCode::CONFIGURATION)]
    Configuration { field: String },

    /// The vendor auth endpoint returned no token
    #[error("{}: Login attempt at {vendor} is failed. Check credentials", ResponseCode::AUTHENTICATION)]
    Authentication { vendor: Vendor },

    /// The vendor session manager does not implement the operation
    #[error("{}: Following operation is not supported by the CAD: {operation}", ResponseCode::UNSUPPORTED_OPERATION)]
    UnsupportedOperation { operation: String },

    /// The requested business object is absent
    #[error("{}: {object_type} not found", ResponseCode::NOT_FOUND)]
    NotFound { object_type: String },

    /// No vendor could be resolved for the request
    #[error("{}: No CRM service is available for '{routing_key}'", ResponseCode::ROUTING)]
    Routing { routing_key: String },

    /// No credential record was ever admitted for the caller
    #[error("{}: CRM session for '{key}' is not found; authenticate first", ResponseCode::SESSION_NOT_FOUND)]
    SessionNotFound { key: String },

    /// The inbound request failed validation
    #[error("{}: {message}", ResponseCode::VALIDATION)]
    Validation { message: String },

    /// A vendor call did not finish in time
    #[error("{}: {operation} timed out after {duration_ms}ms", ResponseCode::TIMEOUT)]
    Timeout { operation: String, duration_ms: u64 },

    /// The vendor CRM rejected or failed a call
    #[error("{}: {vendor} call failed: {message}", ResponseCode::VENDOR)]
    Vendor { vendor: Vendor, message: String },
}

impl CadError {
    pub fn configuration(field: impl Into<String>) -> Self {
        CadError::Configuration { field: field.into() }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        CadError::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    pub fn not_found(object_type: impl Into<String>) -> Self {
        CadError::NotFound {
            object_type: object_type.into(),
        }
    }

    pub fn routing(routing_key: impl Into<String>) -> Self {
        CadError::Routing {
            routing_key: routing_key.into(),
        }
    }

    pub fn session_not_found(key: impl fmt::Display) -> Self {
        CadError::SessionNotFound {
            key: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CadError::Validation {
            message: message.into(),
        }
    }

    pub fn vendor(vendor: Vendor, message: impl Into<String>) -> Self {
        CadError::Vendor {
            vendor,
            message: message.into(),
        }
    }

    /// Returns the stable code for this error kind
    pub fn code(&self) -> ResponseCode {
        match self {
            CadError::Configuration { .. } => ResponseCode::CONFIGURATION,
            CadError::Authentication { .. } => ResponseCode::AUTHENTICATION,
            CadError::UnsupportedOperation { .. } => ResponseCode::UNSUPPORTED_OPERATION,
            CadError::NotFound { .. } => ResponseCode::NOT_FOUND,
            CadError::Routing { .. } => ResponseCode::ROUTING,
            CadError::SessionNotFound { .. } => ResponseCode::SESSION_NOT_FOUND,
            CadError::Validation { .. } => ResponseCode::VALIDATION,
            CadError::Timeout { .. } => ResponseCode::TIMEOUT,
            CadError::Vendor { .. } => ResponseCode::VENDOR,
        }
    }
}
