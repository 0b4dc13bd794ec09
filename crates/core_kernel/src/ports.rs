//! Ports infrastructure
//!
//! Vendor-facing traits (auth endpoints, CRUD wire clients) are declared in
//! the domain crates and extend the [`DomainPort`] marker here. Adapters
//! implement them either against a real vendor or in memory.
//!
//! ```text
//!   session managers / object services
//!                 │
//!                 ▼
//!     ZhAuthPort, Office365AuthPort, CrmObjectPort
//!            ▲                      ▲
//!   ┌────────┴───────┐    ┌────────┴────────┐
//!   │ vendor adapter │    │ sandbox adapter │
//!   └────────────────┘    └─────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use crate::error::CadError;

/// Marker trait for all vendor ports
///
/// Ports are shared across request tasks, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Runs a vendor call with an upper bound on its duration
///
/// An elapsed deadline becomes [`CadError::Timeout`]; the call's own result
/// is returned untouched otherwise.
pub async fn with_timeout<T, F>(operation: &str, limit: Duration, call: F) -> Result<T, CadError>
where
    F: Future<Output = Result<T, CadError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "vendor call timed out");
            Err(CadError::Timeout {
                operation: operation.to_string(),
                duration_ms: limit.as_millis() as u64,
            })
        }
    }
}
