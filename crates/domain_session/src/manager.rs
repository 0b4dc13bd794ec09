//! Vendor session manager capability set
//!
//! Every CRM vendor gets its own manager implementing
//! [`CrmSessionManager`]. Vendors that cannot support an operation answer
//! with [`CadError::UnsupportedOperation`] instead of sharing a branching
//! implementation, so adding a vendor never touches the existing ones.

use std::time::Duration;

use async_trait::async_trait;

use core_kernel::{CadError, CrmUserId, Vendor};

use crate::cache::SessionCache;
use crate::user::CrmUser;

/// Settings shared by all session managers
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Upper bound on a single vendor auth call
    pub auth_timeout: Duration,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            auth_timeout: Duration::from_secs(30),
        }
    }
}

impl SessionManagerConfig {
    pub fn with_auth_timeout(auth_timeout: Duration) -> Self {
        Self { auth_timeout }
    }
}

/// Obtains, refreshes and validates CRM tokens for one vendor
///
/// Failures are reported immediately; no operation retries.
#[async_trait]
pub trait CrmSessionManager: Send + Sync {
    /// Vendor this manager speaks to
    fn vendor(&self) -> Vendor;

    /// Authenticates the cached record for `crm_user_id` and stores the
    /// issued token
    async fn login(&self, crm_user_id: &CrmUserId, crm_password: &str) -> Result<(), CadError>;

    /// Re-authenticates the cached record for `crm_user_id`
    async fn reset(&self, crm_user_id: &CrmUserId, crm_password: &str) -> Result<(), CadError>;

    /// Obtains a fresh token for the cached record, re-admits it, and
    /// returns the updated record
    async fn get_session_info(&self, crm_user_id: &CrmUserId) -> Result<CrmUser, CadError>;
}

/// Hands business object services a record carrying a usable token
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn valid_session(&self, crm_user_id: &CrmUserId) -> Result<CrmUser, CadError>;
}

/// Recovers the record for `id`; a missing record means the caller never
/// supplied credentials
pub(crate) async fn recover_user(cache: &SessionCache, id: &CrmUserId) -> Result<CrmUser, CadError> {
    cache
        .recover(id)
        .await
        .ok_or_else(|| CadError::session_not_found(id))
}
