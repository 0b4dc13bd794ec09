//! MS-CRM Office365 session manager
//!
//! Office365 uses a credential grant that yields a composite security
//! token. `login`, `reset` and `get_session_info` always fetch a new token;
//! [`Office365CrmSessionManager::get_record_with_refreshed_session`] only
//! fetches one when the cached record has none.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use core_kernel::{with_timeout, CadError, CrmUserId, Vendor};

use crate::cache::SessionCache;
use crate::manager::{recover_user, CrmSessionManager, SessionManagerConfig, SessionProvider};
use crate::ports::Office365AuthPort;
use crate::user::{CrmUser, SecurityToken};

pub struct Office365CrmSessionManager {
    auth: Arc<dyn Office365AuthPort>,
    cache: SessionCache,
    config: SessionManagerConfig,
}

impl Office365CrmSessionManager {
    pub fn new(
        auth: Arc<dyn Office365AuthPort>,
        cache: SessionCache,
        config: SessionManagerConfig,
    ) -> Self {
        Self { auth, cache, config }
    }

    /// Returns the cached record, fetching a token first only if the
    /// record has none
    ///
    /// Concurrent calls for the same key are serialized, so a burst of
    /// requests from one tenant issues a single auth call.
    pub async fn get_record_with_refreshed_session(&self, id: &CrmUserId) -> Result<CrmUser, CadError> {
        let _guard = self.cache.lock_key(id).await;

        let user = recover_user(&self.cache, id).await?;
        user.service_endpoint()?;

        if user.has_token() {
            return Ok(user);
        }

        debug!(key = %id, "no MS-CRM token cached; fetching session information");
        self.refresh(id, user).await
    }

    async fn authenticate(&self, id: &CrmUserId) -> Result<CrmUser, CadError> {
        let _guard = self.cache.lock_key(id).await;
        let user = recover_user(&self.cache, id).await?;
        user.service_endpoint()?;
        self.refresh(id, user).await
    }

    /// Fetches a token for `user` and re-admits it
    ///
    /// Callers hold the key lock. The cache is left untouched when no token
    /// is issued or when the cached credentials changed meanwhile.
    async fn refresh(&self, id: &CrmUserId, mut user: CrmUser) -> Result<CrmUser, CadError> {
        let token = with_timeout(
            "MS-CRM auth token request",
            self.config.auth_timeout,
            self.auth.crm_auth_token(&user),
        )
        .await?;

        match token {
            Some(parts) => {
                user.token = Some(SecurityToken::Composite(parts));
                if !self.cache.admit_if_unchanged(id.clone(), user.clone()).await {
                    debug!(key = %id, "credentials replaced during MS-CRM auth; keeping cached record");
                }
                Ok(user)
            }
            None => {
                warn!(key = %id, "MS-CRM issued no security token");
                Err(CadError::Authentication {
                    vendor: Vendor::MsOffice365,
                })
            }
        }
    }
}

#[async_trait]
impl CrmSessionManager for Office365CrmSessionManager {
    fn vendor(&self) -> Vendor {
        Vendor::MsOffice365
    }

    async fn login(&self, crm_user_id: &CrmUserId, _crm_password: &str) -> Result<(), CadError> {
        debug!(key = %crm_user_id, "MS-CRM login");
        self.authenticate(crm_user_id).await.map(|_| ())
    }

    async fn reset(&self, crm_user_id: &CrmUserId, crm_password: &str) -> Result<(), CadError> {
        debug!(key = %crm_user_id, "MS-CRM reset");
        self.login(crm_user_id, crm_password).await
    }

    async fn get_session_info(&self, crm_user_id: &CrmUserId) -> Result<CrmUser, CadError> {
        debug!(key = %crm_user_id, "getting MS-CRM session info");
        self.authenticate(crm_user_id).await
    }
}

#[async_trait]
impl SessionProvider for Office365CrmSessionManager {
    async fn valid_session(&self, crm_user_id: &CrmUserId) -> Result<CrmUser, CadError> {
        self.get_record_with_refreshed_session(crm_user_id).await
    }
}
