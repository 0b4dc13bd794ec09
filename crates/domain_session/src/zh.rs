//! ZH session manager
//!
//! ZH exposes a plain token endpoint: credentials plus service URL and
//! protocol in, session id out. Only `get_session_info` is supported; each
//! call asks the endpoint for a new session id.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use core_kernel::{with_timeout, CadError, CrmUserId, Vendor};

use crate::cache::SessionCache;
use crate::manager::{recover_user, CrmSessionManager, SessionManagerConfig, SessionProvider};
use crate::ports::ZhAuthPort;
use crate::user::{CrmUser, SecurityToken};

pub struct ZhCrmSessionManager {
    auth: Arc<dyn ZhAuthPort>,
    cache: SessionCache,
    config: SessionManagerConfig,
}

impl ZhCrmSessionManager {
    pub fn new(auth: Arc<dyn ZhAuthPort>, cache: SessionCache, config: SessionManagerConfig) -> Self {
        Self { auth, cache, config }
    }
}

#[async_trait]
impl CrmSessionManager for ZhCrmSessionManager {
    fn vendor(&self) -> Vendor {
        Vendor::Zh
    }

    async fn login(&self, _crm_user_id: &CrmUserId, _crm_password: &str) -> Result<(), CadError> {
        Err(CadError::unsupported("login"))
    }

    async fn reset(&self, _crm_user_id: &CrmUserId, _crm_password: &str) -> Result<(), CadError> {
        Err(CadError::unsupported("reset"))
    }

    async fn get_session_info(&self, id: &CrmUserId) -> Result<CrmUser, CadError> {
        debug!(key = %id, "getting ZH session info");

        let _guard = self.cache.lock_key(id).await;
        let mut user = recover_user(&self.cache, id).await?;
        let (url, protocol) = user.service_endpoint()?;

        let session_id = with_timeout(
            "ZH session id request",
            self.config.auth_timeout,
            self.auth.session_id(
                user.crm_user_id.as_deref().unwrap_or_default(),
                user.crm_password.as_deref().unwrap_or_default(),
                url,
                protocol,
            ),
        )
        .await?;

        match session_id {
            Some(session_id) => {
                user.token = Some(SecurityToken::Session(session_id));
                if !self.cache.admit_if_unchanged(id.clone(), user.clone()).await {
                    debug!(key = %id, "credentials replaced during ZH auth; keeping cached record");
                }
                Ok(user)
            }
            None => {
                warn!(key = %id, "ZH issued no session id");
                Err(CadError::Authentication { vendor: Vendor::Zh })
            }
        }
    }
}

#[async_trait]
impl SessionProvider for ZhCrmSessionManager {
    async fn valid_session(&self, crm_user_id: &CrmUserId) -> Result<CrmUser, CadError> {
        self.get_session_info(crm_user_id).await
    }
}
