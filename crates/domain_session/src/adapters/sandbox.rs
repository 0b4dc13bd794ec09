//! Sandbox auth endpoints
//!
//! Issue a fresh token per call to any caller that presents both a login and
//! a password. A blank login or password gets no token, which the session
//! managers report as an authentication failure.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{CadError, DomainPort};

use crate::ports::{Office365AuthPort, ZhAuthPort};
use crate::user::CrmUser;

fn present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[derive(Debug, Default)]
pub struct SandboxZhAuthPort {
    issued: AtomicU64,
}

impl SandboxZhAuthPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for SandboxZhAuthPort {}

#[async_trait]
impl ZhAuthPort for SandboxZhAuthPort {
    async fn session_id(
        &self,
        crm_user_id: &str,
        crm_password: &str,
        service_url: &str,
        _service_protocol: &str,
    ) -> Result<Option<String>, CadError> {
        if !present(Some(crm_user_id)) || !present(Some(crm_password)) {
            return Ok(None);
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(service_url, n, "sandbox ZH session issued");
        Ok(Some(format!("ZH-SANDBOX-{n:08}")))
    }
}

#[derive(Debug, Default)]
pub struct SandboxOffice365AuthPort {
    issued: AtomicU64,
}

impl SandboxOffice365AuthPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for SandboxOffice365AuthPort {}

#[async_trait]
impl Office365AuthPort for SandboxOffice365AuthPort {
    async fn crm_auth_token(&self, user: &CrmUser) -> Result<Option<Vec<String>>, CadError> {
        if !present(user.crm_user_id.as_deref()) || !present(user.crm_password.as_deref()) {
            return Ok(None);
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(user = %user.id, n, "sandbox Office365 token issued");
        Ok(Some(vec![
            format!("MS-SANDBOX-TOKEN-{n:08}"),
            format!("MS-SANDBOX-KEY-{n:08}"),
        ]))
    }
}
