//! Credential/session record
//!
//! A [`CrmUser`] holds one caller's CRM credentials and, once a vendor has
//! issued one, a live [`SecurityToken`]. Records only ever live in process
//! memory; `Debug` output redacts the secrets.

use std::fmt;

use core_kernel::{CadError, CrmUserId};

/// Vendor-issued proof of an authenticated CRM context
#[derive(Clone, PartialEq, Eq)]
pub enum SecurityToken {
    /// A single session id (ZH)
    Session(String),
    /// A composite token (MS-CRM Office365 issues several parts)
    Composite(Vec<String>),
}

impl SecurityToken {
    pub fn as_composite(&self) -> Option<&[String]> {
        match self {
            SecurityToken::Session(_) => None,
            SecurityToken::Composite(parts) => Some(parts),
        }
    }
}

impl fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityToken::Session(_) => f.write_str("Session(***)"),
            SecurityToken::Composite(parts) => write!(f, "Composite({} parts)", parts.len()),
        }
    }
}

/// A caller's CRM credentials plus the token obtained with them
#[derive(Clone, PartialEq, Eq)]
pub struct CrmUser {
    /// Cache key
    pub id: CrmUserId,
    /// Login name at the CRM
    pub crm_user_id: Option<String>,
    pub crm_password: Option<String>,
    pub crm_service_url: Option<String>,
    pub crm_service_protocol: Option<String>,
    /// Vendor routing key as supplied by the caller (`crmType`)
    pub crm_type: Option<String>,
    pub token: Option<SecurityToken>,
    pub ext_trans_id: Option<String>,
}

impl CrmUser {
    /// Creates an empty record for the given caller
    pub fn new(id: impl Into<CrmUserId>) -> Self {
        Self {
            id: id.into(),
            crm_user_id: None,
            crm_password: None,
            crm_service_url: None,
            crm_service_protocol: None,
            crm_type: None,
            token: None,
            ext_trans_id: None,
        }
    }

    pub fn with_credentials(mut self, user_id: impl Into<String>, password: impl Into<String>) -> Self {
        self.crm_user_id = Some(user_id.into());
        self.crm_password = Some(password.into());
        self
    }

    pub fn with_service(mut self, url: impl Into<String>, protocol: impl Into<String>) -> Self {
        self.crm_service_url = Some(url.into());
        self.crm_service_protocol = Some(protocol.into());
        self
    }

    pub fn with_crm_type(mut self, crm_type: impl Into<String>) -> Self {
        self.crm_type = Some(crm_type.into());
        self
    }

    pub fn with_token(mut self, token: SecurityToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns the service URL and protocol, failing with a configuration
    /// error when either is absent
    ///
    /// Must pass before any token acquisition is attempted.
    pub fn service_endpoint(&self) -> Result<(&str, &str), CadError> {
        let url = self
            .crm_service_url
            .as_deref()
            .ok_or_else(|| CadError::configuration("CRM service URL"))?;
        let protocol = self
            .crm_service_protocol
            .as_deref()
            .ok_or_else(|| CadError::configuration("CRM service Protocol"))?;
        Ok((url, protocol))
    }

    /// True when both records carry the same credentials and service
    /// endpoint, ignoring tokens and transaction ids
    pub fn same_credentials(&self, other: &CrmUser) -> bool {
        self.crm_user_id == other.crm_user_id
            && self.crm_password == other.crm_password
            && self.crm_service_url == other.crm_service_url
            && self.crm_service_protocol == other.crm_service_protocol
            && self.crm_type == other.crm_type
    }
}

impl fmt::Debug for CrmUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmUser")
            .field("id", &self.id)
            .field("crm_user_id", &self.crm_user_id)
            .field("crm_password", &self.crm_password.as_ref().map(|_| "***"))
            .field("crm_service_url", &self.crm_service_url)
            .field("crm_service_protocol", &self.crm_service_protocol)
            .field("crm_type", &self.crm_type)
            .field("token", &self.token)
            .field("ext_trans_id", &self.ext_trans_id)
            .finish()
    }
}
