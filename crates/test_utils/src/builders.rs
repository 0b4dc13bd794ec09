//! Test Data Builders
//!
//! Builder for credential records. Tests specify only the fields they care
//! about and take defaults for the rest.

use domain_session::{CrmUser, SecurityToken};

/// Builder for constructing test credential records
pub struct CrmUserBuilder {
    user: CrmUser,
}

impl CrmUserBuilder {
    /// Creates a builder with a complete ZH-style record for `id`
    pub fn new(id: &str) -> Self {
        Self {
            user: CrmUser::new(id)
                .with_credentials("user@example.com", "password")
                .with_service("crm.example.com", "https")
                .with_crm_type("ZH"),
        }
    }

    pub fn crm_type(mut self, crm_type: &str) -> Self {
        self.user.crm_type = Some(crm_type.to_string());
        self
    }

    pub fn service_url(mut self, url: Option<&str>) -> Self {
        self.user.crm_service_url = url.map(str::to_string);
        self
    }

    pub fn service_protocol(mut self, protocol: Option<&str>) -> Self {
        self.user.crm_service_protocol = protocol.map(str::to_string);
        self
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.user.token = Some(SecurityToken::Session(session_id.to_string()));
        self
    }

    pub fn composite(mut self, parts: &[&str]) -> Self {
        self.user.token = Some(SecurityToken::Composite(
            parts.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    pub fn ext_trans_id(mut self, ext_trans_id: &str) -> Self {
        self.user.ext_trans_id = Some(ext_trans_id.to_string());
        self
    }

    pub fn build(self) -> CrmUser {
        self.user
    }
}
