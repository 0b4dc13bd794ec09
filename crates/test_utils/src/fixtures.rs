//! Pre-built Test Fixtures
//!
//! Ready-to-use credential records. Each fixture is keyed by the caller id
//! passed in, so tests can use several independent tenants at once.

use core_kernel::CrmUserId;
use domain_session::CrmUser;

/// Fixture for credential records
pub struct UserFixtures;

impl UserFixtures {
    /// ZH tenant with a complete service endpoint and no token
    pub fn zh_user(id: &str) -> CrmUser {
        CrmUser::new(id)
            .with_credentials("zh.agent@example.com", "zh-password")
            .with_service("crm.zh.example.com", "https")
            .with_crm_type("ZH")
    }

    /// Office365 tenant with a complete service endpoint and no token
    pub fn office365_user(id: &str) -> CrmUser {
        CrmUser::new(id)
            .with_credentials("agent@contoso.onmicrosoft.com", "ms-password")
            .with_service("contoso.crm.dynamics.com", "https")
            .with_crm_type("MS")
    }

    /// Record whose service URL was never supplied
    pub fn without_service_url(id: &str) -> CrmUser {
        let mut user = Self::zh_user(id);
        user.crm_service_url = None;
        user
    }

    /// Record whose service protocol was never supplied
    pub fn without_service_protocol(id: &str) -> CrmUser {
        let mut user = Self::zh_user(id);
        user.crm_service_protocol = None;
        user
    }
}

/// Fixture for caller identities
pub struct IdFixtures;

impl IdFixtures {
    pub fn tenant() -> CrmUserId {
        CrmUserId::new("tenant-001")
    }

    pub fn other_tenant() -> CrmUserId {
        CrmUserId::new("tenant-002")
    }
}
