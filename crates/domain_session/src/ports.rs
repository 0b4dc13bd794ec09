//! Vendor authentication ports
//!
//! One trait per vendor auth endpoint. `Ok(None)` means the endpoint
//! answered but issued no token (bad credentials); `Err` is reserved for
//! transport or vendor faults.

use async_trait::async_trait;

use core_kernel::{CadError, DomainPort};

use crate::user::CrmUser;

/// ZH token endpoint: exchanges credentials for a session id
#[async_trait]
pub trait ZhAuthPort: DomainPort {
    async fn session_id(
        &self,
        crm_user_id: &str,
        crm_password: &str,
        service_url: &str,
        service_protocol: &str,
    ) -> Result<Option<String>, CadError>;
}

/// MS-CRM Office365 credential grant: exchanges a user record for a
/// composite security token
#[async_trait]
pub trait Office365AuthPort: DomainPort {
    async fn crm_auth_token(&self, user: &CrmUser) -> Result<Option<Vec<String>>, CadError>;
}

/// Scripted auth endpoints for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use core_kernel::Vendor;

    /// How a mock endpoint answers
    #[derive(Debug, Clone)]
    pub enum MockAuthResponse {
        /// Always issue this token
        Issue(String),
        /// Issue `<prefix><n>` where n counts calls from 1
        Sequence(String),
        /// Answer without a token
        Reject,
        /// Fail the call
        Fail(String),
    }

    impl MockAuthResponse {
        fn answer(&self, vendor: Vendor, call: usize) -> Result<Option<String>, CadError> {
            match self {
                MockAuthResponse::Issue(token) => Ok(Some(token.clone())),
                MockAuthResponse::Sequence(prefix) => Ok(Some(format!("{prefix}{call}"))),
                MockAuthResponse::Reject => Ok(None),
                MockAuthResponse::Fail(message) => Err(CadError::vendor(vendor, message.clone())),
            }
        }
    }

    #[derive(Debug)]
    struct MockEndpoint {
        response: MockAuthResponse,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockEndpoint {
        fn new(response: MockAuthResponse) -> Self {
            Self {
                response,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        async fn call(&self, vendor: Vendor) -> Result<Option<String>, CadError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.answer(vendor, call)
        }
    }

    /// Mock ZH token endpoint recording every call
    #[derive(Debug)]
    pub struct MockZhAuthPort {
        endpoint: MockEndpoint,
        last_request: Mutex<Option<[String; 4]>>,
    }

    impl MockZhAuthPort {
        pub fn new(response: MockAuthResponse) -> Self {
            Self {
                endpoint: MockEndpoint::new(response),
                last_request: Mutex::new(None),
            }
        }

        /// Issues a fresh session id on every call
        pub fn accepting() -> Self {
            Self::new(MockAuthResponse::Sequence("ZH-SESSION-".to_string()))
        }

        /// Sleeps before answering, to widen race windows or trip timeouts
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.endpoint.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.endpoint.calls.load(Ordering::SeqCst)
        }

        /// `[user id, password, url, protocol]` of the latest call
        pub fn last_request(&self) -> Option<[String; 4]> {
            self.last_request.lock().ok().and_then(|guard| guard.clone())
        }
    }

    impl DomainPort for MockZhAuthPort {}

    #[async_trait]
    impl ZhAuthPort for MockZhAuthPort {
        async fn session_id(
            &self,
            crm_user_id: &str,
            crm_password: &str,
            service_url: &str,
            service_protocol: &str,
        ) -> Result<Option<String>, CadError> {
            if let Ok(mut last) = self.last_request.lock() {
                *last = Some([
                    crm_user_id.to_string(),
                    crm_password.to_string(),
                    service_url.to_string(),
                    service_protocol.to_string(),
                ]);
            }
            self.endpoint.call(Vendor::Zh).await
        }
    }

    /// Mock Office365 grant endpoint; tokens come back as two parts, the
    /// issued value and a key identifier
    #[derive(Debug)]
    pub struct MockOffice365AuthPort {
        endpoint: MockEndpoint,
    }

    impl MockOffice365AuthPort {
        pub fn new(response: MockAuthResponse) -> Self {
            Self {
                endpoint: MockEndpoint::new(response),
            }
        }

        pub fn accepting() -> Self {
            Self::new(MockAuthResponse::Sequence("MS-TOKEN-".to_string()))
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.endpoint.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.endpoint.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockOffice365AuthPort {}

    #[async_trait]
    impl Office365AuthPort for MockOffice365AuthPort {
        async fn crm_auth_token(&self, user: &CrmUser) -> Result<Option<Vec<String>>, CadError> {
            let token = self.endpoint.call(Vendor::MsOffice365).await?;
            Ok(token.map(|value| {
                let key_id = format!("{}-key", user.id);
                vec![value, key_id]
            }))
        }
    }
}
