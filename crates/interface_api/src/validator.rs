//! Request validation
//!
//! Every object route passes through [`RequestValidator::validate_request_object`]
//! before a service is selected. Validation fails fast: nothing is cached and
//! no vendor is contacted for a request missing its caller id, object type,
//! or a required body.

use axum::http::HeaderMap;
use percent_encoding::percent_decode_str;
use tracing::debug;
use validator::Validate;

use core_kernel::{CadError, CrmUserId};
use domain_object::{resolve_vendor, ObjectCommand};
use domain_session::{CrmUser, SessionCache};

pub const CRM_USER_ID: &str = "crmUserId";
pub const CRM_PASSWORD: &str = "crmPassword";
pub const CRM_SERVICE_URL: &str = "crmServiceURL";
pub const CRM_SERVICE_PROTOCOL: &str = "crmServiceProtocol";
pub const CRM_TYPE: &str = "crmType";
pub const EXT_TRANS_ID: &str = "extTransId";

/// Caller identity and credentials as sent in request headers
#[derive(Debug, Clone, Default, Validate)]
pub struct CallerHeaders {
    #[validate(length(max = 256))]
    pub crm_user_id: Option<String>,
    pub crm_password: Option<String>,
    #[validate(length(min = 1, max = 512))]
    pub crm_service_url: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub crm_service_protocol: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub crm_type: Option<String>,
    #[validate(length(max = 128))]
    pub ext_trans_id: Option<String>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}

impl CallerHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            crm_user_id: header(headers, CRM_USER_ID),
            crm_password: header(headers, CRM_PASSWORD),
            crm_service_url: header(headers, CRM_SERVICE_URL),
            crm_service_protocol: header(headers, CRM_SERVICE_PROTOCOL),
            crm_type: header(headers, CRM_TYPE),
            ext_trans_id: header(headers, EXT_TRANS_ID),
        }
    }

    /// Credential record built from the headers; only a request carrying a
    /// password presents credentials
    fn presented_user(&self, id: &CrmUserId) -> Option<CrmUser> {
        let password = self.crm_password.clone()?;
        Some(CrmUser {
            id: id.clone(),
            crm_user_id: Some(id.as_str().to_string()),
            crm_password: Some(password),
            crm_service_url: self.crm_service_url.clone(),
            crm_service_protocol: self.crm_service_protocol.clone(),
            crm_type: self.crm_type.clone(),
            token: None,
            ext_trans_id: self.ext_trans_id.clone(),
        })
    }
}

/// Decodes a URL path parameter the way HTML form encoding does: `+` is a
/// space and `%XX` is a byte
pub fn decode_request_param(raw: &str) -> Result<String, CadError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| CadError::validation(format!("parameter '{raw}' is not valid UTF-8 once decoded")))
}

#[derive(Debug, Clone)]
pub struct RequestValidator {
    cache: SessionCache,
}

impl RequestValidator {
    pub fn new(cache: SessionCache) -> Self {
        Self { cache }
    }

    /// Validates the request, seeds the session cache from the caller's
    /// headers and resolves the vendor into `command.vendor`
    pub async fn validate_request_object(
        &self,
        command: &mut ObjectCommand,
        caller: &CallerHeaders,
        object_type: &str,
        body_required: bool,
    ) -> Result<(), CadError> {
        caller
            .validate()
            .map_err(|errors| CadError::validation(errors.to_string()))?;

        let object_type = decode_request_param(object_type)?;
        if object_type.trim().is_empty() {
            return Err(CadError::validation("object type is required"));
        }

        let id = caller
            .crm_user_id
            .as_deref()
            .map(CrmUserId::new)
            .filter(|id| !id.is_blank())
            .ok_or_else(|| CadError::validation(format!("{CRM_USER_ID} header is required")))?;

        if body_required && command.objects.is_empty() {
            return Err(CadError::validation("request body with at least one object is required"));
        }

        command.object_type = object_type;
        command.crm_user_id = id.clone();
        if command.ext_trans_id.is_none() {
            command.ext_trans_id = caller.ext_trans_id.clone();
        }

        let record = self.seed_cache(&id, caller).await?;
        let routing_key = record
            .crm_type
            .ok_or_else(|| CadError::routing(format!("{id} (no {CRM_TYPE})")))?;
        command.vendor = Some(resolve_vendor(&routing_key)?);

        debug!(caller = %id, object_type = %command.object_type, vendor = ?command.vendor, "request validated");
        Ok(())
    }

    /// Returns the record the request will run with
    ///
    /// Presented credentials are admitted when nothing is cached, and replace
    /// the cached record (dropping its token) when they differ from it.
    async fn seed_cache(&self, id: &CrmUserId, caller: &CallerHeaders) -> Result<CrmUser, CadError> {
        let _guard = self.cache.lock_key(id).await;
        let cached = self.cache.recover(id).await;

        match (cached, caller.presented_user(id)) {
            (None, None) => Err(CadError::session_not_found(id)),
            (None, Some(presented)) => {
                let admitted = self.cache.admit_if_absent(id.clone(), presented.clone()).await;
                debug!(caller = %id, admitted, "seeding session cache");
                Ok(presented)
            }
            (Some(cached), Some(presented)) if !cached.same_credentials(&presented) => {
                debug!(caller = %id, "credentials changed, replacing cached session");
                self.cache.admit(id.clone(), presented.clone()).await;
                Ok(presented)
            }
            (Some(cached), _) => Ok(cached),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderName;
    use core_kernel::Vendor;
    use domain_object::CrmObject;
    use domain_session::SecurityToken;

    fn caller(id: &str) -> CallerHeaders {
        CallerHeaders {
            crm_user_id: Some(id.to_string()),
            crm_password: Some("pw".to_string()),
            crm_service_url: Some("crm.example.com".to_string()),
            crm_service_protocol: Some("https".to_string()),
            crm_type: Some("ZH".to_string()),
            ext_trans_id: Some("EXT-1".to_string()),
        }
    }

    #[test]
    fn test_decode_request_param() {
        assert_eq!(decode_request_param("name%3DAcme+Corp").unwrap(), "name=Acme Corp");
        assert_eq!(decode_request_param("a%2Bb").unwrap(), "a+b");
        assert_eq!(decode_request_param("plain").unwrap(), "plain");
        assert!(matches!(decode_request_param("%FF%FE"), Err(CadError::Validation { .. })));
    }

    #[test]
    fn test_headers_are_read_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_bytes(b"CRMUSERID").unwrap(), "tenant-1".parse().unwrap());
        headers.insert(HeaderName::from_bytes(b"crmtype").unwrap(), "MS".parse().unwrap());

        let caller = CallerHeaders::from_headers(&headers);
        assert_eq!(caller.crm_user_id.as_deref(), Some("tenant-1"));
        assert_eq!(caller.crm_type.as_deref(), Some("MS"));
        assert!(caller.crm_password.is_none());
    }

    #[tokio::test]
    async fn test_missing_caller_id_fails_before_caching() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let mut command = ObjectCommand::new("", "");
        let caller = CallerHeaders {
            crm_user_id: None,
            ..caller("x")
        };

        let result = validator.validate_request_object(&mut command, &caller, "Contact", false).await;

        assert!(matches!(result, Err(CadError::Validation { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_caller_id_fails_before_caching() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let mut command = ObjectCommand::new("", "");

        let result = validator
            .validate_request_object(&mut command, &caller("   "), "Contact", false)
            .await;

        assert!(matches!(result, Err(CadError::Validation { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_body_fails_before_caching() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let mut command = ObjectCommand::new("", "");

        let result = validator
            .validate_request_object(&mut command, &caller("tenant-1"), "Contact", true)
            .await;

        assert!(matches!(result, Err(CadError::Validation { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_first_request_seeds_cache_and_resolves_vendor() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let mut command = ObjectCommand::new("", "").with_objects(vec![CrmObject::new()]);

        validator
            .validate_request_object(&mut command, &caller("tenant-1"), "Sales+Order", true)
            .await
            .unwrap();

        assert_eq!(command.object_type, "Sales Order");
        assert_eq!(command.vendor, Some(Vendor::Zh));
        assert_eq!(command.ext_trans_id.as_deref(), Some("EXT-1"));
        assert!(cache.recover(&"tenant-1".into()).await.is_some());
    }

    #[tokio::test]
    async fn test_same_credentials_keep_live_token() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let id = CrmUserId::new("tenant-1");
        let live = caller("tenant-1")
            .presented_user(&id)
            .unwrap()
            .with_token(SecurityToken::Session("LIVE".into()));
        cache.admit(id.clone(), live).await;

        let mut command = ObjectCommand::new("", "");
        validator
            .validate_request_object(&mut command, &caller("tenant-1"), "Contact", false)
            .await
            .unwrap();

        assert!(cache.recover(&id).await.unwrap().has_token());
    }

    #[tokio::test]
    async fn test_changed_credentials_drop_token() {
        let cache = SessionCache::new();
        let validator = RequestValidator::new(cache.clone());
        let id = CrmUserId::new("tenant-1");
        let live = caller("tenant-1")
            .presented_user(&id)
            .unwrap()
            .with_token(SecurityToken::Session("LIVE".into()));
        cache.admit(id.clone(), live).await;

        let rotated = CallerHeaders {
            crm_password: Some("rotated".into()),
            ..caller("tenant-1")
        };
        let mut command = ObjectCommand::new("", "");
        validator
            .validate_request_object(&mut command, &rotated, "Contact", false)
            .await
            .unwrap();

        let record = cache.recover(&id).await.unwrap();
        assert!(!record.has_token());
        assert_eq!(record.crm_password.as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn test_unknown_caller_without_credentials() {
        let validator = RequestValidator::new(SessionCache::new());
        let anonymous = CallerHeaders {
            crm_user_id: Some("ghost".into()),
            ..CallerHeaders::default()
        };
        let mut command = ObjectCommand::new("", "");

        let result = validator
            .validate_request_object(&mut command, &anonymous, "Contact", false)
            .await;

        assert!(matches!(result, Err(CadError::SessionNotFound { .. })));
    }

    #[tokio::test]
    async fn test_unknown_crm_type_is_routing_error() {
        let validator = RequestValidator::new(SessionCache::new());
        let oracle = CallerHeaders {
            crm_type: Some("ORACLE".into()),
            ..caller("tenant-1")
        };
        let mut command = ObjectCommand::new("", "");

        let result = validator.validate_request_object(&mut command, &oracle, "Contact", false).await;

        assert!(matches!(result, Err(CadError::Routing { .. })));
    }
}
