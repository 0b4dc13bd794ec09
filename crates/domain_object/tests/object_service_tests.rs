//! Object service and factory integration tests
//!
//! These run the whole chain in memory: session cache, vendor session
//! manager backed by a mock auth port, object service and sandbox CRM.

use std::sync::Arc;

use core_kernel::{CadError, ResponseCode, Vendor};
use domain_object::{
    BusinessObjectService, CrmObject, CrmObjectService, ObjectCommand, ObjectQuery, SandboxCrmObjectPort,
    ServiceFactory, SingleServiceFactory,
};
use domain_session::{
    MockAuthResponse, MockOffice365AuthPort, MockZhAuthPort, Office365CrmSessionManager, SecurityToken,
    SessionCache, SessionManagerConfig, ZhCrmSessionManager,
};
use test_utils::{assert_cad_code, CrmUserBuilder, UserFixtures};

fn contacts() -> Vec<CrmObject> {
    vec![
        CrmObject::new()
            .with_id("c-1")
            .with_field("name", "Alice")
            .with_field("city", "Berlin"),
        CrmObject::new()
            .with_id("c-2")
            .with_field("name", "Bob")
            .with_field("city", "Paris"),
        CrmObject::new()
            .with_id("c-3")
            .with_field("name", "Carol")
            .with_field("city", "Berlin"),
    ]
}

struct ZhHarness {
    cache: SessionCache,
    auth: Arc<MockZhAuthPort>,
    port: Arc<SandboxCrmObjectPort>,
    service: CrmObjectService,
}

async fn zh_harness(response: MockAuthResponse) -> ZhHarness {
    let cache = SessionCache::new();
    let auth = Arc::new(MockZhAuthPort::new(response));
    let port = Arc::new(
        SandboxCrmObjectPort::new(Vendor::Zh)
            .with_objects("Contact", contacts())
            .await,
    );
    let manager = Arc::new(ZhCrmSessionManager::new(
        auth.clone(),
        cache.clone(),
        SessionManagerConfig::default(),
    ));
    let service = CrmObjectService::zh(manager, port.clone());
    ZhHarness {
        cache,
        auth,
        port,
        service,
    }
}

mod zh_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_objects_filters_selects_and_orders() {
        let h = zh_harness(MockAuthResponse::Issue("SESSIONID123".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let query = ObjectQuery::by_query("city=Berlin")
            .with_select("name")
            .with_order("name desc");
        let result = h
            .service
            .get_objects(ObjectCommand::new("Contact", "tenant-1"), query)
            .await
            .unwrap()
            .expect("contact type exists");

        let names: Vec<_> = result.objects.iter().filter_map(|o| o.field_text("name")).collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
        assert!(result.objects.iter().all(|o| o.field_text("city").is_none()));
        assert_eq!(h.port.last_token(), Some(SecurityToken::Session("SESSIONID123".into())));
    }

    #[tokio::test]
    async fn test_every_call_acquires_a_fresh_zh_session() {
        let h = zh_harness(MockAuthResponse::Sequence("ZH-SESSION-".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        for _ in 0..3 {
            h.service
                .get_objects_count(ObjectCommand::new("Contact", "tenant-1"), None)
                .await
                .unwrap();
        }

        assert_eq!(h.auth.calls(), 3);
        assert_eq!(h.port.calls(), 3);
    }

    #[tokio::test]
    async fn test_count_with_query() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let result = h
            .service
            .get_objects_count(ObjectCommand::new("Contact", "tenant-1"), Some("city=Berlin".into()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.count, Some(2));
    }

    #[tokio::test]
    async fn test_unknown_object_type_is_none() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let found = h
            .service
            .get_objects(ObjectCommand::new("Invoice", "tenant-1"), ObjectQuery::all())
            .await
            .unwrap();
        let counted = h
            .service
            .get_objects_count(ObjectCommand::new("Invoice", "tenant-1"), None)
            .await
            .unwrap();

        assert!(found.is_none());
        assert!(counted.is_none());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let created = h
            .service
            .create_object(
                ObjectCommand::new("Contact", "tenant-1")
                    .with_objects(vec![CrmObject::new().with_field("name", "Dave")]),
            )
            .await
            .unwrap();
        let id = created.objects[0].id.clone().expect("sandbox assigns ids");

        let updated = h
            .service
            .update_object(
                ObjectCommand::new("Contact", "tenant-1")
                    .with_objects(vec![CrmObject::new().with_id(id.clone()).with_field("city", "Rome")]),
            )
            .await
            .unwrap();
        assert_eq!(updated.objects[0].field_text("city").as_deref(), Some("Rome"));

        let command = ObjectCommand::new("Contact", "tenant-1");
        assert!(h.service.delete_object(&command, &id).await.unwrap());
        assert!(!h.service.delete_object(&command, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let result = h
            .service
            .update_object(
                ObjectCommand::new("Contact", "tenant-1")
                    .with_objects(vec![CrmObject::new().with_id("missing").with_field("city", "Rome")]),
            )
            .await;

        assert_cad_code(&result, ResponseCode::NOT_FOUND);
    }
}

mod session_failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_record_never_reaches_vendor() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;

        let result = h
            .service
            .get_objects(ObjectCommand::new("Contact", "ghost"), ObjectQuery::all())
            .await;

        assert!(matches!(result, Err(CadError::SessionNotFound { .. })));
        assert_eq!(h.auth.calls(), 0);
        assert_eq!(h.port.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_login_never_reaches_vendor() {
        let h = zh_harness(MockAuthResponse::Reject).await;
        h.cache.admit("tenant-1".into(), UserFixtures::zh_user("tenant-1")).await;

        let command = ObjectCommand::new("Contact", "tenant-1");
        let result = h.service.delete_object(&command, "c-1").await;

        assert_cad_code(&result, ResponseCode::AUTHENTICATION);
        assert_eq!(h.port.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_service_url_never_reaches_vendor() {
        let h = zh_harness(MockAuthResponse::Issue("S".into())).await;
        h.cache
            .admit("tenant-1".into(), UserFixtures::without_service_url("tenant-1"))
            .await;

        let result = h
            .service
            .get_objects_count(ObjectCommand::new("Contact", "tenant-1"), None)
            .await;

        assert_cad_code(&result, ResponseCode::CONFIGURATION);
        assert_eq!(h.auth.calls(), 0);
        assert_eq!(h.port.calls(), 0);
    }
}

mod office365_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_token_is_fetched_once_and_reused() {
        let cache = SessionCache::new();
        let auth = Arc::new(MockOffice365AuthPort::accepting());
        let port = Arc::new(
            SandboxCrmObjectPort::new(Vendor::MsOffice365)
                .with_objects("account", vec![CrmObject::new().with_id("a-1").with_field("name", "Acme")])
                .await,
        );
        let manager = Arc::new(Office365CrmSessionManager::new(
            auth.clone(),
            cache.clone(),
            SessionManagerConfig::default(),
        ));
        let service = CrmObjectService::office365(manager, port.clone());
        cache.admit("tenant-ms".into(), UserFixtures::office365_user("tenant-ms")).await;

        for _ in 0..3 {
            service
                .get_objects(ObjectCommand::new("account", "tenant-ms"), ObjectQuery::all())
                .await
                .unwrap();
        }

        assert_eq!(auth.calls(), 1);
        assert_eq!(port.calls(), 3);
        assert!(matches!(port.last_token(), Some(SecurityToken::Composite(parts)) if parts.len() == 2));
    }
}

mod factory_tests {
    use super::*;

    async fn factory(cache: &SessionCache) -> ServiceFactory {
        let zh = zh_harness(MockAuthResponse::Issue("S".into())).await;
        let ms_manager = Arc::new(Office365CrmSessionManager::new(
            Arc::new(MockOffice365AuthPort::accepting()),
            cache.clone(),
            SessionManagerConfig::default(),
        ));
        let ms = CrmObjectService::office365(ms_manager, Arc::new(SandboxCrmObjectPort::new(Vendor::MsOffice365)));

        ServiceFactory::new(cache.clone())
            .register(Arc::new(SingleServiceFactory::new(Arc::new(zh.service))))
            .register(Arc::new(SingleServiceFactory::new(Arc::new(ms))))
    }

    #[tokio::test]
    async fn test_registered_vendors() {
        let cache = SessionCache::new();
        let factory = factory(&cache).await;

        assert_eq!(factory.vendors(), vec![Vendor::MsOffice365, Vendor::Zh]);
    }

    #[tokio::test]
    async fn test_vendor_from_cached_crm_type() {
        let cache = SessionCache::new();
        let factory = factory(&cache).await;
        cache.admit("z".into(), CrmUserBuilder::new("z").crm_type("zh").build()).await;
        cache.admit("m".into(), CrmUserBuilder::new("m").crm_type("MSCRM").build()).await;

        let zh = factory.service(&ObjectCommand::new("Contact", "z")).await.unwrap();
        let ms = factory.service(&ObjectCommand::new("Contact", "m")).await.unwrap();

        assert_eq!(zh.vendor(), Vendor::Zh);
        assert_eq!(ms.vendor(), Vendor::MsOffice365);
    }

    #[tokio::test]
    async fn test_command_vendor_wins_over_cache() {
        let cache = SessionCache::new();
        let factory = factory(&cache).await;
        cache.admit("z".into(), CrmUserBuilder::new("z").crm_type("ZH").build()).await;

        let command = ObjectCommand::new("Contact", "z").with_vendor(Vendor::MsOffice365);
        let service = factory.service(&command).await.unwrap();

        assert_eq!(service.vendor(), Vendor::MsOffice365);
    }

    #[tokio::test]
    async fn test_routing_failures() {
        let cache = SessionCache::new();
        let factory = factory(&cache).await;
        cache.admit("sf".into(), CrmUserBuilder::new("sf").crm_type("SFDC").build()).await;
        cache.admit("odd".into(), CrmUserBuilder::new("odd").crm_type("ORACLE").build()).await;

        let unregistered = factory.service(&ObjectCommand::new("Contact", "sf")).await;
        let unknown = factory.service(&ObjectCommand::new("Contact", "odd")).await;
        let uncached = factory.service(&ObjectCommand::new("Contact", "nobody")).await;

        assert!(matches!(unregistered, Err(CadError::Routing { .. })));
        assert!(matches!(unknown, Err(CadError::Routing { .. })));
        assert!(matches!(uncached, Err(CadError::SessionNotFound { .. })));
    }
}
