//! HTTP API Layer
//!
//! This crate exposes the gateway over HTTP using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: generic object routes under `/cad/object` plus health
//! - **Validator**: header extraction, request checks and cache seeding
//! - **Middleware**: per-request transaction id and transaction logging
//! - **Error Handling**: `CadError` kinds mapped onto HTTP statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::GatewayConfig};
//!
//! let state = AppState::from_config(GatewayConfig::default())?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod validator;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{CadError, Vendor};
use domain_object::{CrmObjectService, SandboxCrmObjectPort, ServiceFactory, SingleServiceFactory};
use domain_session::{
    Office365CrmSessionManager, SandboxOffice365AuthPort, SandboxZhAuthPort, SessionCache, ZhCrmSessionManager,
};

use crate::config::{AdapterSource, GatewayConfig};
use crate::handlers::{health, object};
use crate::middleware::transaction_middleware;
use crate::validator::RequestValidator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub cache: SessionCache,
    pub validator: RequestValidator,
    pub factory: ServiceFactory,
}

impl AppState {
    /// Assembles the state around an existing cache and service factory
    pub fn new(config: GatewayConfig, cache: SessionCache, factory: ServiceFactory) -> Self {
        Self {
            validator: RequestValidator::new(cache.clone()),
            config,
            cache,
            factory,
        }
    }

    /// Wires the vendor adapters named by `config.adapter_source`
    pub fn from_config(config: GatewayConfig) -> Result<Self, CadError> {
        config.validate()?;
        match config.adapter_source {
            AdapterSource::Sandbox => Ok(Self::sandbox(config)),
        }
    }

    /// ZH and Office365 backed by in-memory auth endpoints and object stores
    pub fn sandbox(config: GatewayConfig) -> Self {
        let cache = SessionCache::new();
        let manager_config = config.session_manager_config();

        let zh = CrmObjectService::zh(
            Arc::new(ZhCrmSessionManager::new(
                Arc::new(SandboxZhAuthPort::new()),
                cache.clone(),
                manager_config.clone(),
            )),
            Arc::new(SandboxCrmObjectPort::new(Vendor::Zh)),
        );
        let office365 = CrmObjectService::office365(
            Arc::new(Office365CrmSessionManager::new(
                Arc::new(SandboxOffice365AuthPort::new()),
                cache.clone(),
                manager_config,
            )),
            Arc::new(SandboxCrmObjectPort::new(Vendor::MsOffice365)),
        );

        let factory = ServiceFactory::new(cache.clone())
            .register(Arc::new(SingleServiceFactory::new(Arc::new(zh))))
            .register(Arc::new(SingleServiceFactory::new(Arc::new(office365))));

        Self::new(config, cache, factory)
    }
}

/// Creates the gateway router
pub fn create_router(state: AppState) -> Router {
    let object_routes = Router::new()
        .route("/:object_type", get(object::get_objects).post(object::create_object).put(object::update_object))
        .route(
            "/:object_type/count",
            get(object::get_objects_count).delete(object::delete_object_with_count_id),
        )
        .route("/:object_type/query/:query", get(object::get_objects_by_query))
        .route("/:object_type/query/:query/count", get(object::get_objects_count_by_query))
        .route("/:object_type/query/:query/select/:select", get(object::get_objects_by_query_select))
        .route(
            "/:object_type/query/:query/select/:select/order/:order",
            get(object::get_objects_by_query_select_order),
        )
        .route("/:object_type/:id", delete(object::delete_object))
        .layer(axum_middleware::from_fn(transaction_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/cad/object", object_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
