//! CRM Session Lifecycle Domain
//!
//! This crate owns everything about caller credentials and vendor tokens:
//!
//! - **CrmUser**: a caller's credentials plus the live token, in memory only
//! - **SessionCache**: the shared, explicitly constructed cache of records
//! - **CrmSessionManager**: the per-vendor capability set (login, reset,
//!   session info), implemented by [`ZhCrmSessionManager`] and
//!   [`Office365CrmSessionManager`]
//! - **Auth ports**: the vendor auth endpoints the managers call, with
//!   sandbox adapters in [`adapters`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_session::{SessionCache, ZhCrmSessionManager, SessionManagerConfig, CrmSessionManager};
//!
//! let cache = SessionCache::new();
//! let manager = ZhCrmSessionManager::new(auth_port, cache.clone(), SessionManagerConfig::default());
//! let user = manager.get_session_info(&"tenant-1".into()).await?;
//! ```

pub mod adapters;
pub mod cache;
pub mod manager;
pub mod office365;
pub mod ports;
pub mod user;
pub mod zh;

pub use adapters::{SandboxOffice365AuthPort, SandboxZhAuthPort};
pub use cache::SessionCache;
pub use manager::{CrmSessionManager, SessionManagerConfig, SessionProvider};
pub use office365::Office365CrmSessionManager;
pub use ports::{Office365AuthPort, ZhAuthPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockAuthResponse, MockOffice365AuthPort, MockZhAuthPort};
pub use user::{CrmUser, SecurityToken};
pub use zh::ZhCrmSessionManager;
