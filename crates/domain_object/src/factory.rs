//! Service factory
//!
//! Selects the business object service that executes a command. Selection
//! is two-step, mirroring how vendors are plugged in:
//!
//! 1. [`ServiceFactory::service_factory`] resolves the vendor for the
//!    command and returns that vendor's [`VendorServiceFactory`]
//! 2. [`VendorServiceFactory::service`] hands out the concrete service
//!
//! The vendor comes from the command when the validator already resolved
//! it, otherwise from the `crmType` on the caller's cached record. An
//! unknown or unregistered vendor is a routing error; there is no default
//! vendor.
//!
//! ```rust,ignore
//! let factory = ServiceFactory::new(cache.clone())
//!     .register(Arc::new(SingleServiceFactory::new(Arc::new(zh_service))))
//!     .register(Arc::new(SingleServiceFactory::new(Arc::new(ms_service))));
//!
//! let service = factory.service_factory(&command).await?.service(&command);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use core_kernel::{CadError, CrmUserId, Vendor};
use domain_session::SessionCache;

use crate::command::ObjectCommand;
use crate::service::BusinessObjectService;

/// Maps a caller-supplied routing key onto a vendor
pub fn resolve_vendor(routing_key: &str) -> Result<Vendor, CadError> {
    routing_key.parse()
}

/// Produces the object service for one vendor
pub trait VendorServiceFactory: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn service(&self, command: &ObjectCommand) -> Arc<dyn BusinessObjectService>;
}

/// Vendor factory that serves every command with the same service
pub struct SingleServiceFactory {
    service: Arc<dyn BusinessObjectService>,
}

impl SingleServiceFactory {
    pub fn new(service: Arc<dyn BusinessObjectService>) -> Self {
        Self { service }
    }
}

impl VendorServiceFactory for SingleServiceFactory {
    fn vendor(&self) -> Vendor {
        self.service.vendor()
    }

    fn service(&self, _command: &ObjectCommand) -> Arc<dyn BusinessObjectService> {
        self.service.clone()
    }
}

/// Registry of vendor factories
#[derive(Clone)]
pub struct ServiceFactory {
    cache: SessionCache,
    factories: HashMap<Vendor, Arc<dyn VendorServiceFactory>>,
}

impl ServiceFactory {
    pub fn new(cache: SessionCache) -> Self {
        Self {
            cache,
            factories: HashMap::new(),
        }
    }

    /// Registers a vendor factory, replacing any earlier one for the same
    /// vendor
    pub fn register(mut self, factory: Arc<dyn VendorServiceFactory>) -> Self {
        self.factories.insert(factory.vendor(), factory);
        self
    }

    /// Vendors with a registered factory
    pub fn vendors(&self) -> Vec<Vendor> {
        let mut vendors: Vec<_> = self.factories.keys().copied().collect();
        vendors.sort_by_key(|vendor| vendor.as_str());
        vendors
    }

    pub async fn service_factory(
        &self,
        command: &ObjectCommand,
    ) -> Result<Arc<dyn VendorServiceFactory>, CadError> {
        let vendor = match command.vendor {
            Some(vendor) => vendor,
            None => self.vendor_for_caller(&command.crm_user_id).await?,
        };

        self.factories
            .get(&vendor)
            .cloned()
            .ok_or_else(|| CadError::routing(vendor.as_str()))
    }

    /// Shorthand for `service_factory(command)?.service(command)`
    pub async fn service(&self, command: &ObjectCommand) -> Result<Arc<dyn BusinessObjectService>, CadError> {
        Ok(self.service_factory(command).await?.service(command))
    }

    async fn vendor_for_caller(&self, id: &CrmUserId) -> Result<Vendor, CadError> {
        let user = self
            .cache
            .recover(id)
            .await
            .ok_or_else(|| CadError::session_not_found(id))?;
        let routing_key = user
            .crm_type
            .ok_or_else(|| CadError::routing(format!("{id} (no crmType)")))?;
        resolve_vendor(&routing_key)
    }
}
