//! Business object services
//!
//! A [`BusinessObjectService`] performs CRUD against one vendor CRM. Every
//! operation first obtains a usable session from the vendor's session
//! manager; if that fails the vendor call is never made and the failure is
//! returned as-is.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{CadError, Vendor};
use domain_session::{CrmUser, Office365CrmSessionManager, SessionProvider, ZhCrmSessionManager};

use crate::command::{ObjectCommand, ObjectQuery};
use crate::ports::CrmObjectPort;

#[async_trait]
pub trait BusinessObjectService: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Reads objects; `None` when the vendor has no such object type
    async fn get_objects(
        &self,
        command: ObjectCommand,
        query: ObjectQuery,
    ) -> Result<Option<ObjectCommand>, CadError>;

    /// Counts objects into `command.count`; `None` when the vendor has no
    /// such object type
    async fn get_objects_count(
        &self,
        command: ObjectCommand,
        query: Option<String>,
    ) -> Result<Option<ObjectCommand>, CadError>;

    async fn create_object(&self, command: ObjectCommand) -> Result<ObjectCommand, CadError>;

    async fn update_object(&self, command: ObjectCommand) -> Result<ObjectCommand, CadError>;

    /// Returns false when nothing with `id` existed
    async fn delete_object(&self, command: &ObjectCommand, id: &str) -> Result<bool, CadError>;
}

/// Object service pairing a vendor's session source with its CRUD port
pub struct CrmObjectService {
    vendor: Vendor,
    sessions: Arc<dyn SessionProvider>,
    port: Arc<dyn CrmObjectPort>,
}

impl CrmObjectService {
    pub fn new(vendor: Vendor, sessions: Arc<dyn SessionProvider>, port: Arc<dyn CrmObjectPort>) -> Self {
        Self {
            vendor,
            sessions,
            port,
        }
    }

    /// ZH service; every call asks ZH for a session id
    pub fn zh(manager: Arc<ZhCrmSessionManager>, port: Arc<dyn CrmObjectPort>) -> Self {
        Self::new(Vendor::Zh, manager, port)
    }

    /// Office365 service; tokens are fetched lazily and reused
    pub fn office365(manager: Arc<Office365CrmSessionManager>, port: Arc<dyn CrmObjectPort>) -> Self {
        Self::new(Vendor::MsOffice365, manager, port)
    }

    async fn session(&self, command: &ObjectCommand) -> Result<CrmUser, CadError> {
        self.sessions.valid_session(&command.crm_user_id).await
    }
}

#[async_trait]
impl BusinessObjectService for CrmObjectService {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    async fn get_objects(
        &self,
        mut command: ObjectCommand,
        query: ObjectQuery,
    ) -> Result<Option<ObjectCommand>, CadError> {
        debug!(vendor = %self.vendor, object_type = %command.object_type, ?query, "get objects");
        let session = self.session(&command).await?;

        let found = self.port.find(&session, &command.object_type, &query).await?;
        Ok(found.map(|objects| {
            command.objects = objects;
            command
        }))
    }

    async fn get_objects_count(
        &self,
        mut command: ObjectCommand,
        query: Option<String>,
    ) -> Result<Option<ObjectCommand>, CadError> {
        debug!(vendor = %self.vendor, object_type = %command.object_type, ?query, "count objects");
        let session = self.session(&command).await?;

        let count = self
            .port
            .count(&session, &command.object_type, query.as_deref())
            .await?;
        Ok(count.map(|count| {
            command.count = Some(count);
            command
        }))
    }

    async fn create_object(&self, mut command: ObjectCommand) -> Result<ObjectCommand, CadError> {
        debug!(vendor = %self.vendor, object_type = %command.object_type, "create object");
        let session = self.session(&command).await?;

        let objects = std::mem::take(&mut command.objects);
        command.objects = self.port.create(&session, &command.object_type, objects).await?;
        Ok(command)
    }

    async fn update_object(&self, mut command: ObjectCommand) -> Result<ObjectCommand, CadError> {
        debug!(vendor = %self.vendor, object_type = %command.object_type, "update object");
        let session = self.session(&command).await?;

        let objects = std::mem::take(&mut command.objects);
        command.objects = self.port.update(&session, &command.object_type, objects).await?;
        Ok(command)
    }

    async fn delete_object(&self, command: &ObjectCommand, id: &str) -> Result<bool, CadError> {
        debug!(vendor = %self.vendor, object_type = %command.object_type, id, "delete object");
        let session = self.session(command).await?;

        self.port.delete(&session, &command.object_type, id).await
    }
}
