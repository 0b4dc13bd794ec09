//! Vendor CRUD port
//!
//! The wire-level CRUD call into a vendor CRM. Every method receives the
//! session record obtained by the business object service; the port reads
//! the service endpoint and token from it.
//!
//! `find` and `count` return `Ok(None)` when the object type is unknown to
//! the vendor, and `Ok(Some(..))` (possibly empty) when it is known.

use async_trait::async_trait;

use core_kernel::{CadError, DomainPort};
use domain_session::CrmUser;

use crate::command::{CrmObject, ObjectQuery};

#[async_trait]
pub trait CrmObjectPort: DomainPort {
    async fn find(
        &self,
        session: &CrmUser,
        object_type: &str,
        query: &ObjectQuery,
    ) -> Result<Option<Vec<CrmObject>>, CadError>;

    async fn count(
        &self,
        session: &CrmUser,
        object_type: &str,
        query: Option<&str>,
    ) -> Result<Option<u64>, CadError>;

    async fn create(
        &self,
        session: &CrmUser,
        object_type: &str,
        objects: Vec<CrmObject>,
    ) -> Result<Vec<CrmObject>, CadError>;

    async fn update(
        &self,
        session: &CrmUser,
        object_type: &str,
        objects: Vec<CrmObject>,
    ) -> Result<Vec<CrmObject>, CadError>;

    /// Returns false when no object with `id` exists
    async fn delete(&self, session: &CrmUser, object_type: &str, id: &str) -> Result<bool, CadError>;
}
