//! Command envelope
//!
//! An [`ObjectCommand`] is the unit of work handed from the validator to the
//! service factory and on to a business object service. What goes back to
//! the caller is an [`ObjectResponse`], which has no routing metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{CrmUserId, TransactionId, Vendor};

/// One CRM business object: an optional id plus arbitrary fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl CrmObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Field value rendered as text; strings are returned without quotes
    pub fn field_text(&self, name: &str) -> Option<String> {
        if name == "id" {
            return self.id.clone();
        }
        self.fields.get(name).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// Filtering, field selection and ordering for a read
///
/// All three are opaque to the core and interpreted by the vendor port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectQuery {
    pub query: Option<String>,
    pub select: Option<String>,
    pub order: Option<String>,
}

impl ObjectQuery {
    /// Every object of the type, all fields
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// Request side of a gateway call
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCommand {
    /// CRM object type, e.g. `Account`; routing metadata only
    pub object_type: String,
    /// Caller identity, the session cache key
    pub crm_user_id: CrmUserId,
    /// Vendor resolved upstream; `None` lets the factory resolve it
    pub vendor: Option<Vendor>,
    pub int_trans_id: Option<TransactionId>,
    pub ext_trans_id: Option<String>,
    /// Payload on writes, results on reads
    pub objects: Vec<CrmObject>,
    /// Set by count operations
    pub count: Option<u64>,
}

impl ObjectCommand {
    pub fn new(object_type: impl Into<String>, crm_user_id: impl Into<CrmUserId>) -> Self {
        Self {
            object_type: object_type.into(),
            crm_user_id: crm_user_id.into(),
            vendor: None,
            int_trans_id: None,
            ext_trans_id: None,
            objects: Vec::new(),
            count: None,
        }
    }

    pub fn with_objects(mut self, objects: Vec<CrmObject>) -> Self {
        self.objects = objects;
        self
    }

    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = Some(vendor);
        self
    }

    pub fn with_trans_ids(mut self, int_trans_id: TransactionId, ext_trans_id: Option<String>) -> Self {
        self.int_trans_id = Some(int_trans_id);
        self.ext_trans_id = ext_trans_id;
        self
    }

    /// Drops the routing metadata and keeps what the caller gets back
    pub fn into_response(self) -> ObjectResponse {
        ObjectResponse {
            int_trans_id: self.int_trans_id.map(|id| id.to_string()),
            ext_trans_id: self.ext_trans_id,
            objects: self.objects,
            count: self.count,
        }
    }
}

/// Response side of a gateway call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_trans_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_trans_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<CrmObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}
