//! In-memory sandbox CRM
//!
//! Stores objects per object type and understands a small query language so
//! the full gateway can be exercised without a vendor:
//!
//! - query: `field=value` pairs joined by `&`; empty or `*` matches all
//! - select: comma separated field names; `id` is always kept
//! - order: `field`, `field asc` or `field desc`, compared as text
//!
//! Every call requires the session record to carry a token.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{CadError, DomainPort, Vendor};
use domain_session::{CrmUser, SecurityToken};

use crate::command::{CrmObject, ObjectQuery};
use crate::ports::CrmObjectPort;

#[derive(Debug)]
pub struct SandboxCrmObjectPort {
    vendor: Vendor,
    store: RwLock<HashMap<String, Vec<CrmObject>>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
    last_token: Mutex<Option<SecurityToken>>,
}

impl SandboxCrmObjectPort {
    pub fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            store: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    /// Pre-populates an object type
    pub async fn with_objects(self, object_type: &str, objects: Vec<CrmObject>) -> Self {
        self.store
            .write()
            .await
            .entry(type_key(object_type))
            .or_default()
            .extend(objects);
        self
    }

    /// Number of calls that reached the port
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Token presented on the latest call
    pub fn last_token(&self) -> Option<SecurityToken> {
        self.last_token.lock().ok().and_then(|token| token.clone())
    }

    fn check_session(&self, session: &CrmUser) -> Result<(), CadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let token = session
            .token
            .clone()
            .ok_or_else(|| CadError::vendor(self.vendor, "request carries no session"))?;
        if let Ok(mut last) = self.last_token.lock() {
            *last = Some(token);
        }
        Ok(())
    }

    fn parse_filter(&self, query: Option<&str>) -> Result<Vec<(String, String)>, CadError> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() || query == "*" {
            return Ok(Vec::new());
        }
        query
            .split('&')
            .map(|pair| {
                pair.split_once('=')
                    .map(|(field, value)| (field.trim().to_string(), value.trim().to_string()))
                    .ok_or_else(|| CadError::vendor(self.vendor, format!("malformed query term '{pair}'")))
            })
            .collect()
    }

    fn matching(objects: &[CrmObject], filter: &[(String, String)]) -> Vec<CrmObject> {
        objects
            .iter()
            .filter(|object| {
                filter
                    .iter()
                    .all(|(field, value)| object.field_text(field).as_deref() == Some(value.as_str()))
            })
            .cloned()
            .collect()
    }
}

fn type_key(object_type: &str) -> String {
    object_type.to_ascii_lowercase()
}

fn apply_select(objects: &mut [CrmObject], select: &str) {
    let fields: Vec<&str> = select.split(',').map(str::trim).filter(|f| !f.is_empty()).collect();
    if fields.is_empty() || fields.contains(&"*") {
        return;
    }
    for object in objects.iter_mut() {
        object.fields.retain(|name, _| fields.contains(&name.as_str()));
    }
}

fn apply_order(objects: &mut [CrmObject], order: &str) {
    let mut parts = order.split_whitespace();
    let Some(field) = parts.next() else {
        return;
    };
    let descending = parts
        .next()
        .map(|direction| direction.eq_ignore_ascii_case("desc"))
        .unwrap_or(false);

    objects.sort_by(|a, b| a.field_text(field).cmp(&b.field_text(field)));
    if descending {
        objects.reverse();
    }
}

impl DomainPort for SandboxCrmObjectPort {}

#[async_trait]
impl CrmObjectPort for SandboxCrmObjectPort {
    async fn find(
        &self,
        session: &CrmUser,
        object_type: &str,
        query: &ObjectQuery,
    ) -> Result<Option<Vec<CrmObject>>, CadError> {
        self.check_session(session)?;
        let filter = self.parse_filter(query.query.as_deref())?;

        let store = self.store.read().await;
        let Some(objects) = store.get(&type_key(object_type)) else {
            return Ok(None);
        };

        let mut found = Self::matching(objects, &filter);
        if let Some(select) = query.select.as_deref() {
            apply_select(&mut found, select);
        }
        if let Some(order) = query.order.as_deref() {
            apply_order(&mut found, order);
        }
        Ok(Some(found))
    }

    async fn count(
        &self,
        session: &CrmUser,
        object_type: &str,
        query: Option<&str>,
    ) -> Result<Option<u64>, CadError> {
        self.check_session(session)?;
        let filter = self.parse_filter(query)?;

        let store = self.store.read().await;
        Ok(store
            .get(&type_key(object_type))
            .map(|objects| Self::matching(objects, &filter).len() as u64))
    }

    async fn create(
        &self,
        session: &CrmUser,
        object_type: &str,
        objects: Vec<CrmObject>,
    ) -> Result<Vec<CrmObject>, CadError> {
        self.check_session(session)?;

        let created: Vec<CrmObject> = objects
            .into_iter()
            .map(|mut object| {
                if object.id.is_none() {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                    object.id = Some(format!("{}-{}", type_key(object_type), n));
                }
                object
            })
            .collect();

        self.store
            .write()
            .await
            .entry(type_key(object_type))
            .or_default()
            .extend(created.iter().cloned());
        Ok(created)
    }

    async fn update(
        &self,
        session: &CrmUser,
        object_type: &str,
        objects: Vec<CrmObject>,
    ) -> Result<Vec<CrmObject>, CadError> {
        self.check_session(session)?;

        let mut store = self.store.write().await;
        let stored = store
            .get_mut(&type_key(object_type))
            .ok_or_else(|| CadError::not_found(object_type))?;

        let mut updated = Vec::with_capacity(objects.len());
        for object in objects {
            let target = stored
                .iter_mut()
                .find(|existing| existing.id.is_some() && existing.id == object.id)
                .ok_or_else(|| CadError::not_found(object_type))?;
            target.fields.extend(object.fields);
            updated.push(target.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, session: &CrmUser, object_type: &str, id: &str) -> Result<bool, CadError> {
        self.check_session(session)?;

        let mut store = self.store.write().await;
        let Some(stored) = store.get_mut(&type_key(object_type)) else {
            return Ok(false);
        };
        let before = stored.len();
        stored.retain(|object| object.id.as_deref() != Some(id));
        Ok(stored.len() < before)
    }
}
