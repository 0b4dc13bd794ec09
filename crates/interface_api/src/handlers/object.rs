//! Generic CRM object handlers
//!
//! Every handler runs the same pipeline: decode path parameters, validate
//! the request and seed the session cache, pick the vendor service, then
//! call it. Reads that find no such object type answer 404.
//!
//! Axum percent-decodes path segments; every parameter then also goes
//! through [`decode_request_param`], so `+` reads as a space.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use core_kernel::{CadError, TransactionId};
use domain_object::{BusinessObjectService, CrmObject, ObjectCommand, ObjectQuery, ObjectResponse};

use crate::error::ApiError;
use crate::validator::{decode_request_param, CallerHeaders};
use crate::AppState;

/// Request body: one object or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ObjectsBody {
    Many(Vec<CrmObject>),
    One(CrmObject),
}

impl ObjectsBody {
    fn parse(body: &Bytes) -> Result<Vec<CrmObject>, CadError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        match serde_json::from_slice(body) {
            Ok(ObjectsBody::Many(objects)) => Ok(objects),
            Ok(ObjectsBody::One(object)) => Ok(vec![object]),
            Err(err) => Err(CadError::validation(format!("request body is not a CRM object: {err}"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

struct Prepared {
    command: ObjectCommand,
    service: Arc<dyn BusinessObjectService>,
}

async fn prepare(
    state: &AppState,
    trans_id: TransactionId,
    headers: &HeaderMap,
    object_type: &str,
    objects: Vec<CrmObject>,
    body_required: bool,
) -> Result<Prepared, ApiError> {
    let caller = CallerHeaders::from_headers(headers);
    let mut command = ObjectCommand::new(object_type, "")
        .with_trans_ids(trans_id, caller.ext_trans_id.clone())
        .with_objects(objects);

    state
        .validator
        .validate_request_object(&mut command, &caller, object_type, body_required)
        .await?;
    let service = state.factory.service(&command).await?;

    Ok(Prepared { command, service })
}

async fn find(
    state: &AppState,
    trans_id: TransactionId,
    headers: &HeaderMap,
    object_type: &str,
    query: ObjectQuery,
) -> Result<Json<ObjectResponse>, ApiError> {
    let Prepared { command, service } = prepare(state, trans_id, headers, object_type, Vec::new(), false).await?;
    let not_found = CadError::not_found(&command.object_type);

    let result = service.get_objects(command, query).await?;
    result
        .map(|command| Json(command.into_response()))
        .ok_or(ApiError::from(not_found))
}

async fn count(
    state: &AppState,
    trans_id: TransactionId,
    headers: &HeaderMap,
    object_type: &str,
    query: Option<String>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let Prepared { command, service } = prepare(state, trans_id, headers, object_type, Vec::new(), false).await?;
    let not_found = CadError::not_found(&command.object_type);

    let result = service.get_objects_count(command, query).await?;
    result
        .map(|command| Json(command.into_response()))
        .ok_or(ApiError::from(not_found))
}

/// Gets all objects of a type
pub async fn get_objects(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path(object_type): Path<String>,
) -> Result<Json<ObjectResponse>, ApiError> {
    find(&state, trans_id, &headers, &object_type, ObjectQuery::all()).await
}

/// Gets the objects matching a query
pub async fn get_objects_by_query(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path((object_type, query)): Path<(String, String)>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let query = ObjectQuery::by_query(decode_request_param(&query)?);
    find(&state, trans_id, &headers, &object_type, query).await
}

pub async fn get_objects_by_query_select(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path((object_type, query, select)): Path<(String, String, String)>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let query = ObjectQuery::by_query(decode_request_param(&query)?).with_select(decode_request_param(&select)?);
    find(&state, trans_id, &headers, &object_type, query).await
}

pub async fn get_objects_by_query_select_order(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path((object_type, query, select, order)): Path<(String, String, String, String)>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let query = ObjectQuery::by_query(decode_request_param(&query)?)
        .with_select(decode_request_param(&select)?)
        .with_order(decode_request_param(&order)?);
    find(&state, trans_id, &headers, &object_type, query).await
}

/// Counts all objects of a type
pub async fn get_objects_count(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path(object_type): Path<String>,
) -> Result<Json<ObjectResponse>, ApiError> {
    count(&state, trans_id, &headers, &object_type, None).await
}

pub async fn get_objects_count_by_query(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path((object_type, query)): Path<(String, String)>,
) -> Result<Json<ObjectResponse>, ApiError> {
    let query = decode_request_param(&query)?;
    count(&state, trans_id, &headers, &object_type, Some(query)).await
}

/// Creates the objects in the body
pub async fn create_object(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path(object_type): Path<String>,
    body: Bytes,
) -> Result<Json<ObjectResponse>, ApiError> {
    let objects = ObjectsBody::parse(&body)?;
    let Prepared { command, service } = prepare(&state, trans_id, &headers, &object_type, objects, true).await?;

    let created = service.create_object(command).await?;
    Ok(Json(created.into_response()))
}

/// Updates the objects in the body; each must carry its id
pub async fn update_object(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path(object_type): Path<String>,
    body: Bytes,
) -> Result<Json<ObjectResponse>, ApiError> {
    let objects = ObjectsBody::parse(&body)?;
    let Prepared { command, service } = prepare(&state, trans_id, &headers, &object_type, objects, true).await?;

    let updated = service.update_object(command).await?;
    Ok(Json(updated.into_response()))
}

/// Deletes one object; 404 when nothing with that id existed
pub async fn delete_object(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path((object_type, id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    delete_by_id(&state, trans_id, &headers, &object_type, &id).await
}

/// `DELETE /:object_type/count` lands on the count route; the literal
/// segment is the object id
pub async fn delete_object_with_count_id(
    State(state): State<AppState>,
    Extension(trans_id): Extension<TransactionId>,
    headers: HeaderMap,
    Path(object_type): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    delete_by_id(&state, trans_id, &headers, &object_type, "count").await
}

async fn delete_by_id(
    state: &AppState,
    trans_id: TransactionId,
    headers: &HeaderMap,
    object_type: &str,
    raw_id: &str,
) -> Result<(StatusCode, Json<DeleteResponse>), ApiError> {
    let id = decode_request_param(raw_id)?;
    let Prepared { command, service } = prepare(state, trans_id, headers, object_type, Vec::new(), false).await?;

    let deleted = service.delete_object(&command, &id).await?;
    let status = if deleted { StatusCode::OK } else { StatusCode::NOT_FOUND };
    Ok((status, Json(DeleteResponse { id, deleted })))
}
