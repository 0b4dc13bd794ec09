//! API middleware

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::info;

use core_kernel::TransactionId;

use crate::validator::EXT_TRANS_ID;

/// Response header carrying the internal transaction id (`cadTransId`;
/// header names are matched case-insensitively)
pub const CAD_TRANS_ID: &str = "cadtransid";

/// Transaction logging middleware
///
/// Stamps each request with a fresh [`TransactionId`] (available to handlers
/// as a request extension), logs the start and end of the transaction, and
/// echoes the id back in the `cadTransId` response header.
pub async fn transaction_middleware(mut request: Request<Body>, next: Next) -> Response {
    let trans_id = TransactionId::new();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let ext_trans_id = request
        .headers()
        .get(EXT_TRANS_ID)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(
        cad_trans_id = %trans_id,
        ext_trans_id = %ext_trans_id,
        method = %method,
        uri = %uri,
        "Transaction started"
    );
    request.extensions_mut().insert(trans_id);

    let start = Utc::now();
    let mut response = next.run(request).await;
    let duration = Utc::now() - start;

    if let Ok(value) = HeaderValue::from_str(&trans_id.to_string()) {
        response.headers_mut().insert(CAD_TRANS_ID, value);
    }

    info!(
        cad_trans_id = %trans_id,
        ext_trans_id = %ext_trans_id,
        status = %response.status().as_u16(),
        duration_ms = duration.num_milliseconds(),
        "Transaction finished"
    );

    response
}
