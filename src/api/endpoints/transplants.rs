//! Pending transplant queue.
//!
//! `GET /api/transplants/pending?page=&limit=&type=`

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{organ_type_filter, PageRequest};
use crate::transplants::{self, PendingCasesPage};

/// Raw query values. Kept as strings so a malformed number is a 400 with
/// our error body rather than the extractor's plain-text rejection.
#[derive(Deserialize)]
pub struct PendingQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub organ_type: Option<String>,
}

fn parse_positive(raw: Option<&str>, name: &str, default: u32) -> Result<u32, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    raw.parse::<u32>()
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| ApiError::BadRequest(format!("{name} must be a positive integer")))
}

/// Page request from query values. Missing values take the defaults;
/// zero, negative or non-numeric values are rejected.
pub fn page_request(query: &PendingQuery) -> Result<PageRequest, ApiError> {
    let page = parse_positive(query.page.as_deref(), "page", PageRequest::DEFAULT_PAGE)?;
    let limit = parse_positive(query.limit.as_deref(), "limit", PageRequest::DEFAULT_LIMIT)?;
    PageRequest::new(page, limit).ok_or_else(|| ApiError::BadRequest("Invalid page request".into()))
}

/// `GET /api/transplants/pending`
pub async fn pending(
    State(ctx): State<ApiContext>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<PendingCasesPage>, ApiError> {
    let page = page_request(&query)?;
    let organ_type = organ_type_filter(query.organ_type.as_deref());

    let conn = ctx.open_db()?;
    let result = transplants::fetch_pending_cases(&conn, organ_type, page)?;
    Ok(Json(result))
}
