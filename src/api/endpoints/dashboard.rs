//! Dashboard counters.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{self, DashboardStats};

/// `GET /api/dashboard/stats`
pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<DashboardStats>, ApiError> {
    let conn = ctx.open_db()?;
    let today = chrono::Utc::now().date_naive();
    let stats = dashboard::fetch_dashboard_stats(&conn, today)?;
    Ok(Json(stats))
}
