//! Monitoring page endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{organ_type_filter, MonitoringFilter, TimeRange};
use crate::monitoring::{self, MonitoringOverview};

#[derive(Deserialize)]
pub struct MonitoringQuery {
    #[serde(rename = "type")]
    pub organ_type: Option<String>,
    pub time: Option<String>,
}

/// `GET /api/monitoring?type=&time=`: trends plus roster. Unknown time
/// labels fall back to the last 30 days.
pub async fn overview(
    State(ctx): State<ApiContext>,
    Query(query): Query<MonitoringQuery>,
) -> Result<Json<MonitoringOverview>, ApiError> {
    let range = TimeRange::from_label(query.time.as_deref());
    let filter = MonitoringFilter {
        organ_type: organ_type_filter(query.organ_type.as_deref()),
    };

    let conn = ctx.open_db()?;
    let today = chrono::Utc::now().date_naive();
    let overview = monitoring::fetch_monitoring_overview(&conn, range, &filter, today)?;
    Ok(Json(overview))
}
