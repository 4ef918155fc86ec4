//! Notification bell.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SessionContext};
use crate::db;
use crate::models::Notification;

#[derive(Serialize)]
pub struct NotificationsResponse {
    /// Unread items only.
    pub count: usize,
    pub items: Vec<Notification>,
}

/// `GET /api/notifications`: the caller's notifications, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let items = db::list_notifications_for_user(&conn, session.claims.user_id)?;
    let count = items.iter().filter(|n| !n.read).count();
    Ok(Json(NotificationsResponse { count, items }))
}
