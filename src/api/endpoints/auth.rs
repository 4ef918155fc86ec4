//! Authentication endpoints.
//!
//! `POST /api/auth/login` is the only unprotected `/api` route; it issues
//! the session cookie. `logout` and `me` run behind the session gate.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{
    header_value, session_clear_cookie, session_set_cookie, ApiContext, SessionContext,
};
use crate::crypto;
use crate::db;
use crate::models::PublicUser;
use crate::session_store::SessionClaims;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
}

/// `POST /api/auth/login`: verify credentials and start a session.
///
/// Unknown user and wrong password both yield `INVALID_CREDENTIALS`
/// with no cookie.
pub async fn login(
    State(ctx): State<ApiContext>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    let username = required(request.username, "username")?;
    let password = required(request.password, "password")?;

    let user = {
        let conn = ctx.open_db()?;
        db::get_user_by_username(&conn, &username)?
    };
    let Some(user) = user else {
        tracing::debug!("Login rejected: unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    // PBKDF2 at full cost takes long enough to stall the runtime
    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || {
        crypto::verify_password(&password, &stored_hash)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("password verification task: {e}")))?;

    match verified {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            tracing::warn!(user_id = user.id, error = %e, "Stored password hash unreadable");
            return Err(ApiError::InvalidCredentials);
        }
    }

    let session_id = ctx.sessions.create(SessionClaims {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
    })?;
    tracing::info!(user_id = user.id, "Session started");

    let cookie = session_set_cookie(&session_id, ctx.sessions.ttl(), ctx.secure_cookies);
    let mut response = Json(UserResponse {
        user: PublicUser::from(&user),
    })
    .into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, header_value(&cookie)?);
    Ok(response)
}

/// `POST /api/auth/logout`: end the current session and expire the cookie.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Response, ApiError> {
    ctx.sessions.remove(&session.session_id)?;
    tracing::info!(user_id = session.claims.user_id, "Session ended");

    let mut response = Json(MessageResponse {
        message: "Logged out successfully",
    })
    .into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        header_value(&session_clear_cookie(ctx.secure_cookies))?,
    );
    Ok(response)
}

/// `GET /api/auth/me`: the logged-in user, re-read from the database.
pub async fn me(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<UserResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let user = db::get_user_by_id(&conn, session.claims.user_id)?.ok_or_else(|| {
        tracing::warn!(user_id = session.claims.user_id, "Session refers to a missing user");
        ApiError::Unauthorized
    })?;

    Ok(Json(UserResponse {
        user: PublicUser::from(&user),
    }))
}
