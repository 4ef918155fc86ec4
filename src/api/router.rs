//! HTTP router.
//!
//! Data routes are nested under `/api/` behind the session gate.
//! `POST /api/auth/login` is the only unprotected `/api` route.
//! `/ws` authenticates through its `token` query parameter.
//!
//! Middleware stack (outermost → innermost):
//! 1. Auth validator → 2. Audit logger

use std::path::Path;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::middleware;
use crate::api::types::{session_cookie, ApiContext};
use crate::api::websocket;

/// Build router from a pre-constructed `ApiContext`.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
/// With `static_dir`, unmatched paths serve the built client, falling back
/// to its `index.html`.
pub fn build_router(ctx: ApiContext, static_dir: Option<&Path>) -> Router {
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → Auth → Audit (innermost) → Handler
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/me", get(endpoints::auth::me))
        .route("/dashboard/stats", get(endpoints::dashboard::stats))
        .route("/transplants/pending", get(endpoints::transplants::pending))
        .route("/ml/insights", get(endpoints::ml::insights))
        .route(
            "/ml/explanation/:patient_id",
            get(endpoints::ml::explanation),
        )
        .route(
            "/ml/explanation/:patient_id/summary",
            get(endpoints::ml::explanation_summary),
        )
        .route("/ml/predict", post(endpoints::ml::predict))
        .route("/ml/evaluate", post(endpoints::ml::evaluate))
        .route("/monitoring", get(endpoints::monitoring::overview))
        .route("/notifications", get(endpoints::notifications::list))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx.clone());

    // Unmatched `/api/*` never reaches the static client
    let api_fallback = Router::new()
        .fallback(api_not_found)
        .with_state(ctx.clone());

    let ws_routes = Router::new()
        .route("/ws", get(websocket::ws_upgrade))
        .with_state(ctx);

    let mut router = Router::new()
        .nest("/api", protected.merge(unprotected).merge(api_fallback))
        .merge(ws_routes);

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(spa);
    }

    router
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Unknown API path: 401 without a live session, JSON 404 with one.
async fn api_not_found(State(ctx): State<ApiContext>, headers: HeaderMap) -> ApiError {
    let Some(session_id) = session_cookie(&headers) else {
        return ApiError::Unauthorized;
    };
    match ctx.sessions.get(&session_id) {
        Ok(Some(_)) => ApiError::NotFound("No such API endpoint".into()),
        Ok(None) => ApiError::Unauthorized,
        Err(e) => e.into(),
    }
}
