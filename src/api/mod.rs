//! HTTP API for the dashboard client.
//!
//! Routes are nested under `/api/` and protected by a middleware stack:
//! Auth → Audit → Handler. The router is composable: `build_router()`
//! returns a `Router` that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
pub mod websocket;

pub use error::ApiError;
pub use router::build_router;
pub use server::{start_api_server, ApiServer, ApiSession, ServerError};
pub use types::ApiContext;
