//! Top-level HTTP router.
//!
//! ```text
//! GET  /health
//! GET  /employee/notifications              (bearer)
//! POST /employee/notifications/mark-read    (bearer)
//! POST /employee/notifications/mark-all-read (bearer)
//! POST /broadcasting/auth                   (bearer)
//! GET  /app/:app_key                        (websocket, hub driver only)
//! ```

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use http::{header, HeaderValue, Method};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::http::broadcasting::broadcasting_routes;
use crate::adapters::http::middleware::{auth_middleware, AuthState};
use crate::adapters::http::notifications::{notification_routes, NotificationHandlers};
use crate::adapters::websocket::{socket_router, ChannelAuthenticator, SocketState};
use crate::config::ServerConfig;

/// Everything the router needs from the composition root.
#[derive(Clone)]
pub struct HttpServices {
    pub notifications: NotificationHandlers,
    pub session_validator: AuthState,
    pub authenticator: Arc<ChannelAuthenticator>,
    /// `None` when broadcasts go to an external broker; the hub endpoint
    /// would never receive anything then.
    pub socket: Option<SocketState>,
}

pub fn build_router(services: HttpServices, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/employee/notifications", notification_routes(services.notifications))
        .nest("/broadcasting", broadcasting_routes(services.authenticator))
        .layer(middleware::from_fn_with_state(
            services.session_validator,
            auth_middleware,
        ))
        .layer(CompressionLayer::new());

    let mut router = Router::new().route("/health", get(health)).merge(api);
    if let Some(socket) = services.socket {
        router = router.merge(socket_router().with_state(socket));
    }

    router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(server))
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Explicit origins when configured, permissive otherwise (development).
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    }
}
