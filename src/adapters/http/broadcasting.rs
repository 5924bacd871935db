//! Private channel authorization endpoint.
//!
//! `POST /broadcasting/auth` signs `<socket_id>:<channel_name>` for a signed
//! in user so the socket client can subscribe to a `private-` channel.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::notifications::dto::{ChannelAuthRequest, ChannelAuthResponse};
use crate::adapters::websocket::ChannelAuthenticator;

/// POST /broadcasting/auth
pub async fn authorize_channel(
    State(authenticator): State<Arc<ChannelAuthenticator>>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<ChannelAuthRequest>,
) -> Response {
    if req.socket_id.trim().is_empty() {
        return ErrorResponse::bad_request("socket_id is required")
            .with_status(StatusCode::BAD_REQUEST);
    }
    if !ChannelAuthenticator::requires_auth(&req.channel_name) {
        return ErrorResponse::bad_request(format!(
            "Channel '{}' is public and needs no authorization",
            req.channel_name
        ))
        .with_status(StatusCode::BAD_REQUEST);
    }

    tracing::debug!(
        user_id = %user.id,
        socket_id = %req.socket_id,
        channel = %req.channel_name,
        "Authorized private channel"
    );
    let auth = authenticator.sign(&req.socket_id, &req.channel_name);
    (StatusCode::OK, Json(ChannelAuthResponse { auth })).into_response()
}

pub fn broadcasting_routes(authenticator: Arc<ChannelAuthenticator>) -> Router {
    Router::new()
        .route("/auth", post(authorize_channel))
        .with_state(authenticator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::http::middleware::{auth_middleware, AuthState};
    use axum::{body::Body, http::Request, middleware};
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn authenticator() -> Arc<ChannelAuthenticator> {
        Arc::new(ChannelAuthenticator::new(
            "hr-app",
            SecretString::new("secret".to_string()),
        ))
    }

    fn app() -> Router {
        let validator: AuthState = Arc::new(MockSessionValidator::new().with_test_user("t", "hr-1"));
        Router::new()
            .nest("/broadcasting", broadcasting_routes(authenticator()))
            .layer(middleware::from_fn_with_state(validator, auth_middleware))
    }

    fn request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/broadcasting/auth")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn signs_private_channel() {
        let response = app()
            .oneshot(request(
                Some("t"),
                serde_json::json!({"socket_id": "s1", "channel_name": "private-hr"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let parsed: ChannelAuthResponse = serde_json::from_slice(&body).unwrap();
        assert!(authenticator().verify("s1", "private-hr", &parsed.auth).is_ok());
    }

    #[tokio::test]
    async fn public_channel_is_a_bad_request() {
        let response = app()
            .oneshot(request(
                Some("t"),
                serde_json::json!({"socket_id": "s1", "channel_name": "notifications"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn anonymous_caller_is_rejected() {
        let response = app()
            .oneshot(request(
                None,
                serde_json::json!({"socket_id": "s1", "channel_name": "private-hr"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
