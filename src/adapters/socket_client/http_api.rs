//! `reqwest` implementation of the client-side notification API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::adapters::http::notifications::dto::{
    ChannelAuthRequest, ChannelAuthResponse, MarkAllReadResponse, MarkReadRequest,
    NotificationListResponse,
};
use crate::adapters::http::ErrorResponse;
use crate::domain::foundation::NotificationId;
use crate::domain::notification::NotificationView;
use crate::ports::{ApiError, ChannelAuthorizer, NotificationApi};

/// Talks to the notification endpoints as one signed-in user.
pub struct HttpNotificationApi {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpNotificationApi {
    pub fn new(base_url: impl Into<String>, token: SecretString) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body);
                Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn list(&self) -> Result<Vec<NotificationView>, ApiError> {
        let response = self
            .send(self.client.get(self.url("/employee/notifications")))
            .await?;
        let list: NotificationListResponse = Self::decode(response).await?;
        Ok(list
            .notifications
            .into_iter()
            .map(|n| n.into_view())
            .collect())
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), ApiError> {
        let body = MarkReadRequest {
            notification_id: id.to_string(),
        };
        self.send(
            self.client
                .post(self.url("/employee/notifications/mark-read"))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<Vec<NotificationId>, ApiError> {
        let response = self
            .send(self.client.post(self.url("/employee/notifications/mark-all-read")))
            .await?;
        let marked: MarkAllReadResponse = Self::decode(response).await?;
        Ok(marked.notification_ids)
    }
}

#[async_trait]
impl ChannelAuthorizer for HttpNotificationApi {
    async fn authorize(&self, socket_id: &str, channel: &str) -> Result<String, ApiError> {
        let body = ChannelAuthRequest {
            socket_id: socket_id.to_string(),
            channel_name: channel.to_string(),
        };
        let response = self
            .send(self.client.post(self.url("/broadcasting/auth")).json(&body))
            .await?;
        let auth: ChannelAuthResponse = Self::decode(response).await?;
        Ok(auth.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpNotificationApi::new(
            "http://localhost:8080/",
            SecretString::new("token".to_string()),
        );
        assert_eq!(
            api.url("/employee/notifications"),
            "http://localhost:8080/employee/notifications"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = HttpNotificationApi::new(
            "http://127.0.0.1:9",
            SecretString::new("token".to_string()),
        );

        let result = api.list().await;

        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
