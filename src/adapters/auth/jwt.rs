//! HS256 JWT session validator.
//!
//! Validates bearer tokens signed with the shared secret the HR application
//! uses for its own sessions. Checks signature, expiry and (when configured)
//! issuer.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Claims read from the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("Rejected token: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email, claims.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        Claims {
            sub: "hr-42".to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
            iss: Some("workforce".to_string()),
            email: Some("hr@example.com".to_string()),
            name: Some("HR Officer".to_string()),
        }
    }

    fn validator(issuer: Option<&str>) -> JwtSessionValidator {
        JwtSessionValidator::new(&SecretString::new(SECRET.to_string()), issuer)
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let user = validator(Some("workforce"))
            .validate(&token(&claims(3600), SECRET))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "hr-42");
        assert_eq!(user.email.as_deref(), Some("hr@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("HR Officer"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let result = validator(None).validate(&token(&claims(-3600), SECRET)).await;
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let result = validator(None).validate(&token(&claims(3600), "other")).await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid() {
        let result = validator(Some("someone-else"))
            .validate(&token(&claims(3600), SECRET))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(validator(None).validate("not.a.jwt").await, Err(AuthError::InvalidToken));
    }
}
