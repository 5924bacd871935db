//! Private channel signatures.
//!
//! A subscription to a `private-` channel carries
//! `"<app_key>:<hex hmac_sha256(app_secret, "<socket_id>:<channel>")>"`.
//! The server signs it in `POST /broadcasting/auth` and verifies it when the
//! subscribe frame arrives.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Channels with this prefix require a signature.
pub const PRIVATE_PREFIX: &str = "private-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelAuthError {
    #[error("Private channel requires an auth signature")]
    MissingSignature,

    #[error("Auth signature is malformed")]
    Malformed,

    #[error("Auth signature was issued for another application")]
    AppKeyMismatch,

    #[error("Auth signature does not match")]
    InvalidSignature,
}

pub struct ChannelAuthenticator {
    app_key: String,
    app_secret: SecretString,
}

impl ChannelAuthenticator {
    pub fn new(app_key: impl Into<String>, app_secret: SecretString) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret,
        }
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn requires_auth(channel: &str) -> bool {
        channel.starts_with(PRIVATE_PREFIX)
    }

    /// Produces the `auth` value for a subscribe frame.
    pub fn sign(&self, socket_id: &str, channel: &str) -> String {
        format!(
            "{}:{}",
            self.app_key,
            hex::encode(self.signature(socket_id, channel))
        )
    }

    pub fn verify(&self, socket_id: &str, channel: &str, auth: &str) -> Result<(), ChannelAuthError> {
        let (key, signature) = auth.split_once(':').ok_or(ChannelAuthError::Malformed)?;
        if key != self.app_key {
            return Err(ChannelAuthError::AppKeyMismatch);
        }
        let provided = hex::decode(signature).map_err(|_| ChannelAuthError::Malformed)?;
        let expected = self.signature(socket_id, channel);
        if !constant_time_compare(&expected, &provided) {
            return Err(ChannelAuthError::InvalidSignature);
        }
        Ok(())
    }

    /// Public channels pass; private channels need a valid `auth`.
    pub fn authorize_subscription(
        &self,
        socket_id: &str,
        channel: &str,
        auth: Option<&str>,
    ) -> Result<(), ChannelAuthError> {
        if !Self::requires_auth(channel) {
            return Ok(());
        }
        let auth = auth.ok_or(ChannelAuthError::MissingSignature)?;
        self.verify(socket_id, channel, auth)
    }

    fn signature(&self, socket_id: &str, channel: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.app_secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(socket_id.as_bytes());
        mac.update(b":");
        mac.update(channel.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
