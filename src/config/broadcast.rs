//! Broadcast and socket configuration
//!
//! Chooses where published notifications go and describes the socket
//! endpoint subscribers connect to.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

const DEV_APP_SECRET: &str = "workforce-dev-secret";
const KNOWN_TRANSPORTS: [&str; 2] = ["ws", "wss"];

/// Broker used for published notifications.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastDriver {
    /// In-process channel hub served over `/app/:app_key`.
    #[default]
    Hub,
    /// Redis `PUBLISH` for an external socket server.
    Redis,
    /// Log only.
    Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    #[serde(default)]
    pub driver: BroadcastDriver,

    /// Buffered messages per hub channel before slow subscribers lag.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Prefix for Redis channel names.
    #[serde(default)]
    pub channel_prefix: String,

    /// Host subscribers connect to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_app_key")]
    pub app_key: String,

    /// Signs private channel subscriptions.
    #[serde(default = "default_app_secret")]
    pub app_secret: SecretString,

    #[serde(default)]
    pub tls: bool,

    /// Enabled transports (comma-separated `ws`, `wss`).
    #[serde(default = "default_transports")]
    pub transports: String,

    /// Fixed delay between client reconnect attempts, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    /// Advertised to clients in `connection_established`.
    #[serde(default = "default_activity_timeout")]
    pub activity_timeout_secs: u64,
}

impl BroadcastConfig {
    pub fn enabled_transports(&self) -> Vec<String> {
        self.transports
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// WebSocket URL of the hub endpoint for this app key.
    pub fn socket_url(&self) -> String {
        let scheme = if self.tls && self.enabled_transports().iter().any(|t| t == "wss") {
            "wss"
        } else {
            "ws"
        };
        format!("{}://{}:{}/app/{}", scheme, self.host, self.port, self.app_key)
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        if self.app_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BROADCAST__APP_KEY"));
        }
        let transports = self.enabled_transports();
        if transports.is_empty() {
            return Err(ValidationError::MissingRequired("BROADCAST__TRANSPORTS"));
        }
        if let Some(unknown) = transports
            .iter()
            .find(|t| !KNOWN_TRANSPORTS.contains(&t.as_str()))
        {
            return Err(ValidationError::UnknownTransport(unknown.clone()));
        }
        let secret = self.app_secret.expose_secret();
        if secret.is_empty()
            || (*environment == Environment::Production && secret == DEV_APP_SECRET)
        {
            return Err(ValidationError::MissingRequired("BROADCAST__APP_SECRET"));
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            driver: BroadcastDriver::default(),
            channel_capacity: default_channel_capacity(),
            channel_prefix: String::new(),
            host: default_host(),
            port: default_port(),
            app_key: default_app_key(),
            app_secret: default_app_secret(),
            tls: false,
            transports: default_transports(),
            reconnect_delay_ms: default_reconnect_delay(),
            activity_timeout_secs: default_activity_timeout(),
        }
    }
}

fn default_channel_capacity() -> usize {
    128
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_app_key() -> String {
    "workforce".to_string()
}

fn default_app_secret() -> SecretString {
    SecretString::new(DEV_APP_SECRET.to_string())
}

fn default_transports() -> String {
    "ws,wss".to_string()
}

fn default_reconnect_delay() -> u64 {
    1000
}

fn default_activity_timeout() -> u64 {
    120
}
