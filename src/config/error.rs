//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Broadcast driver 'redis' requires redis.url")]
    RedisDriverWithoutUrl,

    #[error("Broadcast channel capacity must be at least 1")]
    InvalidChannelCapacity,

    #[error("Unknown socket transport: {0}")]
    UnknownTransport(String),

    #[error("JWT secret must be at least 32 bytes in production")]
    WeakJwtSecret,

    #[error("Notification list limit must be between 1 and max_list_limit")]
    InvalidListLimit,

    #[error("Invalid notification title: {0}")]
    InvalidTitle(String),
}
