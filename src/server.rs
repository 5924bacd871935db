//! Composition root.
//!
//! Picks adapters from configuration and assembles the handlers, the channel
//! hub and the HTTP router. `main` and the integration tests both go through
//! [`Application::assemble`].

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::adapters::auth::JwtSessionValidator;
use crate::adapters::broadcast::{LogBroadcaster, RedisBroadcaster};
use crate::adapters::http::notifications::NotificationHandlers;
use crate::adapters::http::{build_router, HttpServices};
use crate::adapters::postgres::{PostgresEmployeeDirectory, PostgresNotificationRepository};
use crate::adapters::storage::{InMemoryEmployeeDirectory, InMemoryNotificationRepository};
use crate::adapters::websocket::{ChannelAuthenticator, ChannelHub, SocketState};
use crate::application::handlers::notification::{
    ListNotificationsHandler, MarkAllReadHandler, MarkReadHandler, PublishNotificationHandler,
    RaiseNotificationHandler,
};
use crate::config::{AppConfig, BroadcastDriver, ConfigError, ValidationError};
use crate::ports::{
    BroadcastError, Broadcaster, EmployeeDirectory, NotificationRepository, SessionValidator,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Broker error: {0}")]
    Broker(#[from] BroadcastError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port implementations chosen for this process.
#[derive(Clone)]
pub struct Services {
    pub repository: Arc<dyn NotificationRepository>,
    pub directory: Arc<dyn EmployeeDirectory>,
    /// `None` publishes through the channel hub.
    pub broadcaster: Option<Arc<dyn Broadcaster>>,
    pub session_validator: Arc<dyn SessionValidator>,
}

impl Services {
    /// Connects the adapters named by `config`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let (repository, directory): (Arc<dyn NotificationRepository>, Arc<dyn EmployeeDirectory>) =
            match config.database.url.as_deref().filter(|url| !url.is_empty()) {
                Some(url) => {
                    let pool = PgPoolOptions::new()
                        .min_connections(config.database.min_connections)
                        .max_connections(config.database.max_connections)
                        .acquire_timeout(config.database.acquire_timeout())
                        .connect(url)
                        .await?;
                    if config.database.run_migrations {
                        sqlx::migrate!("./migrations").run(&pool).await?;
                        tracing::info!("Database migrations applied");
                    }
                    (
                        Arc::new(PostgresNotificationRepository::new(pool.clone())),
                        Arc::new(PostgresEmployeeDirectory::new(pool)),
                    )
                }
                None => {
                    tracing::warn!("No database configured; notifications are kept in memory");
                    (
                        Arc::new(InMemoryNotificationRepository::new()),
                        Arc::new(InMemoryEmployeeDirectory::new()),
                    )
                }
            };

        let broadcaster: Option<Arc<dyn Broadcaster>> = match config.broadcast.driver {
            BroadcastDriver::Hub => None,
            BroadcastDriver::Log => Some(Arc::new(LogBroadcaster::new())),
            BroadcastDriver::Redis => {
                let url = config
                    .redis
                    .url
                    .as_deref()
                    .ok_or(ValidationError::RedisDriverWithoutUrl)?;
                let redis =
                    RedisBroadcaster::connect(url, config.broadcast.channel_prefix.clone()).await?;
                Some(Arc::new(redis))
            }
        };

        let session_validator = Arc::new(JwtSessionValidator::new(
            &config.auth.jwt_secret,
            config.auth.jwt_issuer.as_deref(),
        ));

        Ok(Self {
            repository,
            directory,
            broadcaster,
            session_validator,
        })
    }
}

/// Assembled server: the router plus the producer-side handlers the host
/// application calls on workforce state changes.
pub struct Application {
    pub router: Router,
    pub hub: Arc<ChannelHub>,
    pub publisher: Arc<PublishNotificationHandler>,
    pub producer: Arc<RaiseNotificationHandler>,
}

impl Application {
    pub fn assemble(config: &AppConfig, services: Services) -> Self {
        let hub = Arc::new(ChannelHub::new(config.broadcast.channel_capacity));
        let hub_driven = services.broadcaster.is_none();
        let broadcaster = services
            .broadcaster
            .unwrap_or_else(|| hub.clone() as Arc<dyn Broadcaster>);
        tracing::info!(driver = broadcaster.name(), "Broadcast driver selected");
        if !hub_driven {
            tracing::info!("Socket endpoint not mounted; subscribers use the external broker");
        }

        let publisher = Arc::new(PublishNotificationHandler::new(
            services.repository.clone(),
            broadcaster,
        ));
        let producer = Arc::new(RaiseNotificationHandler::new(
            services.directory,
            publisher.clone(),
        ));

        let notifications = NotificationHandlers::new(
            Arc::new(ListNotificationsHandler::new(
                services.repository.clone(),
                config.notifications.list_limit,
                config.notifications.max_list_limit,
            )),
            Arc::new(MarkReadHandler::new(services.repository.clone())),
            Arc::new(MarkAllReadHandler::new(services.repository)),
        );

        let authenticator = Arc::new(ChannelAuthenticator::new(
            config.broadcast.app_key.clone(),
            config.broadcast.app_secret.clone(),
        ));
        let socket = hub_driven.then(|| {
            SocketState::new(hub.clone(), authenticator.clone())
                .with_activity_timeout(config.broadcast.activity_timeout_secs)
        });

        let router = build_router(
            HttpServices {
                notifications,
                session_validator: services.session_validator,
                authenticator,
                socket,
            },
            &config.server,
        );

        Self {
            router,
            hub,
            publisher,
            producer,
        }
    }
}
