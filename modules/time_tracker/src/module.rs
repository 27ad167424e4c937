use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use url::Url;

use crate::api::rest::routes;
use crate::config::TimeTrackerConfig;
use crate::contract::client::TimeTrackerApi;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::ports::IdentityPort;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::TimeTrackerLocalClient;
use crate::infra::identity::HttpIdentityClient;
use crate::infra::storage::{Migrator, SeaOrmIntervalsRepository, SeaOrmUsersRepository};
use modkit::TracedClient;

/// The time_tracker module: owns the domain service and exposes it over REST and
/// as an in-process client.
#[derive(Clone)]
pub struct TimeTracker {
    service: Arc<Service>,
}

impl TimeTracker {
    /// Wire the module against a database and the real identity service.
    pub fn init(db: DatabaseConnection, cfg: &TimeTrackerConfig) -> anyhow::Result<Self> {
        info!("Initializing time_tracker module");
        debug!(
            "Loaded time_tracker config: identity_base_url={}, identity_timeout_ms={}, default_page_size={}, max_page_size={}",
            cfg.identity_base_url, cfg.identity_timeout_ms, cfg.default_page_size, cfg.max_page_size
        );

        let base_url = Url::parse(&cfg.identity_base_url)
            .with_context(|| format!("invalid identity_base_url '{}'", cfg.identity_base_url))?;
        let client = TracedClient::with_timeout(Duration::from_millis(cfg.identity_timeout_ms))
            .context("failed to build identity HTTP client")?;
        let identity = Arc::new(HttpIdentityClient::new(client, base_url));

        Ok(Self::with_parts(db, identity, Arc::new(SystemClock), cfg))
    }

    /// Wire the module with explicit identity and clock implementations.
    pub fn with_parts(
        db: DatabaseConnection,
        identity: Arc<dyn IdentityPort>,
        clock: Arc<dyn Clock>,
        cfg: &TimeTrackerConfig,
    ) -> Self {
        let users = Arc::new(SeaOrmUsersRepository::new(db.clone()));
        let intervals = Arc::new(SeaOrmIntervalsRepository::new(db));
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        };
        let service = Service::new(users, intervals, identity, clock, service_config);

        Self {
            service: Arc::new(service),
        }
    }

    /// Apply the module's schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running time_tracker database migrations");
        Migrator::up(db, None).await?;
        info!("time_tracker database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Local in-process client implementation
    pub fn client(&self) -> Arc<dyn TimeTrackerApi> {
        Arc::new(TimeTrackerLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering time_tracker REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        crate::api::rest::openapi::openapi()
    }
}
