//! Reusable roster server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, default admin, REST API, metrics and
//! graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{GroupService, UserService};
use crate::config::{AdminConfig, AppConfig};
use crate::domain::{RepositoryProvider, Role};
use crate::infrastructure::crypto::PasswordHasher;
use crate::infrastructure::database::migrate;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{create_api_router, init_database, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the roster service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create default admin user if none exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running roster service.
///
/// # Examples
///
/// ```rust,no_run
/// use roster::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to (resolves port 0).
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the roster service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Create the default admin user (if enabled)
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting roster service...");

        let prometheus_handle = prometheus_handle()?;

        // ── Build sub-configs ──────────────────────────────────
        let db_config = app_cfg.database_config();
        let jwt_config = app_cfg.jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        let hasher = PasswordHasher::new(app_cfg.security.bcrypt_cost);
        info!("Password hashing with bcrypt cost {}", hasher.cost());

        // ── Database ───────────────────────────────────────────
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            migrate(&db).await?;
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let user_service = Arc::new(UserService::new(
            repos.clone(),
            hasher,
            jwt_config.clone(),
        ));
        let group_service = Arc::new(GroupService::new(repos.clone()));

        if opts.create_default_admin {
            create_default_admin(&user_service, &app_cfg.admin).await;
        }

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            user_service,
            group_service,
            jwt_config,
            db.clone(),
            prometheus_handle,
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests are drained within `server.shutdown_timeout`
    /// seconds; after that the server task is aborted.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let Self {
            db,
            shutdown,
            mut api_task,
            ..
        } = self;

        let task = &mut api_task;
        let drained = shutdown
            .shutdown_with_cleanup(move || async move {
                match task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;

        if !drained {
            api_task.abort();
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Roster service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down roster service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process, so
/// a restart within the same process reuses the first handle.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Create the default admin user if no users exist in the database.
pub async fn create_default_admin(user_service: &UserService, admin: &AdminConfig) {
    let users_count = match user_service.count_users().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };

    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");
    match user_service
        .create_user_with_roles(
            &admin.email,
            &admin.full_name,
            &admin.password,
            vec![Role::Admin],
        )
        .await
    {
        Ok(details) => {
            info!("Default admin created: {}", details.user.email);
            info!("⚠️  Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::infrastructure::database::repositories::test_support::test_db;

    async fn service() -> UserService {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_db().await));
        UserService::new(repos, PasswordHasher::new(4), JwtConfig::default())
    }

    #[tokio::test]
    async fn default_admin_is_seeded_into_an_empty_table() {
        let users = service().await;
        create_default_admin(&users, &AdminConfig::default()).await;

        let auth = users.login("admin@example.com", "pass_1234").await.unwrap();
        assert!(auth.user.is_admin());
        assert_eq!(auth.user.full_name, "admin");
        assert_eq!(auth.user.roles, vec![Role::Admin]);
    }

    #[tokio::test]
    async fn default_admin_is_skipped_when_users_exist() {
        let users = service().await;
        users
            .create_user("alice@x.com", "Alice", "secret")
            .await
            .unwrap();

        create_default_admin(&users, &AdminConfig::default()).await;

        assert_eq!(users.count_users().await.unwrap(), 1);
        assert!(users.login("admin@example.com", "pass_1234").await.is_err());
    }
}
