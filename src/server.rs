//! Server runtime
//!
//! [`run`] owns the whole lifecycle: metrics recorder, database and
//! migrations, first-start seeding, the REST API and graceful shutdown.

use std::future::IntoFuture;
use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::database::repositories::SeaOrmUserRepository;
use crate::infrastructure::database::seed::{ensure_default_admin, seed_rooms};
use crate::infrastructure::database::{init_database, run_migrations};
use crate::interfaces::http::{create_api_router, AppState};
use crate::support::shutdown::shutdown_signal;

/// Options for starting the reservation server.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations before serving
    pub auto_migrate: bool,
}

/// The global recorder can be installed once per process.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Start the server and block until it has shut down.
///
/// After SIGINT/SIGTERM in-flight requests get `server.shutdown_timeout`
/// seconds to finish.
pub async fn run(opts: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = opts.config;
    info!("Starting hotel reservation service...");

    let prometheus = prometheus_handle()?;

    let db = init_database(&config.database).await?;
    if opts.auto_migrate {
        run_migrations(&db).await?;
    }

    let users = SeaOrmUserRepository::new(db.clone());
    ensure_default_admin(&users, &config.admin, config.security.bcrypt_cost).await;
    seed_rooms(&db, &config.rooms).await?;

    if config.mail.enabled {
        info!(host = %config.mail.smtp_host, "Booking emails sent over SMTP");
    } else {
        info!("Mail disabled; booking emails are written to the log");
    }

    let router = create_api_router(AppState::build(db, &config), prometheus);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("🛑 Shutdown signal received, draining connections");
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let drain = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = &mut server => result?,
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout_secs = drain.as_secs(),
                    "Shutdown timeout elapsed, dropping open connections"
                ),
            }
        }
    }

    info!("👋 Hotel reservation service stopped");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set.
///
/// Call once at process startup.
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
