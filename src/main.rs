use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_service::application::payment::PaymentService;
use payment_service::config::{DEFAULT_CONFIG_PATH, ServiceConfig};
use payment_service::infrastructure::pool::ConnectionPool;
use payment_service::infrastructure::simulated::SimulatedQueryExecutor;
use payment_service::interfaces::http::{AppState, router};
use payment_service::telemetry;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Demo payment API backed by a simulated connection pool", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listen address, overriding `server.listen` from the config file
    #[arg(long)]
    listen: Option<String>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level);

    let mut config = ServiceConfig::load(&cli.config).into_diagnostic()?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    let pool_config = config.pool_config();
    tracing::info!(
        service = %config.service.name,
        config = %cli.config.display(),
        pool_size = pool_config.size,
        acquire_timeout_ms = config.database.query_timeout_ms,
        "payment service starting"
    );
    if config.is_pool_undersized() {
        tracing::warn!(
            pool_size = pool_config.size,
            "connection pool is undersized, expect contention under load"
        );
    }

    let pool = ConnectionPool::from_config(&pool_config);
    let executor = SimulatedQueryExecutor::new(config.simulation.clone());
    let service = PaymentService::new(pool.clone(), Box::new(executor), &pool_config);

    let listener = TcpListener::bind(&config.server.listen)
        .await
        .into_diagnostic()?;
    tracing::info!(addr = %listener.local_addr().into_diagnostic()?, "listening");

    let app = router(AppState::new(service, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(pool))
        .await
        .into_diagnostic()?;

    Ok(())
}

async fn shutdown_signal(pool: ConnectionPool) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    pool.close();
}
