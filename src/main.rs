use dbcompare::audit;
use dbcompare::config::CONFIG;
use dbcompare::server::{AppState, app_router};
use dbcompare::service::ComparisonService;
use dbcompare::sources::{OracleSource, PostgresSource};
use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let audit_cfg = cfg.audit();
    info!(
        oracle = %cfg.oracle.connect_string,
        oracle_user = %cfg.oracle.username,
        postgres_pool = cfg.postgres.max_connections,
        audit_init_schema = audit_cfg.init_schema,
        match_strategy = cfg.compare.match_strategy.as_str(),
        include_listings = cfg.compare.include_listings,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
    );

    let oracle = OracleSource::new(cfg.oracle.clone());
    let postgres = PostgresSource::connect_lazy(&cfg.postgres)?;
    let audit = audit::spawn(&audit_cfg).await?;

    let service = ComparisonService::new(
        Arc::new(oracle),
        Arc::new(postgres),
        Arc::new(audit),
        cfg.compare.clone(),
    );
    let app = app_router(AppState::new(service));

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
