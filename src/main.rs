use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use storefront::logging::init_tracing;
use storefront::router::init_router;
use storefront::state::init_app_state;
use storefront_config::{AppConfig, DatabaseConfig};
use storefront_db::{init_db_pool, run_migrations, seed_defaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let app_config = AppConfig::from_env();
    info!(environment = %app_config.environment, "Starting Storefront API");

    let pool = init_db_pool(&DatabaseConfig::from_env())
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let state = init_app_state(pool, app_config.clone());

    if app_config.seed_on_startup {
        match seed_defaults(
            state.users.as_ref(),
            state.products.as_ref(),
            app_config.bcrypt_cost,
        )
        .await
        {
            Ok(report) => info!(
                admin_created = report.admin_created,
                products_created = report.products_created,
                "Database seeded"
            ),
            // Seed data is optional; the API still serves without it.
            Err(e) => error!(error = %format!("{:#}", e.error), "Failed to seed database"),
        }
    }

    let app = init_router(state);

    let address = app_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    println!("🚀 Server running on http://{}", address);
    println!("🌍 Environment: {}", app_config.environment);
    println!("📚 Swagger UI available at http://{}/swagger-ui", address);
    println!("📖 Scalar UI available at http://{}/scalar", address);
    println!("🔍 Health check at http://{}/api/health", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}
