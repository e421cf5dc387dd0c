use dotenvy::dotenv;
use std::sync::Arc;
use tea_ledger::{
    api::{AppState, app_router},
    config::{auth::AuthSettings, budgets, database, server::ServerConfig},
    core::{auth::AuthManager, budget},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().with_current_span(false).init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so LOG_FORMAT and RUST_LOG can come from it
    let dotenv_loaded = dotenv().is_ok();

    // 2. Initialize tracing
    init_tracing();
    info!("Loaded .env file: {dotenv_loaded}");

    // 3. Load configuration
    let server_config = ServerConfig::from_env()
        .inspect_err(|e| error!("Invalid server configuration: {e}"))?;
    let auth_settings = AuthSettings::from_env()
        .inspect_err(|e| error!("Invalid auth configuration: {e}"))?;
    if auth_settings.admin.is_none() {
        warn!("ADMIN_EMAIL / ADMIN_PASSWORD_HASH not set; admin login is disabled");
    }

    // 4. Initialize database
    let db = database::create_connection(&database::get_database_url()).await?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Seed budgets from config.toml, if present
    if let Some(seed) = budgets::load_default_seed_config()? {
        let created = budget::seed_budgets(&db, &seed)
            .await
            .inspect_err(|e| error!("Failed to seed budgets: {e}"))?;
        info!("Seeded {created} budgets.");
    }

    // 6. Serve
    let state = Arc::new(AppState {
        database: db,
        auth: AuthManager::new(&auth_settings),
    });
    let router = app_router(state, &server_config);

    info!("Listening on {}", server_config.listen_addr);
    let listener = tokio::net::TcpListener::bind(server_config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
