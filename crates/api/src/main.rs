use stockroom_api::config::Config;
use stockroom_infra::PgStore;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment itself still applies.
    let _ = dotenvy::dotenv();

    stockroom_observability::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e:#}");
            std::process::exit(1);
        }
    };

    let store = PgStore::connect(&config.store)
        .await
        .expect("failed to connect to database");
    store
        .migrate()
        .await
        .expect("failed to run schema migration");
    tracing::info!("schema migration complete");

    let app = stockroom_api::app::build_app(store.clone(), config.allowed_origin.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    store.close().await;
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
