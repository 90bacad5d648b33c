use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use suyay_server::auth::StoreAuthenticator;
use suyay_server::config::Config;
use suyay_server::routes::{create_routes, AppState};
use suyay_server::store::postgres::PgStore;
use suyay_server::store::Store;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let authenticator = Arc::new(StoreAuthenticator::new(Arc::clone(&store)));
    let app: Router = create_routes(AppState::new(store, authenticator));

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
