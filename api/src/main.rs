use api::auth::middleware::log_request;
use api::routes::routes;
use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use common::logger::init_logging;
use migration::{Migrator, MigratorTrait};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use util::{config::AppConfig, paths, state::AppState, storage};

#[tokio::main]
async fn main() {
    let config = AppConfig::global().clone();

    let _log_guard = init_logging(&config.log_file, &config.log_level, config.log_to_stdout);

    let db = db::connect().await.expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run database migrations");

    let store = storage::from_config(&config)
        .await
        .expect("Failed to configure object storage");
    info!(provider = store.provider(), "Object storage ready");

    let app_state = AppState::new(db, store);

    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    let mut app = Router::new().nest("/api", routes(app_state));

    // Locally stored objects are served by the API itself; S3 serves its own.
    if config.storage_backend == "local" {
        let root = paths::absolutize(&config.storage_root);
        info!(root = %root.display(), "Serving stored files under /files");
        app = app.nest_service("/files", ServeDir::new(root));
    }

    let app = app.layer(from_fn(log_request)).layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} ({}) on http://{}",
        config.project_name, config.env, addr
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}
