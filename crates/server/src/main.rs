mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use axum::{
    Router,
    routing::{delete, get, post},
};
use config::Config;
use database::db::create_connection;
use doc::ApiDoc;
use log::info;
use migration::{Migrator, MigratorTrait};
use routes::{auth as auth_routes, catalog, health, review, search};
use state::AppState;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utils::shutdown::shutdown_signal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Routes anyone can call
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/universities", get(catalog::list_universities))
        .route("/universities/summaries", get(review::university_summaries))
        .route("/universities/{id}", get(catalog::get_university))
        .route("/universities/{id}/faculties", get(catalog::list_faculties))
        .route("/faculties/{id}", get(catalog::get_faculty))
        .route("/faculties/{id}/departments", get(catalog::list_departments))
        .route("/departments/{id}", get(catalog::get_department))
        .route("/departments/{id}/programs", get(catalog::list_programs))
        .route("/programs/{id}", get(catalog::get_program))
        .route("/programs/{id}/reviews", get(review::list_program_reviews))
        .route("/programs/{id}/summary", get(review::program_summary))
        .route("/reviews", get(review::feed))
        .route("/search", get(search::search))
        .route("/subjects", get(search::subjects))
}

/// Routes that need a bearer token; admin checks happen in the handlers
fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth_routes::me).post(auth_routes::sign_in))
        .route("/universities", post(catalog::create_university))
        .route("/universities/{id}", delete(catalog::delete_university))
        .route("/universities/{id}/faculties", post(catalog::create_faculty))
        .route("/faculties/{id}", delete(catalog::delete_faculty))
        .route("/faculties/{id}/departments", post(catalog::create_department))
        .route("/departments/{id}", delete(catalog::delete_department))
        .route("/departments/{id}/programs", post(catalog::create_program))
        .route("/programs/{id}", delete(catalog::delete_program))
        .route("/programs/{id}/reviews", post(review::create_review))
        .route("/reviews/{id}", delete(review::delete_review))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::load();

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to the database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let bind_addr = config.bind_addr;
    let state = AppState::new(db, config);

    let app = public_routes()
        .merge(
            protected_routes()
                .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer())),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
