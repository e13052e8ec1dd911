mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    http::header::{self, HeaderName},
    middleware::{Condition, Logger},
    web, App, HttpServer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{MongoDB, MongoUserStore};
use crate::services::UserService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    log::info!("🚀 Starting API server {}...", env!("CARGO_PKG_VERSION"));

    let db = MongoDB::new(&config.mongo_url)
        .await
        .map_err(std::io::Error::other)?;

    log::info!("📊 Database: {}", db.database().name());

    // A failed ping is not fatal: the driver keeps trying in the background
    match db.ping().await {
        Ok(()) => log::info!("✅ API server is connected to MongoDB"),
        Err(e) => log::error!("❌ MongoDB is not reachable yet: {}", e),
    }

    let users = web::Data::new(UserService::new(Arc::new(MongoUserStore::new(&db))));
    let access_log = config.is_development();
    let openapi = api::swagger::ApiDoc::openapi();

    let (host, port) = config.bind_address();
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"])
            .allowed_headers(vec![
                header::ORIGIN,
                HeaderName::from_static("x-requested-with"),
                header::CONTENT_TYPE,
                header::ACCEPT,
            ]);

        App::new()
            .app_data(users.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Condition::new(access_log, Logger::new("%r %s %T")))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(api::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
