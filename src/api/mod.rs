pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::utils::error::ApiError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::MalformedBody(err.to_string()).into()
}

fn form_error(err: error::UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::MalformedBody(err.to_string()).into()
}

/// Registers the process-level endpoints and the `/v1/api` resources.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::hello))
        .route("/health", web::get().to(health::health_check))
        .route("/ready", web::get().to(health::readiness_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/v1/api")
                .app_data(web::JsonConfig::default().error_handler(json_error))
                .app_data(web::FormConfig::default().error_handler(form_error))
                .service(users::get_users)
                .service(users::add_user)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user),
        );
}
