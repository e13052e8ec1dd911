use actix_web::{HttpResponse, Responder};

const HEALTHY: &str = "👍";

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service greeting with version", body = String, content_type = "text/plain")
    )
)]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Hello, API server {}", env!("CARGO_PKG_VERSION")))
}

// By the time the server answers, it is both healthy and ready.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = String, content_type = "text/plain")
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(HEALTHY)
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = String, content_type = "text/plain")
    )
)]
pub async fn readiness_check() -> impl Responder {
    health_check().await
}
