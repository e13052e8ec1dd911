use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API Server",
        version = "1.0.0",
        description = "REST API for managing user records (name, email, phone, creation time) stored in MongoDB.\n\nWrite endpoints accept JSON or urlencoded bodies. No authentication is required."
    ),
    paths(
        // Users
        crate::api::users::add_user,
        crate::api::users::get_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::hello,
        crate::api::health::health_check,
        crate::api::health::readiness_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserPayload,
            crate::models::UserResponse,
            crate::models::DeleteResponse,
            crate::utils::error::ErrorBody,
            crate::utils::error::ErrorKind,
            crate::utils::error::FieldError,
        )
    ),
    tags(
        (name = "Users", description = "Create, list, fetch, replace and delete users."),
        (name = "Health", description = "Greeting, health, readiness and request counters."),
    )
)]
pub struct ApiDoc;
