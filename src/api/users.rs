use actix_web::{delete, get, post, put, web, Either, HttpResponse, Responder, ResponseError};

use crate::models::{DeleteResponse, UserPayload, UserResponse};
use crate::services::UserService;
use crate::utils::error::{ApiError, ErrorBody};

/// Write bodies are accepted as JSON or as urlencoded forms
type UserBody = Either<web::Json<UserPayload>, web::Form<UserPayload>>;

fn into_payload(body: UserBody) -> UserPayload {
    match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

fn failure(action: &str, err: ApiError) -> HttpResponse {
    match err {
        ApiError::NotFound => log::warn!("⚠️ {}: {}", action, err),
        _ => log::error!("❌ Error {}: {}", action, err),
    }
    err.error_response()
}

/// POST /v1/api/users - Add a new user
#[utoipa::path(
    post,
    path = "/v1/api/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation or database error", body = ErrorBody)
    )
)]
#[post("/users")]
pub async fn add_user(service: web::Data<UserService>, body: UserBody) -> impl Responder {
    match service.create(into_payload(body)).await {
        Ok(user) => {
            log::info!(
                "✅ User created: {}",
                user.id.map(|id| id.to_hex()).unwrap_or_default()
            );
            HttpResponse::Created().json(UserResponse::from(user))
        }
        Err(e) => failure("creating user", e),
    }
}

/// GET /v1/api/users - List every user
#[utoipa::path(
    get,
    path = "/v1/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 400, description = "Database error", body = ErrorBody)
    )
)]
#[get("/users")]
pub async fn get_users(service: web::Data<UserService>) -> impl Responder {
    match service.list_all().await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => failure("listing users", e),
    }
}

/// GET /v1/api/users/{id} - Fetch a single user
#[utoipa::path(
    get,
    path = "/v1/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 400, description = "Malformed id or database error", body = ErrorBody)
    )
)]
#[get("/users/{id}")]
pub async fn get_user(service: web::Data<UserService>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match service.get_by_id(&user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(e) => failure(&format!("fetching user {}", user_id), e),
    }
}

/// PUT /v1/api/users/{id} - Replace a user document
#[utoipa::path(
    put,
    path = "/v1/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 201, description = "User replaced", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 400, description = "Validation error, malformed id or database error", body = ErrorBody)
    )
)]
#[put("/users/{id}")]
pub async fn update_user(
    service: web::Data<UserService>,
    path: web::Path<String>,
    body: UserBody,
) -> impl Responder {
    let user_id = path.into_inner();

    match service.replace_by_id(&user_id, into_payload(body)).await {
        Ok(user) => {
            log::info!("✅ User replaced: {}", user_id);
            HttpResponse::Created().json(UserResponse::from(user))
        }
        Err(e) => failure(&format!("replacing user {}", user_id), e),
    }
}

/// DELETE /v1/api/users/{id} - Delete a user
///
/// Answers 204 whether or not the user existed.
#[utoipa::path(
    delete,
    path = "/v1/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted", body = DeleteResponse),
        (status = 400, description = "Malformed id or database error", body = ErrorBody)
    )
)]
#[delete("/users/{id}")]
pub async fn delete_user(service: web::Data<UserService>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match service.delete_by_id(&user_id).await {
        Ok(()) => {
            log::info!("🗑️  User deleted: {}", user_id);
            HttpResponse::NoContent().json(DeleteResponse::deleted())
        }
        Err(e) => failure(&format!("deleting user {}", user_id), e),
    }
}
