use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error kind reported to clients in the `name` field of every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ErrorKind {
    ValidationError,
    UserNotFound,
    CastError,
    BodyParseError,
    StoreError,
}

/// A single failing field of a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub path: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationError {
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationError {
    pub fn insert(&mut self, error: FieldError) {
        // first failing rule wins for a given path
        self.errors.entry(error.path.clone()).or_insert(error);
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User validation failed")?;
        let mut separator = ": ";
        for error in self.errors.values() {
            write!(f, "{}{}: {}", separator, error.path, error.message)?;
            separator = ", ";
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("User not found")]
    NotFound,

    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\"")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Database error: {0}")]
    Store(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub name: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, FieldError>>,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::ValidationError,
            ApiError::NotFound => ErrorKind::UserNotFound,
            ApiError::InvalidId(_) => ErrorKind::CastError,
            ApiError::MalformedBody(_) => ErrorKind::BodyParseError,
            ApiError::Store(_) => ErrorKind::StoreError,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let errors = match self {
            ApiError::Validation(validation) => Some(validation.errors.clone()),
            _ => None,
        };

        ErrorBody {
            name: self.kind(),
            message: self.to_string(),
            errors,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Store(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_error() -> FieldError {
        FieldError {
            path: "email".to_string(),
            value: serde_json::json!("not-an-email"),
            kind: "email".to_string(),
            message: "Invalid Email".to_string(),
        }
    }

    #[test]
    fn test_not_found_body_matches_contract() {
        let err = ApiError::NotFound;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "UserNotFound", "message": "User not found" })
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let mut validation = ValidationError::default();
        validation.insert(email_error());
        validation.insert(FieldError {
            path: "name".to_string(),
            value: serde_json::Value::Null,
            kind: "required".to_string(),
            message: "Path `name` is required.".to_string(),
        });

        assert_eq!(
            validation.to_string(),
            "User validation failed: email: Invalid Email, name: Path `name` is required."
        );
    }

    #[test]
    fn test_first_error_per_path_is_kept() {
        let mut validation = ValidationError::default();
        validation.insert(email_error());
        validation.insert(FieldError {
            message: "something else".to_string(),
            ..email_error()
        });

        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.errors["email"].message, "Invalid Email");
    }

    #[test]
    fn test_validation_body_carries_field_errors() {
        let mut validation = ValidationError::default();
        validation.insert(email_error());
        let err = ApiError::from(validation);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert_eq!(body.name, ErrorKind::ValidationError);
        let errors = body.errors.unwrap();
        assert_eq!(errors["email"].path, "email");
        assert_eq!(errors["email"].value, serde_json::json!("not-an-email"));
    }

    #[test]
    fn test_invalid_id_is_cast_error() {
        let err = ApiError::InvalidId("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), ErrorKind::CastError);
        assert!(err.to_string().contains("\"abc\""));
    }
}
