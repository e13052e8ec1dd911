use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::utils::error::{FieldError, ValidationError};

/// User document as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

/// Write-side shape of a user, shared by create and replace.
///
/// Every field is optional at the type level so a missing `name` or `email`
/// is reported as a field error instead of a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserPayload {
    #[validate(
        required(message = "Path `name` is required."),
        length(min = 1, code = "required", message = "Path `name` is required.")
    )]
    #[schema(example = "Jhon Doe")]
    pub name: Option<String>,

    #[validate(
        required(message = "Path `email` is required."),
        length(min = 1, code = "required", message = "Path `email` is required."),
        email(message = "Invalid Email"),
        custom(function = "validate_email_domain", message = "Invalid Email")
    )]
    #[schema(example = "jhon@doe.com")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "019183434344")]
    pub phone: Option<String>,

    /// Defaults to the time of the write when omitted
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserPayload {
    /// Validates the payload and builds the document to persist.
    pub fn into_user(self) -> Result<User, ValidationError> {
        if let Err(errors) = self.validate() {
            return Err(field_errors(&errors));
        }

        let created_at = self
            .created_at
            .map(|at| bson::DateTime::from_millis(at.timestamp_millis()))
            .unwrap_or_else(bson::DateTime::now);

        Ok(User {
            id: None,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            created_at,
        })
    }
}

/// Rejects domains without a top-level label, which the `email` rule lets
/// through (`jane@doe`).
fn validate_email_domain(email: &str) -> Result<(), validator::ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or_default();
    let valid = match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    };

    if valid {
        return Ok(());
    }

    let mut err = validator::ValidationError::new("email");
    err.add_param("value".into(), &email);
    Err(err)
}

fn field_errors(errors: &ValidationErrors) -> ValidationError {
    let mut validation = ValidationError::default();

    for (path, failures) in errors.field_errors() {
        for failure in failures {
            validation.insert(FieldError {
                path: path.to_string(),
                value: failure
                    .params
                    .get("value")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
                kind: failure.code.to_string(),
                message: failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("Validator failed for path `{}`", path)),
            });
        }
    }

    validation
}

/// User as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    #[schema(example = "5c8f29852253e53af4a0f276")]
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: DateTime::from_timestamp_millis(user.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// Body sent back by the delete endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub name: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        DeleteResponse {
            message: "User deleted successfully".to_string(),
            name: "UserDeleted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, email: Option<&str>) -> UserPayload {
        UserPayload {
            name: name.map(String::from),
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_payload_builds_user() {
        let before = bson::DateTime::now();
        let user = payload(Some("Jane Doe"), Some("jane@doe.com"))
            .into_user()
            .unwrap();

        assert_eq!(user.id, None);
        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "jane@doe.com");
        assert_eq!(user.phone, None);
        assert!(user.created_at >= before);
    }

    #[test]
    fn test_supplied_created_at_is_kept() {
        let at: DateTime<Utc> = "2019-03-18T05:15:49.715Z".parse().unwrap();
        let mut input = payload(Some("Jhon Doe"), Some("jhon@doe.com"));
        input.created_at = Some(at);
        input.phone = Some("019183434344".to_string());

        let user = input.into_user().unwrap();
        assert_eq!(user.created_at.timestamp_millis(), at.timestamp_millis());
        assert_eq!(user.phone.as_deref(), Some("019183434344"));
    }

    #[test]
    fn test_invalid_email_names_email_path() {
        let err = payload(Some("Bad"), Some("not-an-email"))
            .into_user()
            .unwrap_err();

        assert_eq!(err.errors.keys().collect::<Vec<_>>(), vec!["email"]);
        let field = &err.errors["email"];
        assert_eq!(field.message, "Invalid Email");
        assert_eq!(field.value, serde_json::json!("not-an-email"));
    }

    #[test]
    fn test_email_without_top_level_domain_is_rejected() {
        for email in ["DFDFD@ddd", "jane@doe", "a@b", "jane@doe.c", "jane@doe.c0m"] {
            let err = payload(Some("Jane Doe"), Some(email))
                .into_user()
                .unwrap_err();

            assert_eq!(err.errors.keys().collect::<Vec<_>>(), vec!["email"], "{}", email);
            let field = &err.errors["email"];
            assert_eq!(field.path, "email");
            assert_eq!(field.kind, "email");
            assert_eq!(field.message, "Invalid Email");
            assert_eq!(field.value, serde_json::json!(email));
        }
    }

    #[test]
    fn test_email_with_subdomain_is_accepted() {
        let user = payload(Some("Jane Doe"), Some("jane.doe@mail.example.org"))
            .into_user()
            .unwrap();
        assert_eq!(user.email, "jane.doe@mail.example.org");
    }

    #[test]
    fn test_missing_required_fields() {
        let err = payload(None, None).into_user().unwrap_err();

        assert_eq!(err.errors.keys().collect::<Vec<_>>(), vec!["email", "name"]);
        assert_eq!(err.errors["name"].kind, "required");
        assert_eq!(err.errors["name"].message, "Path `name` is required.");
    }

    #[test]
    fn test_empty_name_is_required_error() {
        let err = payload(Some(""), Some("jane@doe.com"))
            .into_user()
            .unwrap_err();

        assert_eq!(err.errors.keys().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(err.errors["name"].kind, "required");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let input: UserPayload = serde_json::from_value(serde_json::json!({
            "_id": "5c8f29852253e53af4a0f276",
            "name": "Jane Doe",
            "email": "jane@doe.com"
        }))
        .unwrap();

        assert!(input.into_user().is_ok());
    }

    #[test]
    fn test_response_shape() {
        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            name: "Jane Doe".to_string(),
            email: "jane@doe.com".to_string(),
            phone: None,
            created_at: bson::DateTime::from_millis(1_552_886_149_715),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["createdAt"], serde_json::json!("2019-03-18T05:15:49.715Z"));
        assert!(json.get("phone").is_none());
    }
}
