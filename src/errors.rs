use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use serde::Serialize;
use serde_json::{json, Map, Value};
use validator::ValidationErrors;

use crate::domain::conflict::ConflictFlags;

#[derive(Debug)]
pub enum AppError {
    /// Field-level request validation failure, rendered as a 400 with an
    /// `errors` map keyed by field name.
    Validation(Vec<FieldError>),
    /// Proposed booking dates overlap an existing booking on the spot.
    BookingConflict(ConflictFlags),
    NotFound(String),
    Forbidden(String),
    /// Resource already exists (duplicate email, username, or review).
    Duplicate {
        message: String,
        errors: Vec<FieldError>,
    },
    Unauthorized(String),
    Internal(String),
}

pub const BOOKING_CONFLICT_MESSAGE: &str =
    "Sorry, this spot is already booked for the specified dates";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let messages = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::BookingConflict(_) => write!(f, "{}", BOOKING_CONFLICT_MESSAGE),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Duplicate { message, .. } => write!(f, "Duplicate: {}", message),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => json!({
                "message": "Bad Request",
                "errors": field_error_map(errors),
            }),
            AppError::BookingConflict(flags) => json!({
                "message": BOOKING_CONFLICT_MESSAGE,
                "errors": flags.to_error_map(),
            }),
            AppError::Duplicate { message, errors } => json!({
                "message": message,
                "errors": field_error_map(errors),
            }),
            AppError::NotFound(msg) | AppError::Forbidden(msg) | AppError::Unauthorized(msg) => {
                json!({ "message": msg })
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                json!({ "message": "Internal Server Error" })
            }
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BookingConflict(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn field_error_map(errors: &[FieldError]) -> Value {
    let mut map = Map::new();
    for e in errors {
        // First message per field wins; matches the error-map shape clients render.
        map.entry(e.field.clone())
            .or_insert_with(|| Value::String(e.message.clone()));
    }
    Value::Object(map)
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }

    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(format!("{} couldn't be found", resource))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::Validation(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record couldn't be found".into()),
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Duplicate {
                    message: "Resource already exists".into(),
                    errors: Vec::new(),
                }
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation => AppError::Internal("Token creation error".into()),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid token")]
    InvalidToken,

    #[display("Token expired")]
    TokenExpired,

    #[display("Authentication required")]
    MissingCredentials,

    #[display("Invalid credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "message": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
