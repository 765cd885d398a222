use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::errors::FieldError;

const MIN_USERNAME_LENGTH: usize = 4;
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as exposed on the wire; never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        SafeUser {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug)]
pub struct UserInsert {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    pub fn validate_fields(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if is_blank(&self.first_name) {
            errors.push(FieldError::new("firstName", "First Name is required"));
        }
        if is_blank(&self.last_name) {
            errors.push(FieldError::new("lastName", "Last Name is required"));
        }

        match self.email.as_deref() {
            None | Some("") => errors.push(FieldError::new("email", "Email is required")),
            Some(email) if !email.validate_email() => {
                errors.push(FieldError::new("email", "Please provide a valid email."))
            }
            _ => {}
        }

        match self.username.as_deref() {
            None | Some("") => errors.push(FieldError::new("username", "Username is required")),
            Some(username) if username.len() < MIN_USERNAME_LENGTH => errors.push(
                FieldError::new("username", "Please provide a username with at least 4 characters."),
            ),
            Some(username) if username.validate_email() => {
                errors.push(FieldError::new("username", "Username cannot be an email."))
            }
            _ => {}
        }

        match self.password.as_deref() {
            None | Some("") => errors.push(FieldError::new("password", "Password is required")),
            Some(password) if password.len() < MIN_PASSWORD_LENGTH => {
                errors.push(FieldError::new("password", "Password must be 6 characters or more."))
            }
            _ => {}
        }

        errors
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub credential: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            first_name: Some("Demo".into()),
            last_name: Some("User".into()),
            email: Some("demo@user.io".into()),
            username: Some("demo-user".into()),
            password: Some("password".into()),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(valid_signup().validate_fields().is_empty());
    }

    #[test]
    fn missing_fields_collected_together() {
        let req = SignupRequest {
            first_name: None,
            last_name: None,
            email: None,
            username: None,
            password: None,
        };
        assert_eq!(req.validate_fields().len(), 5);
    }

    #[test]
    fn username_cannot_be_an_email() {
        let mut req = valid_signup();
        req.username = Some("demo@user.io".into());
        let errors = req.validate_fields();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Username cannot be an email.");
    }

    #[test]
    fn short_password_rejected() {
        let mut req = valid_signup();
        req.password = Some("12345".into());
        let errors = req.validate_fields();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }
}
