use crate::auth::password::{hash_password, verify_password};
use crate::entities::user::{LoginRequest, SafeUser, SignupRequest, User, UserInsert};
use crate::errors::{AppError, AuthError, FieldError};
use crate::interfaces::repositories::token::TokenService;
use crate::interfaces::repositories::user::UserRepository;

/// Successful signup/login: the safe user plus the session token the handler
/// turns into a cookie.
#[derive(Debug)]
pub struct Session {
    pub user: SafeUser,
    pub token: String,
}

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenService,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Registers a new user after validation, duplicate pre-check, and
    /// password hashing, and opens a session for them.
    pub async fn signup(&self, request: SignupRequest) -> Result<Session, AppError> {
        let errors = request.validate_fields();
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        // Fields are present once validation passed.
        let email = request.email.unwrap_or_default();
        let username = request.username.unwrap_or_default();

        if let Some(existing) = self
            .user_repo
            .find_by_email_or_username(&email, &username)
            .await?
        {
            let mut errors = Vec::new();
            if existing.email == email {
                errors.push(FieldError::new("email", "User with that email already exists"));
            }
            if existing.username == username {
                errors.push(FieldError::new(
                    "username",
                    "User with that username already exists",
                ));
            }
            return Err(AppError::Duplicate {
                message: "User already exists".into(),
                errors,
            });
        }

        let password_hash = hash_password(&request.password.unwrap_or_default())?;
        let user = self
            .user_repo
            .create_user(&UserInsert {
                first_name: request.first_name.unwrap_or_default(),
                last_name: request.last_name.unwrap_or_default(),
                email,
                username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user signed up");
        self.open_session(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Session, AppError> {
        let credential = request
            .credential
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthError::MissingCredentials)?;
        let password = request
            .password
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        let user = self
            .user_repo
            .get_by_credential(credential)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !valid {
            return Err(AuthError::WrongCredentials.into());
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.open_session(&user)
    }

    pub async fn restore(&self, user_id: &uuid::Uuid) -> Result<SafeUser, AppError> {
        let user = self
            .user_repo
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::WrongCredentials)?;
        Ok(SafeUser::from(&user))
    }

    fn open_session(&self, user: &User) -> Result<Session, AppError> {
        let token = self.token_service.create_session_token(user).map_err(|e| {
            tracing::warn!("failed to create session token: {}", e);
            AppError::from(AuthError::TokenCreation)
        })?;

        Ok(Session {
            user: SafeUser::from(user),
            token,
        })
    }
}
