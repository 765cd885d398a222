use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::user::{User, UserInsert},
    errors::{AppError, FieldError},
    repositories::sqlx_repo::SqlxUserRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    /// Existing user matching either the email or the username, for the
    /// field-tagged duplicate-signup error.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError>;
    /// Login lookup by email or username.
    async fn get_by_credential(&self, credential: &str) -> Result<Option<User>, AppError>;
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
}

impl SqlxUserRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxUserRepo { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, first_name, last_name, email, username, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique-index race after the pre-check still reports per-field.
            if let sqlx::Error::Database(db_err) = &e {
                match db_err.constraint() {
                    Some("users_email_key") => {
                        return AppError::Duplicate {
                            message: "User already exists".into(),
                            errors: vec![FieldError::new(
                                "email",
                                "User with that email already exists",
                            )],
                        }
                    }
                    Some("users_username_key") => {
                        return AppError::Duplicate {
                            message: "User already exists".into(),
                            errors: vec![FieldError::new(
                                "username",
                                "User with that username already exists",
                            )],
                        }
                    }
                    _ => {}
                }
            }
            AppError::from(e)
        })?;

        Ok(created)
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR username = $2",
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_credential(&self, credential: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 OR username = $1",
        )
        .bind(credential)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
