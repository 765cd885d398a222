use crate::entities::{token::Claims, user::User};
use crate::errors::AuthError;

/// Session-token issuing and verification, implemented by the JWT service.
pub trait TokenService: Send + Sync {
    fn create_session_token(&self, user: &User) -> Result<String, AuthError>;
    fn decode_session_token(&self, token: &str) -> Result<Claims, AuthError>;
}
