use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};

use crate::entities::{token::Claims, user::User};
use crate::errors::AuthError;
use crate::interfaces::repositories::token::TokenService;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }
}

impl TokenService for JwtService {
    fn create_session_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            exp: (now + self.expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    fn decode_session_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn service() -> JwtService {
        let config = AppConfig {
            jwt_secret: "session_secret_for_tests_at_least_32_chars".into(),
            jwt_expiration_minutes: 15,
            ..AppConfig::for_tests()
        };
        JwtService::new(&config)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Demo".into(),
            last_name: "User".into(),
            email: "demo@user.io".into(),
            username: "demo-user".into(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_to_the_same_user() {
        let service = service();
        let user = user();

        let token = service.create_session_token(&user).unwrap();
        let claims = service.decode_session_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.username, user.username);
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        let result = service().decode_session_token("not.a.token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
