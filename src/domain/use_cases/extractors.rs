use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{entities::token::Claims, errors::AuthError};

/// Extractor for the authenticated session, set by the auth middleware.
/// Rejects with 401 when no valid session is present.
/// Usage: add `claims: AuthClaims` as a handler parameter.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    /// The acting user's id.
    pub fn user_id(&self) -> Uuid {
        self.0.sub
    }
}

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}
