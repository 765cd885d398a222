use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
};

use crate::interfaces::repositories::token::TokenService;
use crate::{entities::token::Claims, AppState};

/// Resolves the session identity from the `token` cookie or a Bearer header
/// and stores the decoded claims in the request extensions. Protected routes
/// are rejected with 401 before they reach a handler; public routes pass
/// through either way, so handlers can still see claims when a valid session
/// accompanies a public request.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let claims = restore_session(&req);
            if let Some(claims) = claims {
                req.extensions_mut().insert(claims);
            } else if !is_public_route(req.path(), req.method().as_str()) {
                tracing::warn!(path = req.path(), "Rejected unauthenticated request");
                return Ok(unauthorized_response(req));
            }

            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    if matches!(
        (path, method),
        ("/", "GET") | ("/api/users", "POST") | ("/api/session", "POST") | ("/api/session", "GET")
    ) {
        return true;
    }

    // Spot browsing is open, but the caller's own listings and a spot's
    // booking calendar are not.
    method == "GET"
        && path.starts_with("/api/spots")
        && path != "/api/spots/current"
        && !path.ends_with("/bookings")
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn restore_session(req: &ServiceRequest) -> Option<Claims> {
    let state = req.app_data::<web::Data<AppState>>()?;
    let token = extract_token(req)?;

    match state.auth_handler.token_service.decode_session_token(&token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Discarding session token: {}", e);
            None
        }
    }
}

fn unauthorized_response(req: ServiceRequest) -> ServiceResponse<BoxBody> {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "message": "Authentication required"
    }));
    req.into_response(response)
}
