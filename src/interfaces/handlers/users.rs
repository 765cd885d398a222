use actix_web::{cookie::Cookie, web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::user::{LoginRequest, SignupRequest},
    errors::AppError,
    use_cases::auth::Session,
    use_cases::extractors::AuthClaims,
    AppState,
};

fn session_cookie(session: &Session) -> Cookie<'static> {
    Cookie::build("token", session.token.clone())
        .path("/")
        .http_only(true)
        .finish()
}

#[instrument(skip(state, data))]
pub async fn signup(
    state: web::Data<AppState>,
    data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let session = state.auth_handler.signup(data.into_inner()).await?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&session))
        .json(json!({ "user": session.user })))
}

#[instrument(skip(state, data))]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = state.auth_handler.login(data.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session))
        .json(json!({ "user": session.user })))
}

/// Returns the session user, or `user: null` when no valid session
/// accompanies the request.
#[instrument(skip(claims, state))]
pub async fn restore_session(
    claims: Option<AuthClaims>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let user = match claims {
        Some(claims) => Some(state.auth_handler.restore(&claims.user_id()).await?),
        None => None,
    };

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
