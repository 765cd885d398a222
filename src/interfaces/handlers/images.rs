use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{errors::AppError, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(claims, state))]
pub async fn delete_spot_image(
    claims: AuthClaims,
    state: web::Data<AppState>,
    image_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state
        .spot_handler
        .delete_image(claims.user_id(), &image_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[instrument(skip(claims, state))]
pub async fn delete_review_image(
    claims: AuthClaims,
    state: web::Data<AppState>,
    image_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state
        .review_handler
        .delete_image(claims.user_id(), &image_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}
