use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::image::{validate_image_url, NewReviewImageRequest},
    entities::review::ReviewRequest,
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_spot_reviews(
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let reviews = state.review_handler.list_for_spot(&spot_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "Reviews": reviews })))
}

#[instrument(skip(claims, state))]
pub async fn list_current_reviews(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let reviews = state.review_handler.list_current(&claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "Reviews": reviews })))
}

#[instrument(skip(claims, state, data))]
pub async fn create_review(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
    data: web::Json<ReviewRequest>,
) -> Result<impl Responder, AppError> {
    let review = state
        .review_handler
        .create(claims.user_id(), &spot_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(review))
}

#[instrument(skip(claims, state, data))]
pub async fn update_review(
    claims: AuthClaims,
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
    data: web::Json<ReviewRequest>,
) -> Result<impl Responder, AppError> {
    let review = state
        .review_handler
        .update(claims.user_id(), &review_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(review))
}

#[instrument(skip(claims, state))]
pub async fn delete_review(
    claims: AuthClaims,
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state
        .review_handler
        .delete(claims.user_id(), &review_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[instrument(skip(claims, state, data))]
pub async fn add_review_image(
    claims: AuthClaims,
    state: web::Data<AppState>,
    review_id: web::Path<Uuid>,
    data: web::Json<NewReviewImageRequest>,
) -> Result<impl Responder, AppError> {
    let url = validate_image_url(&data.url).map_err(AppError::Validation)?;
    let image = state
        .review_handler
        .add_image(claims.user_id(), &review_id, url)
        .await?;

    Ok(HttpResponse::Created().json(image))
}
