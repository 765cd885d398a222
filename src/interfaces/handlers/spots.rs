use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::image::{validate_image_url, NewSpotImageRequest},
    entities::spot::{SpotFilters, SpotRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state, query))]
pub async fn list_spots(
    state: web::Data<AppState>,
    query: web::Query<SpotFilters>,
) -> Result<impl Responder, AppError> {
    let filters = query.into_inner();
    let spots = state.spot_handler.list(&filters).await?;

    Ok(HttpResponse::Ok().json(json!({
        "Spots": spots,
        "page": filters.page(),
        "size": filters.size(),
    })))
}

#[instrument(skip(claims, state))]
pub async fn list_own_spots(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let spots = state.spot_handler.list_own(&claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "Spots": spots })))
}

#[instrument(skip(state))]
pub async fn get_spot(
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let detail = state.spot_handler.detail(&spot_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[instrument(skip(claims, state, data))]
pub async fn create_spot(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<SpotRequest>,
) -> Result<impl Responder, AppError> {
    let spot = state
        .spot_handler
        .create(claims.user_id(), data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(spot))
}

#[instrument(skip(claims, state, data))]
pub async fn update_spot(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
    data: web::Json<SpotRequest>,
) -> Result<impl Responder, AppError> {
    let spot = state
        .spot_handler
        .update(claims.user_id(), &spot_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(spot))
}

#[instrument(skip(claims, state))]
pub async fn delete_spot(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.spot_handler.delete(claims.user_id(), &spot_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[instrument(skip(claims, state, data))]
pub async fn add_spot_image(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
    data: web::Json<NewSpotImageRequest>,
) -> Result<impl Responder, AppError> {
    let url = validate_image_url(&data.url).map_err(AppError::Validation)?;
    let image = state
        .spot_handler
        .add_image(claims.user_id(), &spot_id, url, data.preview)
        .await?;

    Ok(HttpResponse::Created().json(image))
}
