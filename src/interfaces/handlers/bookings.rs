use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::booking::BookingDatesRequest,
    errors::AppError,
    use_cases::bookings::SpotBookings,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn list_current_bookings(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let bookings = state.booking_handler.list_current(&claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "Bookings": bookings })))
}

#[instrument(skip(claims, state))]
pub async fn list_spot_bookings(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let bookings = state
        .booking_handler
        .list_for_spot(claims.user_id(), &spot_id)
        .await?;

    let body = match bookings {
        SpotBookings::Full(bookings) => json!({ "Bookings": bookings }),
        SpotBookings::Limited(bookings) => json!({ "Bookings": bookings }),
    };
    Ok(HttpResponse::Ok().json(body))
}

#[instrument(skip(claims, state, data))]
pub async fn create_booking(
    claims: AuthClaims,
    state: web::Data<AppState>,
    spot_id: web::Path<Uuid>,
    data: web::Json<BookingDatesRequest>,
) -> Result<impl Responder, AppError> {
    let today = Utc::now().date_naive();
    let booking = state
        .booking_handler
        .create(claims.user_id(), &spot_id, &data, today)
        .await?;

    Ok(HttpResponse::Created().json(booking))
}

#[instrument(skip(claims, state, data))]
pub async fn update_booking(
    claims: AuthClaims,
    state: web::Data<AppState>,
    booking_id: web::Path<Uuid>,
    data: web::Json<BookingDatesRequest>,
) -> Result<impl Responder, AppError> {
    let today = Utc::now().date_naive();
    let booking = state
        .booking_handler
        .update(claims.user_id(), &booking_id, &data, today)
        .await?;

    Ok(HttpResponse::Ok().json(booking))
}

#[instrument(skip(claims, state))]
pub async fn delete_booking(
    claims: AuthClaims,
    state: web::Data<AppState>,
    booking_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let today = Utc::now().date_naive();
    state
        .booking_handler
        .delete(claims.user_id(), &booking_id, today)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}
