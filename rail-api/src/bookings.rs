use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rail_order::BookingStats;
use rail_shared::{Booking, BookingStatus, PassengerUpdate};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendRequest {
    pub journey_date: NaiveDate,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings))
        .route("/v1/bookings/upcoming", get(upcoming))
        .route("/v1/bookings/refunds", get(refunds))
        .route("/v1/bookings/stats", get(stats))
        .route("/v1/bookings/search", get(search))
        .route("/v1/bookings/pnr/{pnr}", get(by_pnr))
        .route("/v1/bookings/{booking_id}", get(by_booking_id))
        .route("/v1/bookings/{booking_id}/cancel", post(cancel))
        .route("/v1/bookings/{booking_id}/extend", post(extend))
        .route(
            "/v1/bookings/{booking_id}/passengers/{passenger_id}",
            put(update_passenger),
        )
}

fn not_found() -> AppError {
    AppError::NotFoundError("Booking not found".to_string())
}

/// Someone else's booking is reported exactly like a missing one.
fn owned(booking: Option<Booking>, claims: &SessionClaims) -> Result<Booking, AppError> {
    booking
        .filter(|b| b.user_id == claims.sub)
        .ok_or_else(not_found)
}

async fn require_owned(state: &AppState, claims: &SessionClaims, booking_id: &str) -> Result<Booking, AppError> {
    owned(state.bookings.booking_by_booking_id(booking_id).await?, claims)
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = match filter.status {
        Some(status) => state.bookings.bookings_by_status(&claims.sub, status).await?,
        None => state.bookings.user_bookings(&claims.sub).await?,
    };
    Ok(Json(bookings))
}

async fn upcoming(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.upcoming_journeys(&claims.sub, Utc::now()).await?))
}

async fn refunds(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.refund_history(&claims.sub).await?))
}

async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<BookingStats>, AppError> {
    Ok(Json(state.bookings.booking_stats(&claims.sub).await?))
}

async fn search(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.search_bookings(&claims.sub, &query.q).await?))
}

async fn by_pnr(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(pnr): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.booking_by_pnr(&pnr).await?;
    Ok(Json(owned(booking, &claims)?))
}

async fn by_booking_id(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(require_owned(&state, &claims, &booking_id).await?))
}

async fn cancel(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    require_owned(&state, &claims, &booking_id).await?;
    let cancelled = state.bookings.cancel_booking(&booking_id).await?;
    info!("User {} cancelled {}", claims.sub, booking_id);
    Ok(Json(cancelled))
}

/// The new journey date is taken as midnight UTC, like checkout.
async fn extend(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(booking_id): Path<String>,
    Json(req): Json<ExtendRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    require_owned(&state, &claims, &booking_id).await?;
    let journey_date = Utc.from_utc_datetime(&req.journey_date.and_time(NaiveTime::default()));
    let extended = state.bookings.extend_booking(&booking_id, journey_date).await?;
    Ok((StatusCode::CREATED, Json(extended)))
}

async fn update_passenger(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path((booking_id, passenger_id)): Path<(String, u32)>,
    Json(update): Json<PassengerUpdate>,
) -> Result<Json<Booking>, AppError> {
    require_owned(&state, &claims, &booking_id).await?;
    let booking = state
        .bookings
        .update_passenger_details(&booking_id, passenger_id, &update)
        .await?;
    Ok(Json(booking))
}
