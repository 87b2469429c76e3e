use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use rail_catalog::{SeatSelection, Toggle, Train};
use rail_order::orchestrator::upi_intent_link;
use rail_order::CheckoutRequest;
use rail_shared::{Booking, PassengerUpdate, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

/// A selection as the client renders it: layout, chosen seats and running fare.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    #[serde(flatten)]
    pub selection: SeatSelection,
    pub compartments: Vec<String>,
    pub total_fare: i32,
}

pub fn selection_view(selection: &SeatSelection, train: &Train) -> SelectionView {
    SelectionView {
        compartments: selection.compartments(),
        total_fare: selection.total_fare(train.fare),
        selection: selection.clone(),
    }
}

#[derive(Debug, Serialize)]
struct ToggleResponse {
    toggle: Toggle,
    selection: SelectionView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub journey_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    upi_link: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/selection", get(current_selection))
        .route("/v1/selection/seats/{seat_id}", post(toggle_seat))
        .route("/v1/selection/passengers/{seat_id}", put(update_passenger))
        .route("/v1/selection/checkout", post(checkout))
}

fn no_selection() -> AppError {
    AppError::NotFoundError("No train selected".to_string())
}

async fn current_selection(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<SelectionView>, AppError> {
    let selections = state.selections.read().await;
    let selection = selections.get(&claims.sub).ok_or_else(no_selection)?;
    let train = state.catalog.get(selection.train_id())?;
    Ok(Json(selection_view(selection, train)))
}

async fn toggle_seat(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(seat_id): Path<u32>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut selections = state.selections.write().await;
    let selection = selections.get_mut(&claims.sub).ok_or_else(no_selection)?;
    let train = state.catalog.get(selection.train_id())?;
    let toggle = selection.toggle(seat_id)?;
    Ok(Json(ToggleResponse {
        toggle,
        selection: selection_view(selection, train),
    }))
}

async fn update_passenger(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(seat_id): Path<u32>,
    Json(update): Json<PassengerUpdate>,
) -> Result<Json<SelectionView>, AppError> {
    let mut selections = state.selections.write().await;
    let selection = selections.get_mut(&claims.sub).ok_or_else(no_selection)?;
    let train = state.catalog.get(selection.train_id())?;
    selection.update_passenger(seat_id, &update)?;
    Ok(Json(selection_view(selection, train)))
}

/// Pays for the open selection. The selection is kept when checkout fails so the
/// caller can fix it and retry.
async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    let selection = state
        .selections
        .read()
        .await
        .get(&claims.sub)
        .cloned()
        .ok_or_else(no_selection)?;
    let train = state.catalog.get(selection.train_id())?;

    let booking = state
        .checkout
        .checkout(
            &claims.sub,
            CheckoutRequest {
                train,
                selection: &selection,
                journey_date: body.journey_date,
                payment_method: body.payment_method,
                payment_reference: body.payment_reference,
            },
        )
        .await?;
    info!("Booking {} created for {}", booking.booking_id, claims.sub);

    state.selections.write().await.remove(&claims.sub);
    let upi_link = (body.payment_method == PaymentMethod::Upi).then(|| upi_intent_link(booking.total_fare));
    Ok((StatusCode::CREATED, Json(CheckoutResponse { booking, upi_link })))
}
