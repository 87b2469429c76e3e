use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use rail_catalog::{LiveTrain, SeatSelection, Train};
use rail_core::search::TrainSearchRequest;
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::selection::{selection_view, SelectionView};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trains", get(search_trains))
        .route("/v1/tracker", get(live_trains))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/v1/trains/{id}/select", post(select_train))
}

async fn search_trains(
    State(state): State<AppState>,
    Query(request): Query<TrainSearchRequest>,
) -> Result<Json<Vec<Train>>, AppError> {
    request.validate()?;
    Ok(Json(state.catalog.search(&request)))
}

async fn live_trains(State(state): State<AppState>) -> Json<Vec<LiveTrain>> {
    Json(state.tracker.snapshot().await)
}

/// Opens a fresh layout for the train, replacing any selection the caller had.
async fn select_train(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<u32>,
) -> Result<Json<SelectionView>, AppError> {
    let train = state.catalog.get(id)?;
    let selection = SeatSelection::open(train);
    let view = selection_view(&selection, train);
    info!("User {} opened seat layout for train {}", claims.sub, train.number);

    state.selections.write().await.insert(claims.sub, selection);
    Ok(Json(view))
}
