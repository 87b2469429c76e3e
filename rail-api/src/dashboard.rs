use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use rail_order::BookingStats;
use rail_shared::Booking;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    display_name: String,
    upcoming_journeys: Vec<Booking>,
    stats: BookingStats,
    unread_notifications: usize,
    sidebar_collapsed: bool,
}

pub fn landing_routes() -> Router<AppState> {
    Router::new().route("/", get(landing))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(dashboard))
}

async fn landing() -> Json<Value> {
    Json(json!({
        "name": "RailConnect",
        "message": "Sign up or log in to book train tickets",
    }))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<DashboardResponse>, AppError> {
    let uid = claims.sub.as_str();
    let profile = state.profiles.load_or_create(&claims.principal()).await?;
    let upcoming_journeys = state.bookings.upcoming_journeys(uid, Utc::now()).await?;
    let stats = state.bookings.booking_stats(uid).await?;
    let unread_notifications = state.notifications.unread_count(uid).await?;

    Ok(Json(DashboardResponse {
        display_name: profile.display_name,
        upcoming_journeys,
        stats,
        unread_notifications,
        sidebar_collapsed: state.preferences.sidebar_collapsed().await,
    }))
}
