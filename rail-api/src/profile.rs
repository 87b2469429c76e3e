use axum::{extract::State, routing::get, Extension, Json, Router};
use rail_shared::{ProfileUpdate, UserProfile};

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/profile", get(get_profile).put(update_profile))
}

/// First authenticated read provisions the profile when the account has none.
async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.profiles.load_or_create(&claims.principal()).await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    state.profiles.load_or_create(&claims.principal()).await?;
    let profile = state.profiles.update(&claims.sub, update).await?;
    Ok(Json(profile))
}
