use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarPreference {
    pub sidebar_collapsed: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/preferences/sidebar", get(get_sidebar).put(set_sidebar))
        .route("/v1/preferences/sidebar/toggle", post(toggle_sidebar))
}

async fn get_sidebar(State(state): State<AppState>) -> Json<SidebarPreference> {
    Json(SidebarPreference {
        sidebar_collapsed: state.preferences.sidebar_collapsed().await,
    })
}

async fn set_sidebar(
    State(state): State<AppState>,
    Json(pref): Json<SidebarPreference>,
) -> Result<Json<SidebarPreference>, AppError> {
    state.preferences.set_sidebar_collapsed(pref.sidebar_collapsed).await?;
    Ok(Json(pref))
}

async fn toggle_sidebar(State(state): State<AppState>) -> Result<Json<SidebarPreference>, AppError> {
    let sidebar_collapsed = state.preferences.toggle_sidebar().await?;
    Ok(Json(SidebarPreference { sidebar_collapsed }))
}
