use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use rail_shared::Notification;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::SessionClaims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationFeed {
    notifications: Vec<Notification>,
    unread_count: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/read-all", post(mark_all_read))
        .route("/v1/notifications/{id}/read", post(mark_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<NotificationFeed>, AppError> {
    let notifications = state.notifications.list(&claims.sub).await?;
    let unread_count = notifications.iter().filter(|n| !n.is_read).count();
    Ok(Json(NotificationFeed {
        notifications,
        unread_count,
    }))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let owned = state
        .notifications
        .list(&claims.sub)
        .await?
        .iter()
        .any(|n| n.id.as_deref() == Some(id.as_str()));
    if !owned {
        return Err(AppError::NotFoundError("Notification not found".to_string()));
    }
    state.notifications.mark_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Value>, AppError> {
    let updated = state.notifications.mark_all_as_read(&claims.sub).await?;
    Ok(Json(json!({ "updated": updated })))
}
