use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use rail_core::{FederatedAssertion, SessionPrincipal};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::{issue_token, SessionClaims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: SessionPrincipal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/federated", post(federated))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/v1/auth/logout", post(logout))
}

fn session_response(state: &AppState, user: SessionPrincipal) -> Result<Json<AuthResponse>, AppError> {
    let token = issue_token(&state.auth, &user)?;
    Ok(Json(AuthResponse { token, user }))
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = state
        .accounts
        .sign_up(&req.email, &req.password, req.display_name.as_deref())
        .await?;
    info!("Account {} created", user.uid);
    Ok((StatusCode::CREATED, session_response(&state, user)?))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.accounts.sign_in(&req.email, &req.password).await?;
    session_response(&state, user)
}

async fn federated(
    State(state): State<AppState>,
    Json(assertion): Json<FederatedAssertion>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.accounts.sign_in_federated(&assertion).await?;
    session_response(&state, user)
}

async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<StatusCode, AppError> {
    state.accounts.sign_out().await?;
    state.selections.write().await.remove(&claims.sub);
    Ok(StatusCode::NO_CONTENT)
}
