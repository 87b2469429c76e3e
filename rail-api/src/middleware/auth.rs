use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rail_core::SessionPrincipal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

impl SessionClaims {
    pub fn principal(&self) -> SessionPrincipal {
        SessionPrincipal {
            uid: self.sub.clone(),
            email: self.email.clone(),
            display_name: self.name.clone(),
        }
    }
}

pub fn issue_token(auth: &AuthConfig, principal: &SessionPrincipal) -> Result<String, AppError> {
    let claims = SessionClaims {
        sub: principal.uid.clone(),
        email: principal.email.clone(),
        name: principal.display_name.clone(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn session_claims(auth: &AuthConfig, headers: &HeaderMap) -> Option<SessionClaims> {
    let Authorization(bearer) = headers.typed_get::<Authorization<Bearer>>()?;
    decode::<SessionClaims>(
        bearer.token(),
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

// ============================================================================
// Route guards
// ============================================================================

/// Rejects requests without a valid session token and hands the claims to the handler.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = session_claims(&state.auth, req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Signed-in callers are sent to the dashboard instead.
pub async fn public_only_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if session_claims(&state.auth, req.headers()).is_some() {
        return Redirect::to("/v1/dashboard").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn auth() -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    fn principal() -> SessionPrincipal {
        SessionPrincipal {
            uid: "uid-1".to_string(),
            email: "asha@example.com".to_string(),
            display_name: "Asha".to_string(),
        }
    }

    #[test]
    fn test_issued_token_round_trips_claims() {
        let token = issue_token(&auth(), &principal()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());

        let claims = session_claims(&auth(), &headers).unwrap();
        assert_eq!(claims.principal(), principal());
    }

    #[test]
    fn test_foreign_or_missing_token_is_rejected() {
        let other = AuthConfig {
            secret: "other-secret".to_string(),
            expiration: 3600,
        };
        let token = issue_token(&other, &principal()).unwrap();
        let mut headers = HeaderMap::new();
        assert!(session_claims(&auth(), &headers).is_none());

        headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        assert!(session_claims(&auth(), &headers).is_none());
    }
}
