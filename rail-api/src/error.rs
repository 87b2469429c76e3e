use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rail_catalog::{CatalogError, SelectionError};
use rail_core::{CoreError, IdentityError, ProfileError};
use rail_order::{BookingError, NotificationError};
use rail_store::PreferencesError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// Business rule refused the request.
    PolicyError(String),
    /// Store failure with a message safe to show the user.
    StoreError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::PolicyError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::StoreError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
            CoreError::PolicyViolation(msg) => Self::PolicyError(msg),
            CoreError::InternalError(msg) => Self::InternalServerError(msg),
        }
    }
}

/// Callers only learn that authentication failed, never why.
impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        tracing::warn!("Authentication failed: {}", err);
        Self::AuthenticationError("Authentication failed".to_string())
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(_) => Self::NotFoundError(err.to_string()),
            ProfileError::Store { .. } => Self::StoreError(err.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Store { .. } => Self::StoreError(err.to_string()),
            BookingError::NotFound(_) => Self::NotFoundError(err.to_string()),
            BookingError::Core(core) => core.into(),
            BookingError::NotCancellable(_)
            | BookingError::NotExtendable(_)
            | BookingError::Payment(_) => Self::PolicyError(err.to_string()),
            BookingError::InvalidTransition { .. } => Self::ConflictError(err.to_string()),
        }
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        Self::NotFoundError(err.to_string())
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::UnknownSeat(_) | SelectionError::NotSelected(_) => {
                Self::NotFoundError(err.to_string())
            }
            SelectionError::SeatReserved(_) => Self::ConflictError(err.to_string()),
            SelectionError::SeniorBerthPolicy => Self::PolicyError(err.to_string()),
        }
    }
}

impl From<PreferencesError> for AppError {
    fn from(err: PreferencesError) -> Self {
        Self::Anyhow(err.into())
    }
}
