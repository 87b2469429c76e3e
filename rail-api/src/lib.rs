use axum::{http::Method, middleware::from_fn_with_state, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod preferences;
pub mod profile;
pub mod selection;
pub mod state;
pub mod trains;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public_only = dashboard::landing_routes().route_layer(from_fn_with_state(
        state.clone(),
        middleware::auth::public_only_middleware,
    ));

    let public = Router::new()
        .merge(auth::routes())
        .merge(preferences::routes())
        .merge(trains::routes());

    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(dashboard::routes())
        .merge(profile::routes())
        .merge(trains::protected_routes())
        .merge(selection::routes())
        .merge(bookings::routes())
        .merge(notifications::routes())
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::session_auth_middleware,
        ));

    Router::new()
        .merge(public_only)
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
