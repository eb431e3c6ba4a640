//! tresor-gx library - gamification service
//!
//! Points ledger, level calculator, achievement checker and the read models
//! behind the profile and leaderboard pages.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod achievements;
pub mod api;
pub mod db;
pub mod error;
pub mod ledger;
pub mod levels;
pub mod pagination;
pub mod summary;

pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Shared secret for signed POST bodies (0 disables checking)
    pub shared_secret: i64,
    /// Leaderboard size when the request gives no `limit`
    pub leaderboard_default_limit: i64,
}

impl AppState {
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        Self {
            db,
            shared_secret,
            leaderboard_default_limit: tresor_common::db::DEFAULT_LEADERBOARD_LIMIT,
        }
    }

    pub fn with_leaderboard_limit(mut self, limit: i64) -> Self {
        self.leaderboard_default_limit = limit;
        self
    }
}

/// Build application router
///
/// POST routes require a signed body, GET routes are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/api/points/award", post(api::points::award))
        .route(
            "/api/users/:user_id/achievements/check",
            post(api::achievements::check),
        )
        .route("/api/profiles", post(api::profiles::upsert))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .route("/api/users/:user_id/summary", get(api::users::get_summary))
        .route("/api/users/:user_id/level", get(api::users::get_level))
        .route(
            "/api/users/:user_id/activities",
            get(api::users::get_activities),
        )
        .route(
            "/api/users/:user_id/activities.csv",
            get(api::users::export_activities),
        )
        .route(
            "/api/leaderboard",
            get(api::leaderboard::get_leaderboard_json),
        )
        .route(
            "/api/leaderboard.csv",
            get(api::leaderboard::export_leaderboard),
        )
        .route(
            "/api/achievements",
            get(api::achievements::list_achievements),
        )
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
