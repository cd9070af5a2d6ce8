//! Route groups mounted by [`crate::create_app`].

pub mod business;
pub mod calculator;
pub mod estimates;
pub mod experts;
pub mod menu;
pub mod root;

use axum::Router;

use crate::state::AppState;

/// All `/api/*` routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/business", business::router())
        .nest("/calculator", calculator::router())
        .nest("/menu", menu::router())
        .nest("/estimates", estimates::router())
        .nest("/experts", experts::router())
}
