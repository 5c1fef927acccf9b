//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod balance;
pub mod health;
pub mod statistics;

mod group;

#[cfg(test)]
mod test_support;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(balance::routes())
        .merge(statistics::routes())
}
