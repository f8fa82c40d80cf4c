/// API routes and handlers
pub mod account;
pub mod admin;
pub mod auth;
pub mod discover;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(auth::routes())
        .merge(discover::routes())
        .merge(account::routes())
        .merge(admin::routes())
}
