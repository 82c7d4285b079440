use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod cookie;
pub mod credentials;
pub mod dto;
pub mod errors;
pub mod gate;
pub mod handlers;
pub mod issuer;
pub mod jwt;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::session_routes())
}
