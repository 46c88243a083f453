use crate::state::AppState;
use axum::Router;

pub mod cookie;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod password;
pub mod role;
pub mod token;
pub(crate) mod validate;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
