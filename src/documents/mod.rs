pub mod dto;
pub mod extract;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use dto::Pagination;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
