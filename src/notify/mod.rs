pub mod handlers;
pub mod mailer;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::notify_routes()
}
