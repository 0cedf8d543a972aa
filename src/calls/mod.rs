pub mod handlers;
pub mod twilio;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::call_routes()
}
