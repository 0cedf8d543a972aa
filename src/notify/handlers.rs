use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    error::{Ack, ApiError},
    extractors::JsonBody,
    notify::mailer::Alert,
    state::AppState,
};

/// `username` and `email` are accepted but not part of the alert.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub address: Option<String>,
    pub phone: Option<String>,
    #[allow(dead_code)]
    pub username: Option<String>,
    #[allow(dead_code)]
    pub email: Option<String>,
}

pub fn notify_routes() -> Router<AppState> {
    Router::new().route("/email", post(send_alert))
}

#[instrument(skip(state, payload))]
pub async fn send_alert(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NotifyRequest>,
) -> Result<Json<Ack>, ApiError> {
    let alert = Alert {
        address: payload.address.unwrap_or_default(),
        phone: payload.phone.unwrap_or_default(),
    };
    state.mailer.send_alert(&alert).await?;
    info!(phone = %alert.phone, "alert email sent");
    Ok(Json(Ack::new("Email sent successfully")))
}
