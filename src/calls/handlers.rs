use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    extractors::{present, JsonBody},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResponse {
    pub success: bool,
    pub message: &'static str,
    pub call_sid: String,
}

pub fn call_routes() -> Router<AppState> {
    Router::new().route("/call", post(place_call))
}

#[instrument(skip(state, payload))]
pub async fn place_call(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CallRequest>,
) -> Result<Json<CallResponse>, ApiError> {
    let phone = present(payload.phone)
        .ok_or_else(|| ApiError::CallFailed(anyhow::anyhow!("no phone number given")))?;

    let call_sid = state
        .calls
        .place_call(&phone)
        .await
        .map_err(ApiError::CallFailed)?;

    info!(%call_sid, "outbound call placed");
    Ok(Json(CallResponse {
        success: true,
        message: "تم الاتصال بنجاح",
        call_sid,
    }))
}
