use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::password,
    error::{ApiError, Data},
    extractors::JsonBody,
    state::AppState,
    users::{
        dto::UpdateUserRequest,
        repo_types::{User, UserChanges},
    },
};

pub const HEALTH_TEXT: &str = "✅ Server is running successfully!";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/all", get(list_users))
        .route("/:id", get(get_user))
        .route("/update/:id", patch(update_user))
}

pub async fn health() -> &'static str {
    HEALTH_TEXT
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Data<Vec<User>>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(Data::new(users)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Data<User>>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::InvalidId)?;
    let user = state.users.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(Data::new(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<Data<User>>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|e| ApiError::Server(anyhow::Error::new(e).context("malformed user id")))?;

    let password_hash = match payload.password {
        Some(plain) => Some(password::hash(plain).await?),
        None => None,
    };
    let changes = UserChanges {
        username: payload.username,
        email: payload.email,
        password_hash,
        address: payload.address,
        phone: payload.phone,
        temp: payload.temp,
    };

    let updated = if changes.is_empty() {
        state.users.find_by_id(id).await?
    } else {
        state.users.update(id, changes).await?
    };

    match updated {
        Some(user) => {
            info!(user_id = %user.id, "user updated");
            Ok(Json(Data::new(user)))
        }
        None => {
            warn!(user_id = %id, "update of unknown user");
            Err(ApiError::NotFound)
        }
    }
}
