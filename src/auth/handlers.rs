use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        password,
    },
    error::ApiError,
    extractors::{present, JsonBody},
    state::AppState,
    users::repo_types::NewUser,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (Some(email), Some(plain)) = (present(payload.email), present(payload.password)) else {
        warn!("register without email or password");
        return Err(ApiError::BadRequest);
    };

    // Fast path only; the unique constraint on email is what actually guards duplicates.
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::UserExists);
    }

    let password_hash = password::hash(plain).await?;

    let user = state
        .users
        .create(NewUser {
            username: payload.username,
            email,
            password_hash,
            address: payload.address,
            phone: payload.phone,
            temp: payload.temp,
        })
        .await?;

    let token = state.jwt.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully",
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(plain)) = (present(payload.email), present(payload.password)) else {
        warn!("login without email or password");
        return Err(ApiError::BadRequest);
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::UserNotFound);
    };

    let matches = password::verify(plain, user.password_hash.clone()).await?;
    if !matches {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    let token = state.jwt.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        token,
        id: user.id,
        email: user.email,
    }))
}
