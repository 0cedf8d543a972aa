use serde::Deserialize;

/// Body of `PATCH /update/:id`. Keys outside this list are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>, // hashed before it reaches the store
    pub address: Option<String>,
    pub phone: Option<String>,
    pub temp: Option<String>,
}
