use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::debug;

use crate::{
    dtos,
    error::{AppError, StoreContext},
    payload,
    state::AppState,
    store::blocking,
    validation::{validated, USER_SCHEMA},
};

const SAVE_FAILED: &str = "Failed to save user";

/// `POST /sign-up`. Both a first registration and a repeated one answer 201;
/// the body tells them apart.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    let sign_up: dtos::SignUp = validated(&USER_SCHEMA, payload::decode(&headers, &body)?)?;
    let username = sign_up.username.clone();

    let users = state.users.clone();
    let registered = blocking(move || {
        if users.find_by_username(&sign_up.username)?.is_some() {
            return Ok(false);
        }
        users.create(&sign_up.username, &sign_up.avatar)
    })
    .await
    .context(SAVE_FAILED)?;

    if !registered {
        debug!(%username, "returning user");
        return Ok((StatusCode::CREATED, "Welcome back!"));
    }

    debug!(%username, "user registered");
    Ok((StatusCode::CREATED, "User registered successfully!"))
}
