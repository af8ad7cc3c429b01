use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::debug;

use crate::{
    dtos, feed,
    error::{AppError, StoreContext},
    models::{FeedItem, TweetId},
    payload,
    state::AppState,
    store::blocking,
    validation::{validated, TWEET_SCHEMA},
};

fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<dtos::TweetBody, AppError> {
    Ok(validated(&TWEET_SCHEMA, payload::decode(headers, body)?)?)
}

pub async fn all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FeedItem>>, AppError> {
    let items = blocking(move || feed::assemble(state.tweets.as_ref(), state.users.as_ref()))
        .await
        .context("Failed to load tweets")?;
    Ok(Json(items))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    let body = parse_body(&headers, &body)?;
    let username = body.username.clone();

    let tweets = state.tweets.clone();
    let id = blocking(move || tweets.create(&body.username, &body.tweet))
        .await
        .context("Failed to post tweet")?;
    debug!(%id, %username, "tweet posted");

    Ok((StatusCode::CREATED, "Tweet posted successfully!"))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let body = parse_body(&headers, &body)?;
    let id: TweetId = id.parse()?;

    let tweets = state.tweets.clone();
    let matched = blocking(move || tweets.update_by_id(id, &body.username, &body.tweet))
        .await
        .context("Failed to update tweet")?;
    if matched == 0 {
        return Err(AppError::NotFound);
    }

    Ok("Tweet updated successfully!")
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    let id: TweetId = id.parse()?;

    let tweets = state.tweets.clone();
    let matched = blocking(move || tweets.delete_by_id(id))
        .await
        .context("Failed to delete tweet")?;
    if matched == 0 {
        return Err(AppError::NotFound);
    }

    Ok("Tweet deleted successfully!")
}
