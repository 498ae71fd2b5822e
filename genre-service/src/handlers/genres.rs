use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;

use crate::dtos::{parse_id, GenrePayload};
use crate::models::Genre;
use crate::services::NOT_FOUND_MESSAGE;
use crate::startup::AppState;

fn resolve_id(raw: &str) -> Result<i64, AppError> {
    parse_id(raw).ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}

pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<Genre>> {
    Json(state.registry.list().await)
}

#[tracing::instrument(skip(state))]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Genre>, AppError> {
    let id = resolve_id(&id)?;

    Ok(Json(state.registry.get(id).await?))
}

#[tracing::instrument(skip(state, payload))]
pub async fn create_genre(
    State(state): State<AppState>,
    GenrePayload(payload): GenrePayload,
) -> Result<Json<Genre>, AppError> {
    let genre = payload.into_genre()?;
    let created = state.registry.create(genre).await;

    tracing::info!(id = created.id, genre = %created.genre, "Genre created");

    Ok(Json(created))
}

/// Unknown ids are reported before anything is said about the body.
#[tracing::instrument(skip(state, payload))]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<GenrePayload, AppError>,
) -> Result<Json<Genre>, AppError> {
    let id = resolve_id(&id)?;
    state.registry.get(id).await?;

    let GenrePayload(payload) = payload?;
    let genre = payload.into_genre()?;
    let updated = state.registry.update(id, genre).await?;

    tracing::info!(id = updated.id, genre = %updated.genre, "Genre updated");

    Ok(Json(updated))
}

#[tracing::instrument(skip(state))]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Genre>, AppError> {
    let id = resolve_id(&id)?;
    let removed = state.registry.delete(id).await?;

    tracing::info!(id = removed.id, genre = %removed.genre, "Genre deleted");

    Ok(Json(removed))
}
