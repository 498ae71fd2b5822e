use askama::Template;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
    pub message: &'static str,
}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        title: "My movie app",
        message: "Welcome to movie genres!",
    }
}

/// Health check endpoint for Docker/K8s liveness checks.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "genre-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
