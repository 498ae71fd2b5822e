//! HTTP handlers for genre-service.

pub mod app;
pub mod genres;
