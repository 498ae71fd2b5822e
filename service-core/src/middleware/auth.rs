use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Decides whether a request may reach the routes behind it.
///
/// Handlers never depend on this; swapping the implementation only changes
/// what the middleware admits.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, parts: &Parts) -> Result<(), AppError>;
}

pub type SharedAuthenticator = Arc<dyn Authenticator>;

/// Admits every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

#[async_trait]
impl Authenticator for PassThrough {
    async fn authenticate(&self, parts: &Parts) -> Result<(), AppError> {
        tracing::trace!(path = %parts.uri.path(), "Authenticating...");
        Ok(())
    }
}

pub async fn authentication_middleware(
    State(authenticator): State<SharedAuthenticator>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    authenticator.authenticate(&parts).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
