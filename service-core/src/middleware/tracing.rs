use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is passed through unchanged.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Caller-supplied id, if it is short, non-empty, visible ASCII.
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();

        let acceptable = !id.is_empty()
            && id.len() <= MAX_REQUEST_ID_LEN
            && id.bytes().all(|b| b.is_ascii_graphic());

        acceptable.then(|| RequestId(id.to_string()))
    }

    fn generate() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

/// Tags the request and its response with an `x-request-id`, reusing the
/// caller's when acceptable.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(req.headers()).unwrap_or_else(RequestId::generate);
    let header_value = HeaderValue::from_str(&request_id.0).ok();

    if let Some(value) = &header_value {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }
    req.extensions_mut().insert(request_id);

    let mut response = next.run(req).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Per-request trace event, ahead of any routing.
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        "Logging..."
    );

    next.run(req).await
}
