#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use genre_service::config::Settings;
use genre_service::services::{GenreRegistry, IdAllocation};
use genre_service::{build_router, AppState, Application};
use serde_json::Value;
use tower::util::ServiceExt;

pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

/// Router over a fresh, seeded registry.
pub struct TestRouter {
    pub router: Router,
    pub registry: GenreRegistry,
}

impl TestRouter {
    pub fn new() -> Self {
        Self::with_allocation(IdAllocation::CollectionLength)
    }

    pub fn with_allocation(id_allocation: IdAllocation) -> Self {
        let registry = GenreRegistry::new(id_allocation);
        let state = AppState::new(registry.clone()).with_static_dir(STATIC_DIR);

        Self {
            router: build_router(state),
            registry,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Asserts the plain-text 400 every client error is reported with.
pub async fn assert_bad_request(response: Response, message: &str) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, message);
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let settings = Settings {
            port: 0, // Random port
            static_dir: STATIC_DIR.into(),
            ..Settings::default()
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
