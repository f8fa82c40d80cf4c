/// Shared helpers for router tests
use amora::{
    config::ServerConfig,
    context::AppContext,
    matching::ScriptedMatching,
    server::build_router,
    store::{DocumentStore, MemoryStore},
};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub ctx: AppContext,
    pub router: Router,
}

/// Router over an in-memory store; profiles "2" and "4" always match
pub fn test_app() -> TestApp {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let matching = Arc::new(
        ScriptedMatching::new()
            .matching(["2", "4"])
            .new_profiles(["1", "3"]),
    );
    let ctx = AppContext::with_store(ServerConfig::default(), store, matching);
    TestApp {
        router: build_router(ctx.clone()),
        ctx,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn admin_login(&self) {
        let (status, _) = self
            .post(
                "/api/admin/login",
                serde_json::json!({ "username": "admin", "password": "admin123" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}
