//! Router harness for handler tests.
//!
//! Services run over in-memory stores. The pool points at a closed port, so
//! anything that really needs PostgreSQL fails fast instead of hanging.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::routes::create_router;
use crate::config::ServerConfig;
use crate::models::{Account, Course, Enrollment};
use crate::query::PageResolver;
use crate::repositories::Repositories;
use crate::repositories::memory::MemoryStore;
use crate::services::Services;
use crate::state::AppState;

const UNREACHABLE_DB: &str = "postgres://registry@127.0.0.1:1/registry";

pub struct TestApp {
    router: Router,
    services: Services,
}

impl TestApp {
    /// Must be called inside a tokio runtime; the pool spawns its reaper.
    pub fn new() -> Self {
        let repos = Repositories {
            accounts: Arc::new(MemoryStore::<Account>::new()),
            courses: Arc::new(MemoryStore::<Course>::new()),
            enrollments: Arc::new(MemoryStore::<Enrollment>::new()),
        };
        let services = Services::new(repos, PageResolver::new(10).with_max_per_page(100));
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(UNREACHABLE_DB);
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(250))
            .build_unchecked(manager);

        let state = AppState::from_services(services.clone(), pool);
        Self {
            router: create_router(state, &ServerConfig::default()),
            services,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sends one request; an empty response body comes back as `Value::Null`.
    pub async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(text) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
