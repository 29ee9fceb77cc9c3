#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{header::COOKIE, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use tradovate_proxy::{
    config::AppConfig,
    proxy,
    session::{clock::ManualClock, InMemorySessionRepository, SessionConfig},
    shared::AppState,
};

use super::{assertions::session_cookie_from, mocks::MockTradovateApi};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub clock: Arc<ManualClock>,
    pub session_repository: Arc<InMemorySessionRepository>,
    pub tradovate: Arc<MockTradovateApi>,
}

pub struct TestSetupBuilder {
    config: AppConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    pub fn with_secure_cookies(mut self) -> Self {
        self.config.secure_cookies = true;
        self
    }

    pub fn build(self) -> TestSetup {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let session_repository = Arc::new(
            InMemorySessionRepository::new(self.config.session.clone()).with_clock(clock.clone()),
        );
        let tradovate = Arc::new(MockTradovateApi::new());

        let state = AppState::new(
            session_repository.clone(),
            tradovate.clone(),
            clock.clone(),
            Arc::new(self.config),
        );

        TestSetup {
            app: proxy::router(state),
            clock,
            session_repository,
            tradovate,
        }
    }
}

impl TestSetup {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Logs in through the API and returns the cookie pair to send back
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_json(
                "/api/tradovate-proxy/login",
                json!({ "username": username, "password": "correct-horse" }),
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "login for {} should succeed", username);
        session_cookie_from(&response)
    }
}
