//! Response helpers shared by the integration tests
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    http::header::SET_COOKIE,
    response::Response,
};

/// Reads the whole response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Returns the raw `Set-Cookie` header, asserting there is one
pub fn set_cookie_header(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap()
        .to_string()
}

/// Turns a `Set-Cookie` header into the `name=value` pair a browser would send back
pub fn session_cookie_from(response: &Response) -> String {
    let header = set_cookie_header(response);
    header
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}
