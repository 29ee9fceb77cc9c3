use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    service::ProxyService,
    types::{
        AccountsResponse, HealthResponse, LoginRequest, LoginResponse, LogoutResponse,
        OrderRequest, OrderResponse, OrdersQuery, OrdersResponse,
    },
};
use crate::session::{
    cookie::{build_session_cookie, clear_session_cookie, extract_session_id},
    SessionModel,
};
use crate::shared::{AppError, AppState};

/// HTTP handler for logging in
///
/// POST /api/tradovate-proxy/login
/// Sets the session cookie; the Tradovate token stays on the server
#[instrument(name = "login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<([(axum::http::HeaderName, String); 1], Json<LoginResponse>), AppError> {
    let Json(request) = payload?;
    let service = ProxyService::from_state(&state);
    let outcome = service.login(request).await?;

    let cookie = build_session_cookie(
        &outcome.session_id,
        state.config.session.lifetime.num_seconds(),
        state.config.secure_cookies,
    );

    Ok(([(SET_COOKIE, cookie)], Json(outcome.response)))
}

/// HTTP handler for logging out
///
/// POST /api/tradovate-proxy/logout
/// Always succeeds and always clears the cookie
#[instrument(name = "logout", skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session_id = extract_session_id(&headers);
    let removed = ProxyService::from_state(&state).logout(session_id.as_deref());

    (
        [(SET_COOKIE, clear_session_cookie(state.config.secure_cookies))],
        Json(LogoutResponse {
            success: true,
            removed,
        }),
    )
}

/// GET /api/tradovate-proxy/accounts
#[instrument(name = "list_accounts", skip(state, session))]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(session): Extension<SessionModel>,
) -> Result<Json<AccountsResponse>, AppError> {
    let accounts = ProxyService::from_state(&state)
        .list_accounts(&session)
        .await?;
    Ok(Json(accounts))
}

/// POST /api/tradovate-proxy/orders
#[instrument(name = "place_order", skip(state, session, payload))]
pub async fn place_order(
    State(state): State<AppState>,
    Extension(session): Extension<SessionModel>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, AppError> {
    let Json(request) = payload?;
    let response = ProxyService::from_state(&state)
        .place_order(&session, request)
        .await?;

    info!(order_id = ?response.order_id, "Order executed");
    Ok(Json(response))
}

/// GET /api/tradovate-proxy/orders?accountId=
#[instrument(name = "list_orders", skip(state, session))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(session): Extension<SessionModel>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<OrdersResponse>, AppError> {
    let orders = ProxyService::from_state(&state)
        .list_orders(&session, query.account_id.as_deref())
        .await?;
    Ok(Json(orders))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.session_repository.session_stats(),
    })
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
