use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    audit::{log_order_execution, OrderAuditRecord},
    types::{
        AccountSummary, AccountsResponse, LoginRequest, LoginResponse, OrderRequest,
        OrderResponse, OrdersResponse,
    },
};
use crate::session::{clock::Clock, Credential, NewSession, SessionModel, SessionRepository};
use crate::shared::{AppError, AppState};
use crate::tradovate::{AuthResponse, PlaceOrderRequest, TradovateApi, UpstreamError};

/// Result of a successful login: the cookie value and the client-safe body
#[derive(Debug)]
pub struct LoginOutcome {
    pub session_id: String,
    pub response: LoginResponse,
}

/// Service for the proxy's business logic: authenticate against Tradovate,
/// then forward calls using the token held in the session
pub struct ProxyService {
    session_repository: Arc<dyn SessionRepository + Send + Sync>,
    tradovate: Arc<dyn TradovateApi + Send + Sync>,
    clock: Arc<dyn Clock>,
    session_lifetime: Duration,
}

impl ProxyService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        tradovate: Arc<dyn TradovateApi + Send + Sync>,
        clock: Arc<dyn Clock>,
        session_lifetime: Duration,
    ) -> Self {
        Self {
            session_repository,
            tradovate,
            clock,
            session_lifetime,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::clone(&state.session_repository),
            Arc::clone(&state.tradovate),
            Arc::clone(&state.clock),
            state.config.session.lifetime,
        )
    }

    /// Logs the user in upstream and opens a session holding their token
    #[instrument(skip(self, request), fields(username = ?request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        let (username, password) = match (request.username, request.password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                (username.trim().to_string(), password)
            }
            _ => return Err(AppError::bad_request("Username and password are required")),
        };

        info!(username = %username, "Attempting Tradovate login");

        let auth = self
            .tradovate
            .request_access_token(&username, &password)
            .await
            .map_err(|e| login_failure(e, &username))?;

        let access_token = accept_auth_response(&auth, &username)?;

        let new_session = NewSession::new(
            username.clone(),
            auth.user_id,
            Credential::new(access_token),
            auth.md_access_token.clone().map(Credential::new),
            self.clock.now(),
            self.session_lifetime,
        );
        let session_id = self.session_repository.create_session(new_session);

        info!(username = %username, session_id = %session_id, "Login successful");

        Ok(LoginOutcome {
            session_id,
            response: LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                username,
                user_id: auth.user_id,
            },
        })
    }

    /// Drops the session named by the cookie, if any. Safe to repeat.
    #[instrument(skip(self))]
    pub fn logout(&self, session_id: Option<&str>) -> bool {
        let removed = session_id
            .map(|id| self.session_repository.remove_session(id))
            .unwrap_or(false);
        info!(removed = removed, "Logout processed");
        removed
    }

    #[instrument(skip(self, session), fields(username = %session.username))]
    pub async fn list_accounts(&self, session: &SessionModel) -> Result<AccountsResponse, AppError> {
        let mut accounts = self
            .tradovate
            .list_accounts(&session.access_token)
            .await
            .map_err(|e| AppError::from_upstream(e, "Failed to fetch accounts"))?;

        // A missing balance is reported as zero rather than failing the listing
        for account in accounts.iter_mut().filter(|a| a.cash_balance.is_none()) {
            match self
                .tradovate
                .get_cash_balance(&session.access_token, account.id)
                .await
            {
                Ok(balance) => account.cash_balance = balance.amount,
                Err(e) => warn!(account_id = account.id, error = %e, "Failed to fetch cash balance"),
            }
        }

        let accounts: Vec<AccountSummary> = accounts.into_iter().map(AccountSummary::from).collect();
        info!(account_count = accounts.len(), "Accounts fetched");

        Ok(AccountsResponse {
            success: true,
            accounts,
            timestamp: self.clock.now().to_rfc3339(),
        })
    }

    #[instrument(skip(self, session), fields(username = %session.username))]
    pub async fn place_order(
        &self,
        session: &SessionModel,
        request: OrderRequest,
    ) -> Result<OrderResponse, AppError> {
        let order = to_upstream_order(&request)?;

        info!(
            account_id = order.account_id,
            symbol = %order.symbol,
            action = %order.action,
            order_type = %order.order_type,
            qty = order.order_qty,
            "Placing order"
        );

        let details = self
            .tradovate
            .place_order(&session.access_token, &order)
            .await
            .map_err(|e| AppError::from_upstream(e, "Failed to execute order"))?;

        if let Some(reason) = rejection_reason(&details) {
            warn!(reason = %reason, "Order rejected by Tradovate");
            return Err(AppError::Upstream {
                status: axum::http::StatusCode::BAD_REQUEST,
                message: "Order rejected by Tradovate".to_string(),
                details: Some(reason),
            });
        }

        let response = OrderResponse {
            success: true,
            order_id: details.get("id").or_else(|| details.get("orderId")).cloned(),
            status: details.get("status").or_else(|| details.get("ordStatus")).cloned(),
            message: "Order executed successfully".to_string(),
            details,
        };

        log_order_execution(&OrderAuditRecord::order_executed(
            self.clock.now(),
            &session.username,
            &request,
            &response,
        ));

        Ok(response)
    }

    #[instrument(skip(self, session), fields(username = %session.username))]
    pub async fn list_orders(
        &self,
        session: &SessionModel,
        account_id: Option<&str>,
    ) -> Result<OrdersResponse, AppError> {
        let account_id = match account_id.map(str::trim) {
            Some(id) if !id.is_empty() => id
                .parse::<i64>()
                .map_err(|_| AppError::bad_request("accountId must be numeric"))?,
            _ => return Err(AppError::bad_request("accountId is required")),
        };

        let orders = self
            .tradovate
            .list_orders(&session.access_token, account_id)
            .await
            .map_err(|e| AppError::from_upstream(e, "Failed to fetch orders"))?;

        Ok(OrdersResponse {
            success: true,
            count: orders.len(),
            orders,
        })
    }
}

fn mentions_app_id(text: &str) -> bool {
    text.to_ascii_lowercase().contains("app id")
}

fn invalid_app_config() -> AppError {
    AppError::BadRequest {
        message: "Invalid API configuration. Set TRADOVATE_APP_ID and TRADOVATE_APP_SECRET."
            .to_string(),
        details: Some("Running with the sample app id - limited functionality".to_string()),
    }
}

fn login_failure(error: UpstreamError, username: &str) -> AppError {
    match error {
        UpstreamError::Status { status: 401, .. } => {
            warn!(username = %username, "Tradovate rejected credentials");
            AppError::Unauthorized("Invalid username or password".to_string())
        }
        UpstreamError::Status { ref body, .. } if mentions_app_id(body) => {
            warn!(username = %username, "Tradovate rejected the app credentials");
            invalid_app_config()
        }
        other => {
            warn!(username = %username, error = %other, "Tradovate login failed");
            AppError::UpstreamUnavailable("Failed to connect to Tradovate".to_string())
        }
    }
}

/// Tradovate answers refused logins with 200 and an `errorText`, so the body
/// needs checking even on success
fn accept_auth_response(auth: &AuthResponse, username: &str) -> Result<String, AppError> {
    if let Some(error_text) = &auth.error_text {
        warn!(username = %username, error_text = %error_text, "Tradovate refused login");
        return Err(if mentions_app_id(error_text) {
            invalid_app_config()
        } else {
            AppError::Unauthorized("Invalid username or password".to_string())
        });
    }

    if auth.p_ticket.is_some() {
        warn!(username = %username, "Tradovate requires additional verification");
        return Err(AppError::Unauthorized(
            "Additional verification required. Complete it on the Tradovate website first."
                .to_string(),
        ));
    }

    auth.access_token
        .clone()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::UpstreamUnavailable("Tradovate did not return an access token".to_string())
        })
}

/// Validates the browser's order and fills in defaults
fn to_upstream_order(request: &OrderRequest) -> Result<PlaceOrderRequest, AppError> {
    let incomplete = || AppError::bad_request("Incomplete order data");

    let account_id = request.account_id.ok_or_else(incomplete)?;
    let symbol = request
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(incomplete)?;
    let qty = request.qty.filter(|q| *q > 0).ok_or_else(incomplete)?;

    Ok(PlaceOrderRequest {
        account_id,
        contract_id: request.contract_id,
        symbol: symbol.to_string(),
        action: request.action.unwrap_or_default(),
        order_qty: qty,
        order_type: request.order_type.unwrap_or_default(),
        price: request.price,
        stop_price: request.stop_price,
        is_automated: true,
    })
}

fn rejection_reason(details: &Value) -> Option<String> {
    ["errorText", "failureText"]
        .iter()
        .find_map(|key| details.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
