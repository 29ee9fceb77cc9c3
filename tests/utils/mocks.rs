use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

use tradovate_proxy::{
    session::Credential,
    tradovate::{
        Account, AuthResponse, CashBalance, PlaceOrderRequest, TradovateApi, UpstreamError,
    },
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Every token handed out by the mock starts with this, so tests can search
/// responses for leaks
pub const SECRET_TOKEN_PREFIX: &str = "secret-upstream-token";

/// Recorded call against the mock upstream
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamCall {
    Login { name: String },
    ListAccounts { token: String },
    CashBalance { token: String, account_id: i64 },
    PlaceOrder { token: String, order: PlaceOrderRequest },
    ListOrders { token: String, account_id: i64 },
}

#[derive(Clone)]
pub struct MockTradovateApi {
    calls: Arc<RwLock<Vec<UpstreamCall>>>,
    failing_logins: Arc<RwLock<Vec<(String, u16)>>>,
    order_response: Arc<RwLock<Value>>,
}

impl MockTradovateApi {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            failing_logins: Arc::new(RwLock::new(Vec::new())),
            order_response: Arc::new(RwLock::new(json!({
                "orderId": 7001,
                "ordStatus": "Filled"
            }))),
        }
    }

    pub fn token_for(username: &str) -> String {
        format!("{}-{}", SECRET_TOKEN_PREFIX, username)
    }

    /// Makes upstream login fail with 401 for this user
    pub async fn reject_user(&self, username: &str) {
        self.fail_login_for(username, 401).await;
    }

    /// Makes upstream login answer with `status` for this user
    pub async fn fail_login_for(&self, username: &str, status: u16) {
        self.failing_logins
            .write()
            .await
            .push((username.to_string(), status));
    }

    pub async fn set_order_response(&self, response: Value) {
        *self.order_response.write().await = response;
    }

    pub async fn calls(&self) -> Vec<UpstreamCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: UpstreamCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl TradovateApi for MockTradovateApi {
    async fn request_access_token(
        &self,
        name: &str,
        _password: &str,
    ) -> Result<AuthResponse, UpstreamError> {
        self.record(UpstreamCall::Login {
            name: name.to_string(),
        })
        .await;

        let failure = self
            .failing_logins
            .read()
            .await
            .iter()
            .find(|(user, _)| user == name)
            .map(|(_, status)| *status);
        if let Some(status) = failure {
            return Err(UpstreamError::Status {
                status,
                body: "Access is denied".to_string(),
            });
        }

        Ok(AuthResponse {
            access_token: Some(Self::token_for(name)),
            md_access_token: Some(format!("{}-md", Self::token_for(name))),
            user_id: Some(42),
            ..AuthResponse::default()
        })
    }

    async fn list_accounts(&self, access_token: &Credential) -> Result<Vec<Account>, UpstreamError> {
        self.record(UpstreamCall::ListAccounts {
            token: access_token.expose().to_string(),
        })
        .await;

        Ok(vec![
            Account {
                id: 1001,
                name: "DEMO1001".to_string(),
                nickname: Some("Main".to_string()),
                active: true,
                ..Account::default()
            },
            Account {
                id: 1002,
                name: "DEMO1002".to_string(),
                active: false,
                ..Account::default()
            },
        ])
    }

    /// Only account 1001 has a balance; other lookups fail upstream
    async fn get_cash_balance(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<CashBalance, UpstreamError> {
        self.record(UpstreamCall::CashBalance {
            token: access_token.expose().to_string(),
            account_id,
        })
        .await;

        match account_id {
            1001 => Ok(CashBalance {
                amount: Some(25_000.0),
            }),
            _ => Err(UpstreamError::Status {
                status: 404,
                body: "Not found".to_string(),
            }),
        }
    }

    async fn place_order(
        &self,
        access_token: &Credential,
        order: &PlaceOrderRequest,
    ) -> Result<Value, UpstreamError> {
        self.record(UpstreamCall::PlaceOrder {
            token: access_token.expose().to_string(),
            order: order.clone(),
        })
        .await;

        Ok(self.order_response.read().await.clone())
    }

    async fn list_orders(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.record(UpstreamCall::ListOrders {
            token: access_token.expose().to_string(),
            account_id,
        })
        .await;

        Ok(vec![
            json!({ "id": 7001, "accountId": account_id, "ordStatus": "Filled" }),
            json!({ "id": 7002, "accountId": account_id, "ordStatus": "Working" }),
        ])
    }
}
