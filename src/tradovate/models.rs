//! Tradovate API data models
//!
//! Request and response types for the upstream REST endpoints the proxy uses.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

// ============================================================================
// Authentication
// ============================================================================

/// Request body for `POST /auth/accesstokenrequest`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    /// End-user's Tradovate username
    pub name: &'a str,
    /// End-user's Tradovate password
    pub password: &'a str,
    /// Operator's application id
    pub app_id: &'a str,
    /// Operator's application secret
    pub app_secret: &'a str,
    pub app_version: &'a str,
}

/// Response from the authentication endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Market data token, issued alongside the access token
    #[serde(default)]
    pub md_access_token: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Set instead of a token when the login is refused
    #[serde(default)]
    pub error_text: Option<String>,
    /// Security challenge that must be completed on Tradovate's site
    #[serde(rename = "p-ticket", default)]
    pub p_ticket: Option<String>,
}

// ============================================================================
// Accounts
// ============================================================================

/// Account as returned by `GET /account/list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub cash_balance: Option<f64>,
    #[serde(default)]
    pub margin_balance: Option<f64>,
    #[serde(rename = "realizedPnL", default)]
    pub realized_pnl: Option<f64>,
    #[serde(rename = "unrealizedPnL", default)]
    pub unrealized_pnl: Option<f64>,
}

/// Request body for `POST /cashBalance/getcashbalance`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashBalanceRequest {
    pub account_id: i64,
}

/// Cash balance snapshot for one account
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashBalance {
    #[serde(default)]
    pub amount: Option<f64>,
}

// ============================================================================
// Orders
// ============================================================================

/// Order action (Buy or Sell)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum OrderAction {
    #[default]
    Buy,
    Sell,
}

/// Order type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum OrderType {
    #[default]
    Market,
    Limit,
    Stop,
    StopLimit,
}

/// Request body for `POST /order/placeorder`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub account_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<i64>,
    pub symbol: String,
    pub action: OrderAction,
    pub order_qty: i64,
    pub order_type: OrderType,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    /// Orders routed through the proxy are always flagged as automated
    pub is_automated: bool,
}
