use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::session::SessionStats;
use crate::tradovate::{Account, OrderAction, OrderType};

/// Request payload for logging in through the proxy
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response for a successful login. Carries no upstream token: the browser
/// only ever receives the session cookie.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LogoutResponse {
    pub success: bool,
    pub removed: bool,
}

/// Account reshaped for the browser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub nickname: String,
    pub balance: f64,
    pub margin_balance: f64,
    #[serde(rename = "realizedPnL")]
    pub realized_pnl: f64,
    #[serde(rename = "unrealizedPnL")]
    pub unrealized_pnl: f64,
    pub active: bool,
    pub account_type: Option<String>,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            nickname: account
                .nickname
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| account.name.clone()),
            name: account.name,
            balance: account.cash_balance.unwrap_or(0.0),
            margin_balance: account.margin_balance.unwrap_or(0.0),
            realized_pnl: account.realized_pnl.unwrap_or(0.0),
            unrealized_pnl: account.unrealized_pnl.unwrap_or(0.0),
            active: account.active,
            account_type: account.account_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AccountsResponse {
    pub success: bool,
    pub accounts: Vec<AccountSummary>,
    /// RFC 3339
    pub timestamp: String,
}

/// Order as submitted by the browser. Everything is optional here so that
/// incomplete orders get a 400 with a useful message instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub account_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub contract_id: Option<i64>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub qty: Option<i64>,
    #[serde(default)]
    pub action: Option<OrderAction>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stop_price: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub order_id: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
    pub message: String,
    pub details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<serde_json::Value>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: SessionStats,
}

/// Browser forms send ids and quantities as strings as often as numbers, so
/// accept either form
fn deserialize_optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntRepr {
        Number(i64),
        Text(String),
    }

    match Option::<IntRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntRepr::Number(id)) => Ok(Some(id)),
        Some(IntRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(IntRepr::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {}", text))),
    }
}
