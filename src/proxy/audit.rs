use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::types::{OrderRequest, OrderResponse};

/// Compliance record written for every order the proxy executes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAuditRecord<'a> {
    pub timestamp: DateTime<Utc>,
    pub username: &'a str,
    pub action: &'static str,
    pub order_data: &'a OrderRequest,
    pub result: AuditResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub order_id: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
}

impl<'a> OrderAuditRecord<'a> {
    pub fn order_executed(
        timestamp: DateTime<Utc>,
        username: &'a str,
        order_data: &'a OrderRequest,
        response: &OrderResponse,
    ) -> Self {
        Self {
            timestamp,
            username,
            action: "ORDER_EXECUTED",
            order_data,
            result: AuditResult {
                order_id: response.order_id.clone(),
                status: response.status.clone(),
            },
        }
    }
}

/// Emits the record on the `audit` tracing target as a single JSON line
pub fn log_order_execution(record: &OrderAuditRecord<'_>) {
    match serde_json::to_string(record) {
        Ok(entry) => info!(target: "audit", entry = %entry, "Order executed"),
        Err(e) => warn!(
            target: "audit",
            username = record.username,
            error = %e,
            "Failed to serialize order audit record"
        ),
    }
}
