//! Tradovate API client
//!
//! Stateless HTTP client: the operator's app credentials live here, the
//! end-user's access token is passed in per call from the session.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::models::{
    Account, AuthRequest, AuthResponse, CashBalance, CashBalanceRequest, PlaceOrderRequest,
};
use crate::config::TradovateConfig;
use crate::session::models::Credential;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Tradovate returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to reach Tradovate: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response from Tradovate: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations the proxy forwards to Tradovate
#[async_trait]
pub trait TradovateApi {
    /// Exchanges the end-user's credentials for an access token
    async fn request_access_token(
        &self,
        name: &str,
        password: &str,
    ) -> Result<AuthResponse, UpstreamError>;

    async fn list_accounts(&self, access_token: &Credential) -> Result<Vec<Account>, UpstreamError>;

    /// `/account/list` carries no balance; it has to be fetched per account
    async fn get_cash_balance(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<CashBalance, UpstreamError>;

    async fn place_order(
        &self,
        access_token: &Credential,
        order: &PlaceOrderRequest,
    ) -> Result<serde_json::Value, UpstreamError>;

    async fn list_orders(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<Vec<serde_json::Value>, UpstreamError>;
}

/// reqwest-backed implementation of [`TradovateApi`]
pub struct TradovateClient {
    client: Client,
    config: TradovateConfig,
}

impl TradovateClient {
    pub fn new(config: TradovateConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn authorized(&self, request: RequestBuilder, access_token: &Credential) -> RequestBuilder {
        request
            .bearer_auth(access_token.expose())
            .header("Accept", "application/json")
    }

    /// Sends the request and decodes a successful JSON body
    async fn send_json<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<R, UpstreamError> {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint = endpoint, error = %e, "Tradovate request failed to send");
            UpstreamError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                endpoint = endpoint,
                status = status.as_u16(),
                "Tradovate returned an error status"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint = endpoint, status = status.as_u16(), "Tradovate request succeeded");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TradovateApi for TradovateClient {
    #[instrument(skip(self, password))]
    async fn request_access_token(
        &self,
        name: &str,
        password: &str,
    ) -> Result<AuthResponse, UpstreamError> {
        let endpoint = "/auth/accesstokenrequest";
        let body = AuthRequest {
            name,
            password,
            app_id: &self.config.app_id,
            app_secret: &self.config.app_secret,
            app_version: &self.config.app_version,
        };

        let request = self
            .client
            .post(self.url(endpoint))
            .header("Accept", "application/json")
            .json(&body);

        self.send_json(request, endpoint).await
    }

    #[instrument(skip(self, access_token))]
    async fn list_accounts(&self, access_token: &Credential) -> Result<Vec<Account>, UpstreamError> {
        let endpoint = "/account/list";
        let request = self.authorized(self.client.get(self.url(endpoint)), access_token);
        self.send_json(request, endpoint).await
    }

    #[instrument(skip(self, access_token))]
    async fn get_cash_balance(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<CashBalance, UpstreamError> {
        let endpoint = "/cashBalance/getcashbalance";
        let request = self
            .authorized(self.client.post(self.url(endpoint)), access_token)
            .json(&CashBalanceRequest { account_id });
        self.send_json(request, endpoint).await
    }

    #[instrument(skip(self, access_token))]
    async fn place_order(
        &self,
        access_token: &Credential,
        order: &PlaceOrderRequest,
    ) -> Result<serde_json::Value, UpstreamError> {
        let endpoint = "/order/placeorder";
        let request = self
            .authorized(self.client.post(self.url(endpoint)), access_token)
            .json(order);
        self.send_json(request, endpoint).await
    }

    #[instrument(skip(self, access_token))]
    async fn list_orders(
        &self,
        access_token: &Credential,
        account_id: i64,
    ) -> Result<Vec<serde_json::Value>, UpstreamError> {
        let endpoint = "/order/list";
        let request = self
            .authorized(self.client.get(self.url(endpoint)), access_token)
            .query(&[("accountId", account_id)]);
        self.send_json(request, endpoint).await
    }
}
