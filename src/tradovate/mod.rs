//! Tradovate API integration
//!
//! Thin forwarding client for the Tradovate REST API. The proxy never hands
//! Tradovate tokens to the browser; handlers pull them from the session and
//! pass them to this client.
//!
//! # API Endpoints Used
//!
//! - `POST /auth/accesstokenrequest` - Authentication
//! - `GET /account/list` - Get accounts
//! - `POST /cashBalance/getcashbalance` - Cash balance per account
//! - `POST /order/placeorder` - Place orders
//! - `GET /order/list?accountId=...` - List orders

pub mod client;
pub mod models;

pub use client::{TradovateApi, TradovateClient, UpstreamError};
pub use models::{
    Account, AuthResponse, CashBalance, OrderAction, OrderType, PlaceOrderRequest,
};
