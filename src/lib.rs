//! Typed Rust client for the 5sim.net SMS-activation HTTP API.
//!
//! The crate is split into a domain layer of strong types, a private transport
//! layer for wire-format quirks, and a client layer issuing requests:
//!
//! - [`GuestClient`] covers the public `guest/` endpoints;
//! - [`UserClient`] covers everything behind a bearer token;
//! - [`FiveSim`] combines both, resolves [`Operator::Best`] from current
//!   prices and can wait for the first SMS after a purchase.
//!
//! ```rust,no_run
//! use fivesim::{BuyOptions, FiveSim, Operator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fivesim::FiveSimError> {
//!     let client = FiveSim::new("...")?;
//!     let options = BuyOptions {
//!         wait: true,
//!         ..Default::default()
//!     };
//!     let order = client
//!         .buy_activation_number("russia", Operator::Best, "telegram", options)
//!         .await?;
//!     for sms in &order.sms {
//!         println!("{}", sms.code);
//!     }
//!     client.finish_order(order.id).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ErrorKind, FiveSim, FiveSimBuilder, FiveSimError, GuestClient, GuestClientBuilder, UserClient,
    classify, select_best_operator,
};
pub use domain::{
    ApiToken, BuyOptions, CountryInfo, FeeSystem, ForwardingNumber, HostingOptions, Language,
    Notification, Operator, OperatorPricing, Order, OrderCategory, OrderHistory,
    OrderHistoryOptions, OrderId, OrderStatus, Pagination, Payout, PayoutMethod, Prices, Sms,
    SmsInbox, UserProfile, ValidationError, WaitOptions,
};
