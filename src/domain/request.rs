use std::time::Duration;

use crate::domain::value::{FeeSystem, ForwardingNumber, OrderCategory, PayoutMethod};

/// Default delay between two order status checks while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Paging and ordering for history endpoints.
///
/// Unset fields are omitted from the query string. 5sim owns the semantics;
/// no local defaults or bounds are applied.
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order: Option<String>,
    pub reverse: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHistoryOptions {
    pub pagination: Pagination,
    pub category: Option<OrderCategory>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Options for `buy/activation`.
pub struct BuyOptions {
    pub forwarding: Option<bool>,
    pub number: Option<ForwardingNumber>,
    pub reuse: Option<bool>,
    pub voice: Option<bool>,
    pub referral: Option<String>,
    /// Price ceiling; 5sim only honors it when the operator is `any`.
    pub max_price: Option<f64>,
    /// Wait for the first SMS after purchase. Never sent to 5sim.
    pub wait: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Options for `buy/hosting`. Hosting purchases take no remote options.
pub struct HostingOptions {
    /// Wait for the first SMS after purchase.
    pub wait: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How long to wait for an order to move from `PENDING` to `RECEIVED`.
pub struct WaitOptions {
    pub poll_interval: Duration,
    /// `None` waits until 5sim reports a terminal status.
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Vendor withdrawal request (`vendor/withdraw`).
pub struct Payout {
    pub receiver: String,
    pub method: PayoutMethod,
    /// Amount as a decimal string, forwarded verbatim.
    pub amount: String,
    pub fee: FeeSystem,
}
