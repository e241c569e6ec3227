use std::future::Future;

use serde_json::Value;

use super::waiter::{poll_until_received, poll_until_received_or_cancel};
use super::{Endpoint, FiveSimError, HttpMethod};
use crate::domain::{
    ApiToken, BuyOptions, Order, OrderHistory, OrderHistoryOptions, OrderId, Pagination,
    PaymentHistory, Payout, PriceLimit, SmsInbox, UserProfile, VendorPaymentHistory,
    VendorProfile, VendorWallets, WaitOptions,
};
use crate::transport::{self, TransportError};

#[derive(Clone)]
/// Authenticated 5sim client.
///
/// Every request carries `Authorization: Bearer <token>`. The token is fixed
/// at construction, so one client can be shared across concurrent tasks.
pub struct UserClient {
    token: ApiToken,
    endpoint: Endpoint,
}

impl UserClient {
    /// Create a client against the default endpoint.
    ///
    /// Fails with [`FiveSimError::Configuration`] for an empty token; nothing
    /// is sent over the network.
    pub fn new(token: impl Into<String>) -> Result<Self, FiveSimError> {
        let token = ApiToken::new(token)?;
        Ok(Self::from_parts(token, Endpoint::default_reqwest()))
    }

    pub(super) fn from_parts(token: ApiToken, endpoint: Endpoint) -> Self {
        Self { token, endpoint }
    }

    async fn call<T>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: Vec<(String, String)>,
        body: Option<Value>,
        decode: impl FnOnce(&str) -> Result<T, TransportError>,
    ) -> Result<T, FiveSimError> {
        self.endpoint
            .fetch(method, segments, query, Some(&self.token), body, decode)
            .await
    }

    async fn get<T>(
        &self,
        segments: &[&str],
        query: Vec<(String, String)>,
        decode: impl FnOnce(&str) -> Result<T, TransportError>,
    ) -> Result<T, FiveSimError> {
        self.call(HttpMethod::Get, segments, query, None, decode)
            .await
    }

    async fn order_action(&self, action: &str, id: OrderId) -> Result<Order, FiveSimError> {
        let id = id.to_string();
        self.get(&["user", action, id.as_str()], Vec::new(), transport::decode_order)
            .await
    }

    /// Account profile (`user/profile`).
    pub async fn profile(&self) -> Result<UserProfile, FiveSimError> {
        self.get(&["user", "profile"], Vec::new(), transport::decode_user_profile)
            .await
    }

    /// Orders of this account (`user/orders`), optionally filtered by category.
    pub async fn order_history(
        &self,
        options: &OrderHistoryOptions,
    ) -> Result<OrderHistory, FiveSimError> {
        self.get(
            &["user", "orders"],
            transport::encode_order_history_query(options),
            transport::decode_order_history,
        )
        .await
    }

    /// Balance movements of this account (`user/payments`).
    pub async fn payment_history(
        &self,
        pagination: &Pagination,
    ) -> Result<PaymentHistory, FiveSimError> {
        self.get(
            &["user", "payments"],
            transport::encode_pagination_query(pagination),
            transport::decode_payment_history,
        )
        .await
    }

    /// Price ceilings configured for this account (`user/max-prices`).
    pub async fn price_limits(&self) -> Result<Vec<PriceLimit>, FiveSimError> {
        self.get(
            &["user", "max-prices"],
            Vec::new(),
            transport::decode_price_limits,
        )
        .await
    }

    /// Create or update the price ceiling for a product.
    pub async fn set_price_limit(&self, product: &str, price: f64) -> Result<Value, FiveSimError> {
        self.call(
            HttpMethod::Post,
            &["user", "max-prices"],
            Vec::new(),
            Some(transport::encode_set_price_limit_body(product, price)),
            |body| Ok(transport::decode_opaque(body)),
        )
        .await
    }

    /// Remove the price ceiling for a product.
    pub async fn delete_price_limit(&self, product: &str) -> Result<Value, FiveSimError> {
        self.call(
            HttpMethod::Delete,
            &["user", "max-prices"],
            Vec::new(),
            Some(transport::encode_delete_price_limit_body(product)),
            |body| Ok(transport::decode_opaque(body)),
        )
        .await
    }

    /// Buy an activation number from a concrete operator (or `any`).
    ///
    /// `options.wait` is ignored here; see [`crate::FiveSim::buy_activation_number`].
    ///
    /// Errors:
    /// - [`FiveSimError::NoPhoneNumbers`] when the operator has no free numbers,
    /// - [`FiveSimError::InsufficientBalance`] / [`FiveSimError::InsufficientRating`],
    /// - [`FiveSimError::Validation`] for other 400 reasons (unknown product, bad options),
    /// - [`FiveSimError::Authentication`] for a rejected token.
    pub async fn buy_activation_number(
        &self,
        country: &str,
        operator: &str,
        product: &str,
        options: &BuyOptions,
    ) -> Result<Order, FiveSimError> {
        self.get(
            &["user", "buy", "activation", country, operator, product],
            transport::encode_buy_activation_query(options),
            transport::decode_order,
        )
        .await
    }

    /// Buy a hosting number from a concrete operator (or `any`).
    ///
    /// Errors:
    /// - [`FiveSimError::NoPhoneNumbers`] when the operator has no free numbers,
    /// - [`FiveSimError::InsufficientBalance`] / [`FiveSimError::InsufficientRating`],
    /// - [`FiveSimError::Validation`] for other 400 reasons (unknown product, bad options),
    /// - [`FiveSimError::Authentication`] for a rejected token.
    pub async fn buy_hosting_number(
        &self,
        country: &str,
        operator: &str,
        product: &str,
    ) -> Result<Order, FiveSimError> {
        self.get(
            &["user", "buy", "hosting", country, operator, product],
            Vec::new(),
            transport::decode_order,
        )
        .await
    }

    /// Buy the same number again for a product.
    pub async fn reuse_number(&self, product: &str, number: &str) -> Result<Order, FiveSimError> {
        self.get(
            &["user", "reuse", product, number],
            Vec::new(),
            transport::decode_order,
        )
        .await
    }

    /// Fresh snapshot of an order, including received SMS.
    pub async fn check_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.order_action("check", id).await
    }

    /// Mark an order as finished once the code has been used.
    pub async fn finish_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.order_action("finish", id).await
    }

    /// Cancel an order. 5sim refuses this once an SMS has arrived.
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.order_action("cancel", id).await
    }

    /// Report the number as banned by the target service.
    pub async fn ban_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.order_action("ban", id).await
    }

    /// SMS received by a hosting order (`user/sms/inbox/{id}`).
    pub async fn sms_inbox(&self, id: OrderId) -> Result<SmsInbox, FiveSimError> {
        let id = id.to_string();
        self.get(
            &["user", "sms", "inbox", id.as_str()],
            Vec::new(),
            transport::decode_sms_inbox,
        )
        .await
    }

    /// Vendor account profile (`user/vendor`).
    pub async fn vendor_profile(&self) -> Result<VendorProfile, FiveSimError> {
        self.get(&["user", "vendor"], Vec::new(), transport::decode_user_profile)
            .await
    }

    /// Balances of the vendor payout wallets.
    pub async fn vendor_wallets(&self) -> Result<VendorWallets, FiveSimError> {
        self.get(
            &["vendor", "wallets"],
            Vec::new(),
            transport::decode_vendor_wallets,
        )
        .await
    }

    /// Orders served through this vendor account.
    pub async fn vendor_orders(
        &self,
        options: &OrderHistoryOptions,
    ) -> Result<OrderHistory, FiveSimError> {
        self.get(
            &["vendor", "orders"],
            transport::encode_order_history_query(options),
            transport::decode_order_history,
        )
        .await
    }

    /// Vendor payment history.
    pub async fn vendor_payments(
        &self,
        pagination: &Pagination,
    ) -> Result<VendorPaymentHistory, FiveSimError> {
        self.get(
            &["vendor", "payments"],
            transport::encode_pagination_query(pagination),
            transport::decode_vendor_payment_history,
        )
        .await
    }

    /// Request a withdrawal from the vendor balance.
    pub async fn create_payout(&self, payout: &Payout) -> Result<Value, FiveSimError> {
        self.call(
            HttpMethod::Post,
            &["vendor", "withdraw"],
            Vec::new(),
            Some(transport::encode_payout_body(payout)),
            |body| Ok(transport::decode_opaque(body)),
        )
        .await
    }

    /// Poll [`UserClient::check_order`] until the order is `RECEIVED`.
    ///
    /// Errors:
    /// - [`FiveSimError::OrderWaitFailed`] on any status other than `PENDING`/`RECEIVED`,
    /// - [`FiveSimError::WaitTimedOut`] once `options.timeout` elapses,
    /// - any error of [`UserClient::check_order`], returned without retrying.
    pub async fn wait_until_received(
        &self,
        id: OrderId,
        options: &WaitOptions,
    ) -> Result<Order, FiveSimError> {
        poll_until_received(id, options, move || self.check_order(id)).await
    }

    /// [`UserClient::wait_until_received`] that also stops when `cancel` resolves.
    ///
    /// Errors:
    /// - [`FiveSimError::WaitCancelled`] once `cancel` resolves first,
    /// - everything [`UserClient::wait_until_received`] returns.
    pub async fn wait_until_received_or_cancel(
        &self,
        id: OrderId,
        options: &WaitOptions,
        cancel: impl Future<Output = ()>,
    ) -> Result<Order, FiveSimError> {
        poll_until_received_or_cancel(id, options, move || self.check_order(id), cancel).await
    }
}
