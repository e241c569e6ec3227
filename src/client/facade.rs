use std::collections::BTreeMap;
use std::env;
use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use super::{Endpoint, FiveSimError, GuestClient, HttpConfig, UserClient, guest};
use crate::domain::{
    ApiToken, BuyOptions, CountryInfo, HostingOptions, Language, Notification, Operator, Order,
    OrderHistory, OrderHistoryOptions, OrderId, Pagination, PaymentHistory, Payout, PriceLimit,
    Prices, ProductOffer, SmsInbox, UserProfile, VendorPaymentHistory, VendorProfile,
    ValidationError, VendorWallets, WaitOptions,
};

/// Environment variable holding the API token for [`FiveSimBuilder::from_env`].
pub const TOKEN_ENV: &str = "FIVESIM_API_TOKEN";
/// Optional environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "FIVESIM_BASE_URL";

#[derive(Debug, Clone)]
/// Builder for [`FiveSim`].
pub struct FiveSimBuilder {
    token: Result<ApiToken, ValidationError>,
    http: HttpConfig,
    wait: WaitOptions,
}

impl FiveSimBuilder {
    /// Builder with the default endpoint, 1 s poll interval and no wait bound.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: ApiToken::new(token),
            http: HttpConfig::default(),
            wait: WaitOptions::default(),
        }
    }

    /// Read the token from `FIVESIM_API_TOKEN` and, when set, the API root
    /// from `FIVESIM_BASE_URL`.
    ///
    /// A missing token surfaces from [`FiveSimBuilder::build`] as a
    /// configuration error, the same as an empty one.
    pub fn from_env() -> Self {
        let mut builder = Self::new(env::var(TOKEN_ENV).unwrap_or_default());
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            builder = builder.base_url(base_url);
        }
        builder
    }

    /// Override the API root (default `https://5sim.net/v1`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = Some(user_agent.into());
        self
    }

    /// Delay between order checks while waiting for an SMS.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.wait.poll_interval = interval;
        self
    }

    /// Upper bound for a whole wait. Unbounded unless set.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait.timeout = Some(timeout);
        self
    }

    /// Build a [`FiveSim`].
    ///
    /// Errors:
    /// - [`FiveSimError::Configuration`] for an empty token or an unusable base URL,
    /// - [`FiveSimError::HttpClient`] when the HTTP client cannot be built.
    pub fn build(self) -> Result<FiveSim, FiveSimError> {
        let token = self.token?;
        let endpoint = self.http.build()?;
        Ok(FiveSim::from_parts(token, endpoint, self.wait))
    }
}

#[derive(Clone)]
/// High-level 5sim client.
///
/// Combines a [`GuestClient`] and a [`UserClient`] over one connection pool,
/// resolves [`Operator::Best`] before buying, and optionally waits for the
/// first SMS after a purchase.
pub struct FiveSim {
    guest: GuestClient,
    user: UserClient,
    wait: WaitOptions,
}

impl FiveSim {
    /// Client with default settings. Fails only for an empty token.
    pub fn new(token: impl Into<String>) -> Result<Self, FiveSimError> {
        let token = ApiToken::new(token)?;
        Ok(Self::from_parts(
            token,
            Endpoint::default_reqwest(),
            WaitOptions::default(),
        ))
    }

    /// Start building a client with custom settings.
    pub fn builder(token: impl Into<String>) -> FiveSimBuilder {
        FiveSimBuilder::new(token)
    }

    fn from_parts(token: ApiToken, endpoint: Endpoint, wait: WaitOptions) -> Self {
        Self {
            guest: GuestClient::from_endpoint(endpoint.clone()),
            user: UserClient::from_parts(token, endpoint),
            wait,
        }
    }

    /// Unauthenticated client sharing this client's connection pool.
    pub fn guest(&self) -> &GuestClient {
        &self.guest
    }

    /// Authenticated client holding the token.
    pub fn user(&self) -> &UserClient {
        &self.user
    }

    /// Wait settings applied by purchases with `wait` set.
    pub fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }

    /// See [`GuestClient::products`]. Uses the shared default guest client.
    pub async fn get_products(
        country: &str,
        operator: &str,
    ) -> Result<BTreeMap<String, ProductOffer>, FiveSimError> {
        guest::get_products(country, operator).await
    }

    /// See [`GuestClient::prices`]. Uses the shared default guest client.
    pub async fn get_prices(
        country: Option<&str>,
        product: Option<&str>,
    ) -> Result<Prices, FiveSimError> {
        guest::get_prices(country, product).await
    }

    /// See [`GuestClient::prices_by_country`].
    pub async fn get_prices_by_country(country: &str) -> Result<Prices, FiveSimError> {
        guest::get_prices_by_country(country).await
    }

    /// See [`GuestClient::prices_by_product`].
    pub async fn get_prices_by_product(product: &str) -> Result<Prices, FiveSimError> {
        guest::get_prices_by_product(product).await
    }

    /// See [`GuestClient::prices_by_country_and_product`].
    pub async fn get_prices_by_country_and_product(
        country: &str,
        product: &str,
    ) -> Result<Prices, FiveSimError> {
        guest::get_prices_by_country_and_product(country, product).await
    }

    /// See [`GuestClient::notifications`].
    pub async fn get_notifications(lang: Language) -> Result<Notification, FiveSimError> {
        guest::get_notifications(lang).await
    }

    /// See [`GuestClient::countries`].
    pub async fn get_countries() -> Result<BTreeMap<String, CountryInfo>, FiveSimError> {
        guest::get_countries().await
    }

    /// Concrete operator name to send for `operator`.
    ///
    /// Explicit names pass through untouched; [`Operator::Best`] costs one
    /// `guest/prices` round trip.
    pub async fn resolve_operator(
        &self,
        country: &str,
        operator: &Operator,
        product: &str,
    ) -> Result<String, FiveSimError> {
        match operator {
            Operator::Best => self.guest.best_operator(country, product).await,
            Operator::Explicit(name) => Ok(name.clone()),
        }
    }

    /// Buy an activation number, then wait for the first SMS if `options.wait`.
    ///
    /// Errors:
    /// - [`FiveSimError::NoPricingData`] when [`Operator::Best`] finds no offer,
    /// - the purchase errors of [`UserClient::buy_activation_number`],
    /// - the wait errors of [`UserClient::wait_until_received`] when waiting.
    pub async fn buy_activation_number(
        &self,
        country: &str,
        operator: Operator,
        product: &str,
        options: BuyOptions,
    ) -> Result<Order, FiveSimError> {
        let operator = self.resolve_operator(country, &operator, product).await?;
        let order = self
            .user
            .buy_activation_number(country, &operator, product, &options)
            .await?;
        self.finish_purchase(order, options.wait).await
    }

    /// Buy a hosting number, then wait for the first SMS if `options.wait`.
    ///
    /// Errors:
    /// - [`FiveSimError::NoPricingData`] when [`Operator::Best`] finds no offer,
    /// - the purchase errors of [`UserClient::buy_hosting_number`],
    /// - the wait errors of [`UserClient::wait_until_received`] when waiting.
    pub async fn buy_hosting_number(
        &self,
        country: &str,
        operator: Operator,
        product: &str,
        options: HostingOptions,
    ) -> Result<Order, FiveSimError> {
        let operator = self.resolve_operator(country, &operator, product).await?;
        let order = self
            .user
            .buy_hosting_number(country, &operator, product)
            .await?;
        self.finish_purchase(order, options.wait).await
    }

    async fn finish_purchase(&self, order: Order, wait: bool) -> Result<Order, FiveSimError> {
        if !wait {
            return Ok(order);
        }
        self.user.wait_until_received(order.id, &self.wait).await
    }

    /// See [`UserClient::profile`].
    pub async fn profile(&self) -> Result<UserProfile, FiveSimError> {
        self.user.profile().await
    }

    /// See [`UserClient::order_history`].
    pub async fn order_history(
        &self,
        options: &OrderHistoryOptions,
    ) -> Result<OrderHistory, FiveSimError> {
        self.user.order_history(options).await
    }

    /// See [`UserClient::payment_history`].
    pub async fn payment_history(
        &self,
        pagination: &Pagination,
    ) -> Result<PaymentHistory, FiveSimError> {
        self.user.payment_history(pagination).await
    }

    /// See [`UserClient::price_limits`].
    pub async fn price_limits(&self) -> Result<Vec<PriceLimit>, FiveSimError> {
        self.user.price_limits().await
    }

    /// See [`UserClient::set_price_limit`].
    pub async fn set_price_limit(&self, product: &str, price: f64) -> Result<Value, FiveSimError> {
        self.user.set_price_limit(product, price).await
    }

    /// See [`UserClient::delete_price_limit`].
    pub async fn delete_price_limit(&self, product: &str) -> Result<Value, FiveSimError> {
        self.user.delete_price_limit(product).await
    }

    /// See [`UserClient::reuse_number`].
    pub async fn reuse_number(&self, product: &str, number: &str) -> Result<Order, FiveSimError> {
        self.user.reuse_number(product, number).await
    }

    /// See [`UserClient::check_order`].
    pub async fn check_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.user.check_order(id).await
    }

    /// See [`UserClient::finish_order`].
    pub async fn finish_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.user.finish_order(id).await
    }

    /// See [`UserClient::cancel_order`].
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.user.cancel_order(id).await
    }

    /// See [`UserClient::ban_order`].
    pub async fn ban_order(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.user.ban_order(id).await
    }

    /// See [`UserClient::sms_inbox`].
    pub async fn sms_inbox(&self, id: OrderId) -> Result<SmsInbox, FiveSimError> {
        self.user.sms_inbox(id).await
    }

    /// See [`UserClient::vendor_profile`].
    pub async fn vendor_profile(&self) -> Result<VendorProfile, FiveSimError> {
        self.user.vendor_profile().await
    }

    /// See [`UserClient::vendor_wallets`].
    pub async fn vendor_wallets(&self) -> Result<VendorWallets, FiveSimError> {
        self.user.vendor_wallets().await
    }

    /// See [`UserClient::vendor_orders`].
    pub async fn vendor_orders(
        &self,
        options: &OrderHistoryOptions,
    ) -> Result<OrderHistory, FiveSimError> {
        self.user.vendor_orders(options).await
    }

    /// See [`UserClient::vendor_payments`].
    pub async fn vendor_payments(
        &self,
        pagination: &Pagination,
    ) -> Result<VendorPaymentHistory, FiveSimError> {
        self.user.vendor_payments(pagination).await
    }

    /// See [`UserClient::create_payout`].
    pub async fn create_payout(&self, payout: &Payout) -> Result<Value, FiveSimError> {
        self.user.create_payout(payout).await
    }

    /// Wait for the first SMS using the client's configured [`WaitOptions`].
    ///
    /// Errors:
    /// - [`FiveSimError::OrderWaitFailed`] when the order ends without an SMS,
    /// - [`FiveSimError::WaitTimedOut`] when a wait timeout is configured and elapses.
    pub async fn wait_until_received(&self, id: OrderId) -> Result<Order, FiveSimError> {
        self.user.wait_until_received(id, &self.wait).await
    }

    /// [`FiveSim::wait_until_received`] that also stops when `cancel` resolves.
    ///
    /// Errors:
    /// - [`FiveSimError::WaitCancelled`] once `cancel` resolves first,
    /// - everything [`FiveSim::wait_until_received`] returns.
    pub async fn wait_until_received_or_cancel(
        &self,
        id: OrderId,
        cancel: impl Future<Output = ()>,
    ) -> Result<Order, FiveSimError> {
        self.user
            .wait_until_received_or_cancel(id, &self.wait, cancel)
            .await
    }
}
