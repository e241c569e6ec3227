//! Unauthenticated endpoints under `guest/`.
//!
//! The free functions in this module use a lazily built shared
//! [`GuestClient`] with default settings. Build your own client with
//! [`GuestClient::builder`] to change the base URL, timeout or user-agent.
//!
//! The shared client keeps a process-wide connection pool, and pooled
//! connections stay bound to the tokio runtime that opened them. Programs that
//! create and drop runtimes (one per task, one per test) should hold their own
//! [`GuestClient`] per runtime instead of calling these functions.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use super::{Endpoint, FiveSimError, HttpConfig, HttpMethod};
use crate::domain::{CountryInfo, Language, Notification, Prices, ProductOffer};
use crate::transport;

#[derive(Debug, Clone, Default)]
/// Builder for [`GuestClient`].
pub struct GuestClientBuilder {
    http: HttpConfig,
}

impl GuestClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API root (default `https://5sim.net/v1`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<GuestClient, FiveSimError> {
        Ok(GuestClient {
            endpoint: self.http.build()?,
        })
    }
}

#[derive(Clone)]
/// Client for the public 5sim endpoints. Holds no credential.
pub struct GuestClient {
    pub(super) endpoint: Endpoint,
}

impl Default for GuestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestClient {
    /// Create a client against the default endpoint.
    pub fn new() -> Self {
        Self {
            endpoint: Endpoint::default_reqwest(),
        }
    }

    pub fn builder() -> GuestClientBuilder {
        GuestClientBuilder::new()
    }

    pub(super) fn from_endpoint(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    async fn get<T>(
        &self,
        segments: &[&str],
        query: Vec<(String, String)>,
        decode: impl FnOnce(&str) -> Result<T, transport::TransportError>,
    ) -> Result<T, FiveSimError> {
        self.endpoint
            .fetch(HttpMethod::Get, segments, query, None, None, decode)
            .await
    }

    /// Products on sale for a country/operator pair (`any` is accepted for both).
    pub async fn products(
        &self,
        country: &str,
        operator: &str,
    ) -> Result<BTreeMap<String, ProductOffer>, FiveSimError> {
        self.get(
            &["guest", "products", country, operator],
            Vec::new(),
            transport::decode_products,
        )
        .await
    }

    /// Price table, optionally filtered by country and/or product.
    pub async fn prices(
        &self,
        country: Option<&str>,
        product: Option<&str>,
    ) -> Result<Prices, FiveSimError> {
        self.get(
            &["guest", "prices"],
            transport::encode_prices_query(country, product),
            transport::decode_prices,
        )
        .await
    }

    pub async fn prices_by_country(&self, country: &str) -> Result<Prices, FiveSimError> {
        self.prices(Some(country), None).await
    }

    pub async fn prices_by_product(&self, product: &str) -> Result<Prices, FiveSimError> {
        self.prices(None, Some(product)).await
    }

    pub async fn prices_by_country_and_product(
        &self,
        country: &str,
        product: &str,
    ) -> Result<Prices, FiveSimError> {
        self.prices(Some(country), Some(product)).await
    }

    /// Current site notification banner.
    pub async fn notifications(&self, lang: Language) -> Result<Notification, FiveSimError> {
        self.get(
            &["guest", "flash", lang.as_str()],
            Vec::new(),
            transport::decode_notification,
        )
        .await
    }

    pub async fn countries(&self) -> Result<BTreeMap<String, CountryInfo>, FiveSimError> {
        self.get(
            &["guest", "countries"],
            Vec::new(),
            transport::decode_countries,
        )
        .await
    }
}

fn shared() -> &'static GuestClient {
    static SHARED: OnceLock<GuestClient> = OnceLock::new();
    SHARED.get_or_init(shared_client)
}

#[cfg(not(test))]
fn shared_client() -> GuestClient {
    GuestClient::new()
}

#[cfg(test)]
fn shared_client() -> GuestClient {
    GuestClient::from_endpoint(Endpoint::new(
        "https://example.invalid/v1",
        std::sync::Arc::new(super::testing::shared_transport()),
    ))
}

/// See [`GuestClient::products`].
pub async fn get_products(
    country: &str,
    operator: &str,
) -> Result<BTreeMap<String, ProductOffer>, FiveSimError> {
    shared().products(country, operator).await
}

/// See [`GuestClient::prices`].
pub async fn get_prices(
    country: Option<&str>,
    product: Option<&str>,
) -> Result<Prices, FiveSimError> {
    shared().prices(country, product).await
}

pub async fn get_prices_by_country(country: &str) -> Result<Prices, FiveSimError> {
    shared().prices_by_country(country).await
}

pub async fn get_prices_by_product(product: &str) -> Result<Prices, FiveSimError> {
    shared().prices_by_product(product).await
}

pub async fn get_prices_by_country_and_product(
    country: &str,
    product: &str,
) -> Result<Prices, FiveSimError> {
    shared().prices_by_country_and_product(country, product).await
}

pub async fn get_notifications(lang: Language) -> Result<Notification, FiveSimError> {
    shared().notifications(lang).await
}

pub async fn get_countries() -> Result<BTreeMap<String, CountryInfo>, FiveSimError> {
    shared().countries().await
}

/// See [`GuestClient::best_operator`].
pub async fn best_operator(country: &str, product: &str) -> Result<String, FiveSimError> {
    shared().best_operator(country, product).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::ErrorKind;
    use super::super::testing::{FakeTransport, query_pairs};
    use super::*;

    fn make_client(transport: &FakeTransport) -> GuestClient {
        GuestClient::from_endpoint(Endpoint::new(
            "https://example.invalid/v1",
            Arc::new(transport.clone()),
        ))
    }

    #[tokio::test]
    async fn products_uses_path_parameters_without_auth() {
        let transport = FakeTransport::new().reply(
            200,
            r#"{"telegram": {"Category": "activation", "Qty": 10, "Price": 5}}"#,
        );
        let client = make_client(&transport);

        let products = client.products("russia", "any").await.unwrap();
        assert_eq!(products["telegram"].qty, 10);

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url.as_str(),
            "https://example.invalid/v1/guest/products/russia/any"
        );
        assert!(request.bearer.is_none());
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn prices_variants_set_the_expected_filters() {
        let transport = FakeTransport::new()
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, "{}");
        let client = make_client(&transport);

        client.prices(None, None).await.unwrap();
        client.prices_by_country("russia").await.unwrap();
        client.prices_by_product("telegram").await.unwrap();
        client
            .prices_by_country_and_product("russia", "telegram")
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        for request in &requests {
            assert_eq!(request.url.path(), "/v1/guest/prices");
        }
        assert!(query_pairs(&requests[0]).is_empty());
        assert_eq!(
            query_pairs(&requests[1]),
            vec![("country".to_owned(), "russia".to_owned())]
        );
        assert_eq!(
            query_pairs(&requests[2]),
            vec![("product".to_owned(), "telegram".to_owned())]
        );
        assert_eq!(
            query_pairs(&requests[3]),
            vec![
                ("country".to_owned(), "russia".to_owned()),
                ("product".to_owned(), "telegram".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn notifications_and_countries_hit_fixed_paths() {
        let transport = FakeTransport::new()
            .reply(200, r#"{"text": "hello"}"#)
            .reply(200, r#"{"russia": {"iso": {"ru": 1}, "prefix": {"+7": 1}, "text_en": "Russia", "text_ru": "Россия"}}"#);
        let client = make_client(&transport);

        let notification = client.notifications(Language::Ru).await.unwrap();
        assert_eq!(notification.text, "hello");
        let countries = client.countries().await.unwrap();
        assert_eq!(countries["russia"].text_en, "Russia");

        let requests = transport.requests();
        assert_eq!(requests[0].url.path(), "/v1/guest/flash/ru");
        assert_eq!(requests[1].url.path(), "/v1/guest/countries");
    }

    #[tokio::test]
    async fn guest_failures_are_classified() {
        let transport = FakeTransport::new().reply(503, "maintenance");
        let client = make_client(&transport);

        let err = client.countries().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.body(), Some("maintenance"));
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let err = GuestClient::builder()
            .base_url("::not a url::")
            .build()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    // The only test touching the shared client; replies are consumed in order.
    #[tokio::test]
    async fn free_functions_and_facade_use_the_shared_client() {
        use super::super::FiveSim;
        use super::super::testing::shared_transport;

        let transport = shared_transport()
            .reply(200, r#"{"telegram": {"Category": "activation", "Qty": 1, "Price": 2}}"#)
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, "{}")
            .reply(200, r#"{"text": "hi"}"#)
            .reply(200, "{}")
            .reply(200, r#"{"russia": {"telegram": {"mts": {"cost": 1, "count": 3}}}}"#)
            .reply(200, "{}")
            .reply(200, r#"{"text": "hi"}"#);

        get_products("russia", "any").await.unwrap();
        get_prices(None, None).await.unwrap();
        get_prices_by_country("russia").await.unwrap();
        get_prices_by_product("telegram").await.unwrap();
        get_prices_by_country_and_product("russia", "telegram")
            .await
            .unwrap();
        get_notifications(Language::En).await.unwrap();
        get_countries().await.unwrap();
        assert_eq!(best_operator("russia", "telegram").await.unwrap(), "mts");
        FiveSim::get_prices_by_country("england").await.unwrap();
        let notification = FiveSim::get_notifications(Language::Ru).await.unwrap();
        assert_eq!(notification.text, "hi");

        let paths = transport
            .requests()
            .iter()
            .map(|it| it.url.path().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![
                "/v1/guest/products/russia/any",
                "/v1/guest/prices",
                "/v1/guest/prices",
                "/v1/guest/prices",
                "/v1/guest/prices",
                "/v1/guest/flash/en",
                "/v1/guest/countries",
                "/v1/guest/prices",
                "/v1/guest/prices",
                "/v1/guest/flash/ru",
            ]
        );
        assert!(transport.requests().iter().all(|it| it.bearer.is_none()));
        assert_eq!(
            query_pairs(&transport.requests()[8]),
            vec![("country".to_owned(), "england".to_owned())]
        );
    }
}
