//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod error;
mod facade;
pub mod guest;
mod selector;
#[cfg(test)]
mod testing;
mod user;
mod waiter;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{ApiToken, ValidationError};
use crate::transport::TransportError;

pub use error::{ErrorKind, FiveSimError, classify};
pub use facade::{BASE_URL_ENV, FiveSim, FiveSimBuilder, TOKEN_ENV};
pub use guest::{GuestClient, GuestClientBuilder};
pub use selector::select_best_operator;
pub use user::UserClient;

/// Public 5sim API root.
pub const DEFAULT_BASE_URL: &str = "https://5sim.net/v1";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: Url,
    bearer: Option<String>,
    body: Option<Value>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Turn a request into its wire form: `Accept: application/json` always,
    /// bearer auth only when a token is present, JSON body when one is set.
    fn build_request(&self, request: HttpRequest) -> reqwest::Result<reqwest::Request> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
            HttpMethod::Delete => self.client.delete(request.url),
        };
        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }
        builder.build()
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let request = self.build_request(request)?;
            let response = self.client.execute(request).await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Settings shared by the guest and authenticated builders.
struct HttpConfig {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    fn build(self) -> Result<Endpoint, FiveSimError> {
        parse_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| FiveSimError::HttpClient(Box::new(err)))?;

        Ok(Endpoint::new(
            self.base_url,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

fn parse_base_url(input: &str) -> Result<Url, FiveSimError> {
    let invalid = || {
        FiveSimError::Configuration(ValidationError::InvalidBaseUrl {
            input: input.to_owned(),
        })
    };
    let url = Url::parse(input.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

#[derive(Clone)]
/// Base URL plus transport; every endpoint call goes through [`Endpoint::fetch`].
struct Endpoint {
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl Endpoint {
    fn new(base_url: impl Into<String>, http: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn default_reqwest() -> Self {
        Self::new(
            DEFAULT_BASE_URL,
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    fn url(&self, segments: &[&str], query: &[(String, String)]) -> Result<Url, FiveSimError> {
        let mut url = parse_base_url(&self.base_url)?;
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send one request and decode a 2xx body.
    ///
    /// Non-2xx responses and transport failures are classified into
    /// [`FiveSimError`]; nothing is retried.
    async fn fetch<T>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: Vec<(String, String)>,
        token: Option<&ApiToken>,
        body: Option<Value>,
        decode: impl FnOnce(&str) -> Result<T, TransportError>,
    ) -> Result<T, FiveSimError> {
        let url = self.url(segments, &query)?;
        debug!(method = ?method, path = %url.path(), "sending 5sim request");

        let request = HttpRequest {
            method,
            url,
            bearer: token.map(|it| it.as_str().to_owned()),
            body,
        };

        let response = self
            .http
            .send(request)
            .await
            .map_err(FiveSimError::Network)?;

        if !(200..=299).contains(&response.status) {
            let err = FiveSimError::from_response(response.status, response.body);
            warn!(status = response.status, kind = ?err.kind(), "5sim request failed");
            return Err(err);
        }

        decode(&response.body).map_err(|err| FiveSimError::Parse(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;

    fn endpoint(base: &str, transport: &FakeTransport) -> Endpoint {
        Endpoint::new(base, Arc::new(transport.clone()))
    }

    #[test]
    fn url_appends_encoded_segments_and_query() {
        let transport = FakeTransport::new();
        let endpoint = endpoint("https://example.invalid/v1", &transport);

        let url = endpoint.url(
            &["guest", "products", "south africa", "any"],
            &[("product".to_owned(), "a&b".to_owned())],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.invalid/v1/guest/products/south%20africa/any?product=a%26b"
        );
    }

    #[test]
    fn url_tolerates_trailing_slash_in_base() {
        let transport = FakeTransport::new();
        let endpoint = endpoint("https://example.invalid/v1/", &transport);

        let url = endpoint.url(&["guest", "countries"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/v1/guest/countries");
    }

    #[test]
    fn parse_base_url_rejects_unusable_values() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(FiveSimError::Configuration(
                ValidationError::InvalidBaseUrl { .. }
            ))
        ));
        assert!(matches!(
            parse_base_url("mailto:ops@example.invalid"),
            Err(FiveSimError::Configuration(
                ValidationError::InvalidBaseUrl { .. }
            ))
        ));
        assert!(parse_base_url(DEFAULT_BASE_URL).is_ok());
    }

    #[tokio::test]
    async fn fetch_classifies_non_success_status() {
        let transport = FakeTransport::new().reply(400, "no free phones");
        let endpoint = endpoint("https://example.invalid/v1", &transport);

        let err = endpoint
            .fetch(HttpMethod::Get, &["user", "check", "1"], Vec::new(), None, None, |_| {
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoPhoneNumbers);
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn fetch_maps_transport_failure_to_network() {
        let transport = FakeTransport::new().fail("connection reset");
        let endpoint = endpoint("https://example.invalid/v1", &transport);

        let err = endpoint
            .fetch(HttpMethod::Get, &["guest", "countries"], Vec::new(), None, None, |_| {
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn fetch_maps_undecodable_success_body_to_parse() {
        let transport = FakeTransport::new().reply(200, "{ not json }");
        let endpoint = endpoint("https://example.invalid/v1", &transport);

        let err = endpoint
            .fetch(
                HttpMethod::Get,
                &["guest", "flash", "en"],
                Vec::new(),
                None,
                None,
                crate::transport::decode_notification,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FiveSimError::Parse(_)));
    }

    fn reqwest_transport() -> ReqwestTransport {
        ReqwestTransport {
            client: reqwest::Client::new(),
        }
    }

    fn http_request(
        method: HttpMethod,
        path: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: Url::parse(&format!("https://example.invalid/v1/{path}")).unwrap(),
            bearer: bearer.map(str::to_owned),
            body,
        }
    }

    fn header(request: &reqwest::Request, name: reqwest::header::HeaderName) -> Option<&str> {
        request
            .headers()
            .get(name)
            .map(|value| value.to_str().unwrap())
    }

    #[test]
    fn guest_request_accepts_json_without_authorization() {
        let request = reqwest_transport()
            .build_request(http_request(HttpMethod::Get, "guest/countries", None, None))
            .unwrap();

        assert_eq!(*request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/v1/guest/countries");
        assert_eq!(
            header(&request, reqwest::header::ACCEPT),
            Some("application/json")
        );
        assert_eq!(header(&request, reqwest::header::AUTHORIZATION), None);
        assert!(request.body().is_none());
    }

    #[test]
    fn authenticated_request_sends_bearer_token() {
        let request = reqwest_transport()
            .build_request(http_request(HttpMethod::Get, "user/profile", Some("tok"), None))
            .unwrap();

        assert_eq!(
            header(&request, reqwest::header::ACCEPT),
            Some("application/json")
        );
        assert_eq!(
            header(&request, reqwest::header::AUTHORIZATION),
            Some("Bearer tok")
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn request_with_body_is_sent_as_json() {
        let request = reqwest_transport()
            .build_request(http_request(
                HttpMethod::Delete,
                "user/max-prices",
                Some("tok"),
                Some(serde_json::json!({"product_name": "telegram"})),
            ))
            .unwrap();

        assert_eq!(*request.method(), reqwest::Method::DELETE);
        assert_eq!(
            header(&request, reqwest::header::CONTENT_TYPE),
            Some("application/json")
        );
        assert_eq!(
            header(&request, reqwest::header::AUTHORIZATION),
            Some("Bearer tok")
        );
        let body = request.body().and_then(|body| body.as_bytes()).unwrap();
        let body: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(body, serde_json::json!({"product_name": "telegram"}));
    }

    #[test]
    fn http_client_build_failure_is_a_configuration_error() {
        let config = HttpConfig {
            user_agent: Some("bad\nagent".to_owned()),
            ..HttpConfig::default()
        };

        let err = config.build().err().unwrap();
        assert!(matches!(err, FiveSimError::HttpClient(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), None);
    }
}
