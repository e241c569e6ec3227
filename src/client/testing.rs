//! Scripted in-memory transport shared by the client tests.

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use super::{BoxFuture, HttpRequest, HttpResponse, HttpTransport};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    replies: VecDeque<Result<HttpResponse, String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response; replies are consumed in order.
    pub(crate) fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(HttpResponse {
                status,
                body: body.into(),
            }));
        self
    }

    /// Queue a transport failure (no response at all).
    pub(crate) fn fail(self, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Err(message.into()));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("at least one request was sent")
    }
}

impl HttpTransport for FakeTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let reply = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                state.replies.pop_front()
            };
            match reply {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(io::Error::new(io::ErrorKind::ConnectionReset, message).into()),
                None => Err(io::Error::other("no scripted reply left").into()),
            }
        })
    }
}

/// Transport behind the process-wide guest client used by the free functions.
pub(crate) fn shared_transport() -> FakeTransport {
    static SHARED: OnceLock<FakeTransport> = OnceLock::new();
    SHARED.get_or_init(FakeTransport::new).clone()
}

/// Query pairs of a recorded request, in order.
pub(crate) fn query_pairs(request: &HttpRequest) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub(crate) const ORDER_PENDING: &str = r#"{"id": 42, "phone": "+79000000000", "operator": "mts", "product": "telegram", "price": 12, "status": "PENDING", "sms": null, "country": "russia"}"#;
pub(crate) const ORDER_RECEIVED: &str = r#"{"id": 42, "phone": "+79000000000", "operator": "mts", "product": "telegram", "price": 12, "status": "RECEIVED", "sms": [{"created_at": "2024-01-01T00:00:00Z", "date": "2024-01-01T00:00:00Z", "sender": "Telegram", "text": "code 12345", "code": "12345"}], "country": "russia"}"#;
pub(crate) const ORDER_CANCELED: &str = r#"{"id": 42, "phone": "+79000000000", "operator": "mts", "product": "telegram", "price": 12, "status": "CANCELED", "sms": null, "country": "russia"}"#;
