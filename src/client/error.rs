//! Error type and the single place where failed responses are classified.

use std::error::Error as StdError;
use std::time::Duration;

use crate::domain::{OrderId, OrderStatus, ValidationError};
use crate::transport::error_message;

/// Reasons 5sim reports inside a 400 body, matched in order.
const BAD_REQUEST_REASONS: [(&str, ErrorKind); 6] = [
    ("no free phones", ErrorKind::NoPhoneNumbers),
    ("not enough user balance", ErrorKind::InsufficientBalance),
    ("not enough rating", ErrorKind::InsufficientRating),
    ("order expired", ErrorKind::OrderExpired),
    ("order has sms", ErrorKind::OrderHasSms),
    ("hosting order", ErrorKind::HostingOrder),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Fieldless discriminant of [`FiveSimError`] for programmatic branching.
pub enum ErrorKind {
    Network,
    Authentication,
    NotFound,
    RateLimit,
    Server,
    NoPhoneNumbers,
    InsufficientBalance,
    InsufficientRating,
    OrderExpired,
    OrderHasSms,
    HostingOrder,
    Validation,
    Api,
    Configuration,
    NoPricingData,
    OrderWaitFailed,
    Parse,
    WaitTimedOut,
    WaitCancelled,
}

/// Classify a failed call.
///
/// `None` means no response was received at all. For a response, `body` is the
/// raw payload; 400 reasons are looked up in its `message` field when it is a
/// JSON object, otherwise in the text itself.
pub fn classify(response: Option<(u16, &str)>) -> ErrorKind {
    let Some((status, body)) = response else {
        return ErrorKind::Network;
    };

    match status {
        401 => ErrorKind::Authentication,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        503 => ErrorKind::Server,
        400 => {
            let message = error_message(body);
            BAD_REQUEST_REASONS
                .iter()
                .find(|(needle, _)| message.contains(needle))
                .map(|(_, kind)| *kind)
                .unwrap_or(ErrorKind::Validation)
        }
        _ => ErrorKind::Api,
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by the 5sim clients.
///
/// Response-derived variants keep the HTTP status and the raw body
/// (`None` when the body was blank).
pub enum FiveSimError {
    /// No response was received (DNS, TLS, connection reset, client timeout).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn StdError + Send + Sync>),

    #[error("authentication failed, check the API token")]
    Authentication { status: u16, body: Option<String> },

    #[error("the requested resource was not found")]
    NotFound { status: u16, body: Option<String> },

    #[error("rate limit exceeded")]
    RateLimit { status: u16, body: Option<String> },

    #[error("5sim is currently unavailable")]
    Server { status: u16, body: Option<String> },

    #[error("no free phones for the requested parameters")]
    NoPhoneNumbers { status: u16, body: Option<String> },

    #[error("not enough user balance")]
    InsufficientBalance { status: u16, body: Option<String> },

    #[error("not enough rating")]
    InsufficientRating { status: u16, body: Option<String> },

    #[error("order expired")]
    OrderExpired { status: u16, body: Option<String> },

    #[error("order already has sms")]
    OrderHasSms { status: u16, body: Option<String> },

    #[error("operation is not allowed for a hosting order")]
    HostingOrder { status: u16, body: Option<String> },

    /// 400 with a reason this crate does not recognize.
    #[error("rejected by 5sim: {message}")]
    Validation {
        message: String,
        status: u16,
        body: Option<String>,
    },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// The client was configured with invalid input (e.g. an empty token).
    #[error("configuration error: {0}")]
    Configuration(#[from] ValidationError),

    /// The HTTP client could not be built from the configured settings
    /// (TLS backend, invalid user-agent).
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] Box<dyn StdError + Send + Sync>),

    #[error("no pricing data for product {product:?} in country {country:?}")]
    NoPricingData { country: String, product: String },

    #[error("order {order_id} ended with status {status} while waiting for sms")]
    OrderWaitFailed {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// A 2xx body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    #[error("order {order_id} was still pending after {waited:?}")]
    WaitTimedOut { order_id: OrderId, waited: Duration },

    #[error("waiting for order {order_id} was cancelled")]
    WaitCancelled { order_id: OrderId },
}

impl FiveSimError {
    /// Build the error for a non-2xx response.
    pub fn from_response(status: u16, body: String) -> Self {
        let kind = classify(Some((status, &body)));
        let message = error_message(&body);
        let body = if body.trim().is_empty() {
            None
        } else {
            Some(body)
        };

        match kind {
            ErrorKind::Authentication => Self::Authentication { status, body },
            ErrorKind::NotFound => Self::NotFound { status, body },
            ErrorKind::RateLimit => Self::RateLimit { status, body },
            ErrorKind::Server => Self::Server { status, body },
            ErrorKind::NoPhoneNumbers => Self::NoPhoneNumbers { status, body },
            ErrorKind::InsufficientBalance => Self::InsufficientBalance { status, body },
            ErrorKind::InsufficientRating => Self::InsufficientRating { status, body },
            ErrorKind::OrderExpired => Self::OrderExpired { status, body },
            ErrorKind::OrderHasSms => Self::OrderHasSms { status, body },
            ErrorKind::HostingOrder => Self::HostingOrder { status, body },
            ErrorKind::Validation => Self::Validation {
                message,
                status,
                body,
            },
            _ => Self::Api {
                status,
                message,
                body,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::NoPhoneNumbers { .. } => ErrorKind::NoPhoneNumbers,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::InsufficientRating { .. } => ErrorKind::InsufficientRating,
            Self::OrderExpired { .. } => ErrorKind::OrderExpired,
            Self::OrderHasSms { .. } => ErrorKind::OrderHasSms,
            Self::HostingOrder { .. } => ErrorKind::HostingOrder,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Api { .. } => ErrorKind::Api,
            Self::Configuration(_) | Self::HttpClient(_) => ErrorKind::Configuration,
            Self::NoPricingData { .. } => ErrorKind::NoPricingData,
            Self::OrderWaitFailed { .. } => ErrorKind::OrderWaitFailed,
            Self::Parse(_) => ErrorKind::Parse,
            Self::WaitTimedOut { .. } => ErrorKind::WaitTimedOut,
            Self::WaitCancelled { .. } => ErrorKind::WaitCancelled,
        }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimit { status, .. }
            | Self::Server { status, .. }
            | Self::NoPhoneNumbers { status, .. }
            | Self::InsufficientBalance { status, .. }
            | Self::InsufficientRating { status, .. }
            | Self::OrderExpired { status, .. }
            | Self::OrderHasSms { status, .. }
            | Self::HostingOrder { status, .. }
            | Self::Validation { status, .. }
            | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of the failed response, if it was not blank.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::NotFound { body, .. }
            | Self::RateLimit { body, .. }
            | Self::Server { body, .. }
            | Self::NoPhoneNumbers { body, .. }
            | Self::InsufficientBalance { body, .. }
            | Self::InsufficientRating { body, .. }
            | Self::OrderExpired { body, .. }
            | Self::OrderHasSms { body, .. }
            | Self::HostingOrder { body, .. }
            | Self::Validation { body, .. }
            | Self::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
