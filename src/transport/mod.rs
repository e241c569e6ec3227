//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod account;
mod guest;
mod lenient;
mod order;
mod query;

use serde::Deserialize;

pub use account::{
    decode_opaque, decode_payment_history, decode_price_limits, decode_user_profile,
    decode_vendor_payment_history, decode_vendor_wallets, encode_delete_price_limit_body,
    encode_payout_body, encode_set_price_limit_body,
};
pub use guest::{
    decode_countries, decode_notification, decode_prices, decode_products, encode_prices_query,
};
pub use order::{decode_order, decode_order_history, decode_sms_inbox, encode_buy_activation_query};
pub use query::{encode_order_history_query, encode_pagination_query};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorJson {
    message: String,
}

/// Human-readable reason carried by an error response.
///
/// 5sim answers either with `{"message": "..."}` or with bare text; for
/// anything else the raw body is returned.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorJson>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body.trim().to_owned(),
    }
}
