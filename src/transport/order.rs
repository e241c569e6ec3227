use serde::Deserialize;

use super::TransportError;
use super::lenient::{TransportCount, TransportNumber, nullable, number_or_zero};
use crate::domain::{
    BuyOptions, ForwardingNumber, Order, OrderHistory, OrderId, OrderStatus, Sms, SmsInbox,
};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct OrderJson {
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    phone: String,
    #[serde(default, deserialize_with = "nullable")]
    operator: String,
    #[serde(default, deserialize_with = "nullable")]
    product: String,
    #[serde(default)]
    price: Option<TransportNumber>,
    #[serde(default, deserialize_with = "nullable")]
    status: String,
    #[serde(default, deserialize_with = "nullable")]
    expires: String,
    #[serde(default, deserialize_with = "nullable")]
    sms: Vec<SmsJson>,
    #[serde(default, deserialize_with = "nullable")]
    created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    forwarding: bool,
    #[serde(default, deserialize_with = "nullable")]
    forwarding_number: String,
    #[serde(default, deserialize_with = "nullable")]
    country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct SmsJson {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    created_at: String,
    #[serde(default, deserialize_with = "nullable")]
    date: String,
    #[serde(default, deserialize_with = "nullable")]
    sender: String,
    #[serde(default, deserialize_with = "nullable")]
    text: String,
    #[serde(default, deserialize_with = "nullable")]
    code: String,
    #[serde(default)]
    is_wave: Option<bool>,
    #[serde(default)]
    wave_uuid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OrderHistoryJson {
    #[serde(default, deserialize_with = "nullable")]
    data: Vec<OrderJson>,
    #[serde(default, deserialize_with = "nullable")]
    product_names: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    statuses: Vec<String>,
    #[serde(default)]
    total: Option<TransportCount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SmsInboxJson {
    #[serde(default, deserialize_with = "nullable")]
    data: Vec<SmsJson>,
    #[serde(default)]
    total: Option<TransportCount>,
}

impl From<OrderJson> for Order {
    fn from(value: OrderJson) -> Self {
        Self {
            id: OrderId::new(value.id),
            phone: value.phone,
            operator: value.operator,
            product: value.product,
            price: number_or_zero(value.price),
            status: OrderStatus::from(value.status.as_str()),
            expires: value.expires,
            sms: value.sms.into_iter().map(Sms::from).collect(),
            created_at: value.created_at,
            forwarding: value.forwarding,
            forwarding_number: value.forwarding_number,
            country: value.country,
        }
    }
}

impl From<SmsJson> for Sms {
    fn from(value: SmsJson) -> Self {
        Self {
            id: value.id,
            created_at: value.created_at,
            date: value.date,
            sender: value.sender,
            text: value.text,
            code: value.code,
            is_wave: value.is_wave,
            wave_uuid: value.wave_uuid,
        }
    }
}

fn total(value: Option<TransportCount>) -> u64 {
    value.and_then(TransportCount::into_u64).unwrap_or_default()
}

pub fn decode_order(json: &str) -> Result<Order, TransportError> {
    let parsed: OrderJson = serde_json::from_str(json)?;
    Ok(parsed.into())
}

pub fn decode_order_history(json: &str) -> Result<OrderHistory, TransportError> {
    let parsed: OrderHistoryJson = serde_json::from_str(json)?;
    Ok(OrderHistory {
        data: parsed.data.into_iter().map(Order::from).collect(),
        product_names: parsed.product_names,
        statuses: parsed.statuses,
        total: total(parsed.total),
    })
}

pub fn decode_sms_inbox(json: &str) -> Result<SmsInbox, TransportError> {
    let parsed: SmsInboxJson = serde_json::from_str(json)?;
    Ok(SmsInbox {
        data: parsed.data.into_iter().map(Sms::from).collect(),
        total: total(parsed.total),
    })
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_owned()
}

/// Query string for `user/buy/activation`. `wait` stays local.
pub fn encode_buy_activation_query(options: &BuyOptions) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    if let Some(forwarding) = options.forwarding {
        params.push(("forwarding".to_owned(), forwarding.to_string()));
    }
    if let Some(number) = options.number.as_ref() {
        params.push((
            ForwardingNumber::FIELD.to_owned(),
            number.digits().to_owned(),
        ));
    }
    if let Some(reuse) = options.reuse {
        params.push(("reuse".to_owned(), flag(reuse)));
    }
    if let Some(voice) = options.voice {
        params.push(("voice".to_owned(), flag(voice)));
    }
    if let Some(referral) = options.referral.as_ref() {
        params.push(("ref".to_owned(), referral.clone()));
    }
    if let Some(max_price) = options.max_price {
        params.push(("maxPrice".to_owned(), max_price.to_string()));
    }
    params
}
