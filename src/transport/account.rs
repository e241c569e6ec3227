use serde::Deserialize;
use serde_json::{Value, json};

use super::TransportError;
use super::lenient::{TransportCount, TransportNumber, nullable, number_or_zero};
use crate::domain::{
    DefaultCountry, Payment, PaymentHistory, Payout, PriceLimit, UserProfile,
    VendorPaymentHistory, VendorWallets,
};

#[derive(Debug, Clone, Deserialize)]
struct UserProfileJson {
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    email: String,
    #[serde(default, deserialize_with = "nullable")]
    vendor: String,
    #[serde(default, deserialize_with = "nullable")]
    default_forwarding_number: String,
    #[serde(default)]
    balance: Option<TransportNumber>,
    #[serde(default)]
    rating: Option<TransportNumber>,
    #[serde(default)]
    default_country: Option<DefaultCountryJson>,
    #[serde(default)]
    default_operator: Option<NamedJson>,
    #[serde(default)]
    frozen_balance: Option<TransportNumber>,
}

#[derive(Debug, Clone, Deserialize)]
struct DefaultCountryJson {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    iso: String,
    #[serde(default, deserialize_with = "nullable")]
    prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamedJson {
    #[serde(default, deserialize_with = "nullable", alias = "name")]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PaymentJson {
    #[serde(rename = "ID")]
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    type_name: String,
    #[serde(default, deserialize_with = "nullable")]
    provider_name: String,
    #[serde(default)]
    amount: Option<TransportNumber>,
    #[serde(default)]
    balance: Option<TransportNumber>,
    #[serde(default, deserialize_with = "nullable")]
    created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PaymentHistoryJson {
    #[serde(default, deserialize_with = "nullable")]
    data: Vec<PaymentJson>,
    #[serde(default, deserialize_with = "nullable")]
    payment_types: Vec<NamedJson>,
    #[serde(default, deserialize_with = "nullable")]
    payment_providers: Vec<NamedJson>,
    #[serde(default, deserialize_with = "nullable")]
    payment_statuses: Vec<NamedJson>,
    #[serde(default)]
    total: Option<TransportCount>,
}

#[derive(Debug, Clone, Deserialize)]
struct PriceLimitJson {
    id: u64,
    #[serde(default, deserialize_with = "nullable")]
    product: String,
    #[serde(default)]
    price: Option<TransportNumber>,
    #[serde(default, deserialize_with = "nullable", rename = "CreatedAt")]
    created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
struct VendorWalletsJson {
    #[serde(default)]
    fkwallet: Option<TransportNumber>,
    #[serde(default)]
    payeer: Option<TransportNumber>,
    #[serde(default)]
    unitpay: Option<TransportNumber>,
}

impl From<PaymentJson> for Payment {
    fn from(value: PaymentJson) -> Self {
        Self {
            id: value.id,
            type_name: value.type_name,
            provider_name: value.provider_name,
            amount: number_or_zero(value.amount),
            balance: number_or_zero(value.balance),
            created_at: value.created_at,
        }
    }
}

fn names(values: Vec<NamedJson>) -> Vec<String> {
    values.into_iter().map(|it| it.name).collect()
}

fn total(value: Option<TransportCount>) -> u64 {
    value.and_then(TransportCount::into_u64).unwrap_or_default()
}

pub fn decode_user_profile(json: &str) -> Result<UserProfile, TransportError> {
    let parsed: UserProfileJson = serde_json::from_str(json)?;
    Ok(UserProfile {
        id: parsed.id,
        email: parsed.email,
        vendor: parsed.vendor,
        default_forwarding_number: parsed.default_forwarding_number,
        balance: number_or_zero(parsed.balance),
        rating: number_or_zero(parsed.rating),
        default_country: parsed.default_country.map(|it| DefaultCountry {
            name: it.name,
            iso: it.iso,
            prefix: it.prefix,
        }),
        default_operator: parsed.default_operator.map(|it| it.name),
        frozen_balance: number_or_zero(parsed.frozen_balance),
    })
}

pub fn decode_payment_history(json: &str) -> Result<PaymentHistory, TransportError> {
    let parsed: PaymentHistoryJson = serde_json::from_str(json)?;
    Ok(PaymentHistory {
        data: parsed.data.into_iter().map(Payment::from).collect(),
        payment_types: names(parsed.payment_types),
        payment_providers: names(parsed.payment_providers),
        total: total(parsed.total),
    })
}

pub fn decode_vendor_payment_history(json: &str) -> Result<VendorPaymentHistory, TransportError> {
    let parsed: PaymentHistoryJson = serde_json::from_str(json)?;
    Ok(VendorPaymentHistory {
        data: parsed.data.into_iter().map(Payment::from).collect(),
        payment_types: names(parsed.payment_types),
        payment_providers: names(parsed.payment_providers),
        payment_statuses: names(parsed.payment_statuses),
        total: total(parsed.total),
    })
}

pub fn decode_price_limits(json: &str) -> Result<Vec<PriceLimit>, TransportError> {
    let parsed: Option<Vec<PriceLimitJson>> = serde_json::from_str(json)?;
    Ok(parsed
        .unwrap_or_default()
        .into_iter()
        .map(|it| PriceLimit {
            id: it.id,
            product: it.product,
            price: number_or_zero(it.price),
            created_at: it.created_at,
        })
        .collect())
}

pub fn decode_vendor_wallets(json: &str) -> Result<VendorWallets, TransportError> {
    let parsed: VendorWalletsJson = serde_json::from_str(json)?;
    Ok(VendorWallets {
        fkwallet: parsed.fkwallet.map(TransportNumber::into_f64),
        payeer: parsed.payeer.map(TransportNumber::into_f64),
        unitpay: parsed.unitpay.map(TransportNumber::into_f64),
    })
}

/// Body of an acknowledgement-only endpoint, passed through unchanged.
///
/// Empty bodies become `null`; non-JSON text is kept as a JSON string.
pub fn decode_opaque(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

pub fn encode_set_price_limit_body(product: &str, price: f64) -> Value {
    json!({ "product_name": product, "price": price })
}

pub fn encode_delete_price_limit_body(product: &str) -> Value {
    json!({ "product_name": product })
}

pub fn encode_payout_body(payout: &Payout) -> Value {
    json!({
        "receiver": payout.receiver,
        "method": payout.method.as_str(),
        "amount": payout.amount,
        "fee": payout.fee.as_str(),
    })
}
