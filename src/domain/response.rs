use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value::OrderId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Order lifecycle status as reported by 5sim.
///
/// Unrecognized values are preserved in [`OrderStatus::Unknown`].
pub enum OrderStatus {
    Pending,
    Received,
    Canceled,
    Timeout,
    Finished,
    Banned,
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Received => "RECEIVED",
            Self::Canceled => "CANCELED",
            Self::Timeout => "TIMEOUT",
            Self::Finished => "FINISHED",
            Self::Banned => "BANNED",
            Self::Unknown(other) => other,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "PENDING" => Self::Pending,
            "RECEIVED" => Self::Received,
            "CANCELED" => Self::Canceled,
            "TIMEOUT" => Self::Timeout,
            "FINISHED" => Self::Finished,
            "BANNED" => Self::Banned,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub phone: String,
    pub operator: String,
    pub product: String,
    pub price: f64,
    pub status: OrderStatus,
    pub expires: String,
    /// Empty when 5sim reports `null`.
    pub sms: Vec<Sms>,
    pub created_at: String,
    pub forwarding: bool,
    pub forwarding_number: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sms {
    pub id: Option<u64>,
    pub created_at: String,
    pub date: String,
    pub sender: String,
    pub text: String,
    pub code: String,
    pub is_wave: Option<bool>,
    pub wave_uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Paged orders, shared by `user/orders` and `vendor/orders`.
pub struct OrderHistory {
    pub data: Vec<Order>,
    pub product_names: Vec<String>,
    pub statuses: Vec<String>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsInbox {
    pub data: Vec<Sms>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCountry {
    pub name: String,
    pub iso: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    pub vendor: String,
    pub default_forwarding_number: String,
    pub balance: f64,
    pub rating: f64,
    pub default_country: Option<DefaultCountry>,
    pub default_operator: Option<String>,
    pub frozen_balance: f64,
}

/// `user/vendor` returns the same record as `user/profile`.
pub type VendorProfile = UserProfile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorWallets {
    pub fkwallet: Option<f64>,
    pub payeer: Option<f64>,
    pub unitpay: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: u64,
    pub type_name: String,
    pub provider_name: String,
    pub amount: f64,
    pub balance: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentHistory {
    pub data: Vec<Payment>,
    pub payment_types: Vec<String>,
    pub payment_providers: Vec<String>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorPaymentHistory {
    pub data: Vec<Payment>,
    pub payment_types: Vec<String>,
    pub payment_providers: Vec<String>,
    pub payment_statuses: Vec<String>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLimit {
    pub id: u64,
    pub product: String,
    pub price: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Activation,
    Hosting,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
/// One entry of `guest/products/{country}/{operator}`.
pub struct ProductOffer {
    pub category: ProductCategory,
    pub qty: u64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Price and stock of one operator for one product in one country.
///
/// Missing values stay `None`; the operator selector compares them as zero.
pub struct OperatorPricing {
    pub cost: Option<f64>,
    pub count: Option<u64>,
    pub rate: Option<f64>,
}

/// operator name -> pricing
pub type ProductPrices = BTreeMap<String, OperatorPricing>;
/// product name -> operators
pub type CountryPrices = BTreeMap<String, ProductPrices>;
/// country name -> products, as returned by `guest/prices`.
pub type Prices = BTreeMap<String, CountryPrices>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorAvailability {
    pub activation: Option<u64>,
    pub hosting: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of `guest/countries`.
pub struct CountryInfo {
    pub iso: BTreeMap<String, u64>,
    pub prefix: BTreeMap<String, u64>,
    pub text_en: String,
    pub text_ru: String,
    /// Operator keys carried alongside the fixed fields.
    pub operators: BTreeMap<String, OperatorAvailability>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
}
