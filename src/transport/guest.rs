use std::collections::BTreeMap;

use serde::Deserialize;

use super::TransportError;
use super::lenient::{TransportCount, TransportNumber, nullable, number_or_zero};
use crate::domain::{
    CountryInfo, Notification, OperatorAvailability, OperatorPricing, Prices, ProductCategory,
    ProductOffer,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProductJson {
    #[serde(default, deserialize_with = "nullable")]
    category: String,
    #[serde(default)]
    qty: Option<TransportCount>,
    #[serde(default)]
    price: Option<TransportNumber>,
}

#[derive(Debug, Clone, Deserialize)]
struct OperatorPricingJson {
    #[serde(default)]
    cost: Option<TransportNumber>,
    #[serde(default)]
    count: Option<TransportCount>,
    #[serde(default)]
    rate: Option<TransportNumber>,
}

type PricesJson = BTreeMap<String, BTreeMap<String, BTreeMap<String, OperatorPricingJson>>>;

// Fixed fields sit next to operator keys in the same object, hence `flatten`.
#[derive(Debug, Clone, Deserialize)]
struct CountryJson {
    #[serde(default)]
    iso: BTreeMap<String, u64>,
    #[serde(default)]
    prefix: BTreeMap<String, u64>,
    #[serde(default)]
    text_en: String,
    #[serde(default)]
    text_ru: String,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OperatorAvailabilityJson {
    #[serde(default)]
    activation: Option<u64>,
    #[serde(default)]
    hosting: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct NotificationJson {
    #[serde(default, deserialize_with = "nullable")]
    text: String,
}

impl From<ProductJson> for ProductOffer {
    fn from(value: ProductJson) -> Self {
        let category = match value.category.as_str() {
            "activation" => ProductCategory::Activation,
            "hosting" => ProductCategory::Hosting,
            other => ProductCategory::Unknown(other.to_owned()),
        };
        Self {
            category,
            qty: value
                .qty
                .and_then(TransportCount::into_u64)
                .unwrap_or_default(),
            price: number_or_zero(value.price),
        }
    }
}

impl From<OperatorPricingJson> for OperatorPricing {
    fn from(value: OperatorPricingJson) -> Self {
        Self {
            cost: value.cost.map(TransportNumber::into_f64),
            count: value.count.and_then(TransportCount::into_u64),
            rate: value.rate.map(TransportNumber::into_f64),
        }
    }
}

impl From<CountryJson> for CountryInfo {
    fn from(value: CountryJson) -> Self {
        let operators = value
            .rest
            .into_iter()
            .filter(|(_, raw)| raw.is_object())
            .filter_map(|(name, raw)| {
                serde_json::from_value::<OperatorAvailabilityJson>(raw)
                    .ok()
                    .map(|it| {
                        (
                            name,
                            OperatorAvailability {
                                activation: it.activation,
                                hosting: it.hosting,
                            },
                        )
                    })
            })
            .collect();

        Self {
            iso: value.iso,
            prefix: value.prefix,
            text_en: value.text_en,
            text_ru: value.text_ru,
            operators,
        }
    }
}

pub fn decode_products(json: &str) -> Result<BTreeMap<String, ProductOffer>, TransportError> {
    let parsed: BTreeMap<String, ProductJson> = serde_json::from_str(json)?;
    Ok(parsed
        .into_iter()
        .map(|(name, product)| (name, product.into()))
        .collect())
}

pub fn decode_prices(json: &str) -> Result<Prices, TransportError> {
    let parsed: PricesJson = serde_json::from_str(json)?;
    Ok(parsed
        .into_iter()
        .map(|(country, products)| {
            let products = products
                .into_iter()
                .map(|(product, operators)| {
                    let operators = operators
                        .into_iter()
                        .map(|(operator, pricing)| (operator, pricing.into()))
                        .collect();
                    (product, operators)
                })
                .collect();
            (country, products)
        })
        .collect())
}

pub fn decode_countries(json: &str) -> Result<BTreeMap<String, CountryInfo>, TransportError> {
    let parsed: BTreeMap<String, CountryJson> = serde_json::from_str(json)?;
    Ok(parsed
        .into_iter()
        .map(|(name, country)| (name, country.into()))
        .collect())
}

pub fn decode_notification(json: &str) -> Result<Notification, TransportError> {
    let parsed: NotificationJson = serde_json::from_str(json)?;
    Ok(Notification { text: parsed.text })
}

/// Query string for `guest/prices`.
pub fn encode_prices_query(country: Option<&str>, product: Option<&str>) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    if let Some(country) = country {
        params.push(("country".to_owned(), country.to_owned()));
    }
    if let Some(product) = product {
        params.push(("product".to_owned(), product.to_owned()));
    }
    params
}
