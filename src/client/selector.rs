use std::cmp::Ordering;

use tracing::info;

use super::{FiveSimError, GuestClient};
use crate::domain::{OperatorPricing, Prices};

/// Pick the operator with the lowest cost, preferring more stock on equal cost.
///
/// Missing cost or count compares as zero. Operators that tie on both keys keep
/// name order, so the result is deterministic for a given snapshot.
pub fn select_best_operator(
    prices: &Prices,
    country: &str,
    product: &str,
) -> Result<String, FiveSimError> {
    let no_data = || FiveSimError::NoPricingData {
        country: country.to_owned(),
        product: product.to_owned(),
    };

    let operators = prices
        .get(country)
        .and_then(|products| products.get(product))
        .ok_or_else(no_data)?;

    operators
        .iter()
        .min_by(|(_, a), (_, b)| rank(a, b))
        .map(|(name, _)| name.clone())
        .ok_or_else(no_data)
}

fn rank(a: &OperatorPricing, b: &OperatorPricing) -> Ordering {
    let cost = |it: &OperatorPricing| it.cost.unwrap_or(0.0);
    let count = |it: &OperatorPricing| it.count.unwrap_or(0);
    cost(a)
        .total_cmp(&cost(b))
        .then_with(|| count(b).cmp(&count(a)))
}

impl GuestClient {
    /// Resolve the best operator from a fresh price snapshot.
    ///
    /// Nothing is reserved: stock may change before a following purchase.
    pub async fn best_operator(&self, country: &str, product: &str) -> Result<String, FiveSimError> {
        let prices = self.prices_by_country_and_product(country, product).await?;
        let operator = select_best_operator(&prices, country, product)?;
        info!(country, product, operator = %operator, "resolved best operator");
        Ok(operator)
    }
}
