use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Clone, PartialEq, Eq, Hash)]
/// 5sim API token sent as `Authorization: Bearer <token>`.
///
/// Invariant: non-empty after trimming. `Debug` never prints the secret.
pub struct ApiToken(String);

impl ApiToken {
    /// Name used in validation errors and the environment lookup.
    pub const FIELD: &'static str = "token";

    /// Create a validated [`ApiToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Order identifier assigned by 5sim on purchase.
pub struct OrderId(u64);

impl OrderId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Operator requested for a purchase.
///
/// [`Operator::Best`] is resolved to a concrete operator name from current
/// guest pricing before any purchase request is sent. The remote `any`
/// sentinel is an ordinary explicit value, see [`Operator::any`].
pub enum Operator {
    /// Pick the cheapest operator, preferring higher stock on equal cost.
    Best,
    /// Use this operator name verbatim.
    Explicit(String),
}

impl Operator {
    /// Wire value letting 5sim pick any operator.
    pub const ANY: &'static str = "any";

    pub fn any() -> Self {
        Self::Explicit(Self::ANY.to_owned())
    }

    pub fn explicit(name: impl Into<String>) -> Self {
        Self::Explicit(name.into())
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    /// Parses `best` into [`Operator::Best`]; anything else non-empty is explicit.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "operator" });
        }
        if trimmed.eq_ignore_ascii_case("best") {
            return Ok(Self::Best);
        }
        Ok(Self::Explicit(trimmed.to_owned()))
    }
}

/// Generates a closed wire enum with `as_str`, `Display` and `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(ValidationError::UnknownVariant {
                        field: Self::FIELD,
                        input: other.to_owned(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Language of the guest notification banner.
    Language, "lang" {
        En => "en",
        Ru => "ru",
    }
}

wire_enum! {
    /// Order history filter (`category`).
    OrderCategory, "category" {
        Activation => "activation",
        Hosting => "hosting",
    }
}

wire_enum! {
    /// Payout destination (`method`).
    PayoutMethod, "method" {
        Visa => "visa",
        Qiwi => "qiwi",
        Yandex => "yandex",
    }
}

wire_enum! {
    /// Payment system charging the payout fee (`fee`).
    FeeSystem, "fee" {
        Fkwallet => "fkwallet",
        Payeer => "payeer",
        Unitpay => "unitpay",
    }
}

#[derive(Debug, Clone)]
/// Call-forwarding target for activation purchases (`number`).
///
/// 5sim only forwards to Russian numbers, so inputs without a country prefix
/// are parsed in the RU region. The wire value is E.164 without the leading `+`.
pub struct ForwardingNumber {
    raw: String,
    digits: String,
}

impl ForwardingNumber {
    /// Query parameter name used by 5sim (`number`).
    pub const FIELD: &'static str = "number";

    /// Parse and normalize a forwarding number.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(Some(country::Id::RU), &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        let digits = e164.trim_start_matches('+').to_owned();

        Ok(Self { raw, digits })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Digits sent to 5sim, e.g. `79251234567`.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl PartialEq for ForwardingNumber {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for ForwardingNumber {}
