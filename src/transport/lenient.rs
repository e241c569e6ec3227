use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

/// Numeric value returned by 5sim as either JSON number or JSON string.
///
/// Decoded from the raw JSON token, so it only works for fields read directly
/// by `serde_json` (not inside `flatten`/`untagged` containers).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportNumber(f64);

impl TransportNumber {
    pub fn into_f64(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                parsed
                    .trim()
                    .parse::<f64>()
                    .map(Self)
                    .map_err(|_| D::Error::custom(format!("expected numeric string, got {parsed:?}")))
            }
            Some(b'-' | b'0'..=b'9') => token.parse::<f64>().map(Self).map_err(D::Error::custom),
            _ => Err(D::Error::custom(
                "expected numeric field to be JSON string or number",
            )),
        }
    }
}

/// Non-negative integer returned as either JSON number or JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransportCount {
    Int(u64),
    String(String),
}

impl TransportCount {
    pub fn into_u64(self) -> Option<u64> {
        match self {
            Self::Int(value) => Some(value),
            Self::String(value) => value.trim().parse::<u64>().ok(),
        }
    }
}

/// Field helper treating JSON `null` like a missing field.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn number_or_zero(value: Option<TransportNumber>) -> f64 {
    value.map(TransportNumber::into_f64).unwrap_or_default()
}
