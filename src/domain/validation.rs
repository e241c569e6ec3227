use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidBaseUrl { input: String },
    UnknownVariant { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidBaseUrl { input } => write!(f, "invalid base url: {input}"),
            Self::UnknownVariant { field, input } => {
                write!(f, "unknown {field}: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
