//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    BuyOptions, DEFAULT_POLL_INTERVAL, HostingOptions, OrderHistoryOptions, Pagination, Payout,
    WaitOptions,
};
pub use response::{
    CountryInfo, CountryPrices, DefaultCountry, Notification, OperatorAvailability,
    OperatorPricing, Order, OrderHistory, OrderStatus, Payment, PaymentHistory, PriceLimit,
    Prices, ProductCategory, ProductOffer, ProductPrices, Sms, SmsInbox, UserProfile,
    VendorPaymentHistory, VendorProfile, VendorWallets,
};
pub use validation::ValidationError;
pub use value::{
    ApiToken, FeeSystem, ForwardingNumber, Language, Operator, OrderCategory, OrderId,
    PayoutMethod,
};
