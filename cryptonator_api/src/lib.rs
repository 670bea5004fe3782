//! Client for the Cryptonator merchant API.
//!
//! [`CryptonatorApi`] creates, fetches and lists invoices on behalf of a merchant. Every request is authenticated
//! with a `secret_hash` computed over a fixed positional list of parameters (see [`signature`]).
//!
//! [`MinimumPaymentCalculator`] works out the smallest invoice amount, per fiat currency, that Cryptonator will
//! accept for each supported cryptocurrency, using spot prices from CoinGecko.
mod api;
mod config;
mod currencies;
mod data_objects;
mod error;
mod minimum_payment;
pub mod signature;

pub use api::CryptonatorApi;
pub use config::{CryptonatorConfig, DEFAULT_API_URL, DEFAULT_INVOICE_PAGE_URL, DEFAULT_PRICE_FEED_URL};
pub use cryptonator_common::Secret;
pub use currencies::{CheckoutCurrency, InvoiceCurrency, InvoiceStatus, Language};
pub use data_objects::{CreatedInvoice, InvoiceDetails, InvoiceFilter, InvoiceList, NewInvoice};
pub use error::CryptonatorApiError;
pub use minimum_payment::{minimum_fiat_amount, FiatPrices, MinimumPaymentCalculator, MinimumPaymentTable, SpotPrices};
pub use rust_decimal::Decimal;
