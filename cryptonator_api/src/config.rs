use cryptonator_common::Secret;

pub const DEFAULT_API_URL: &str = "https://api.cryptonator.com/api/merchant/v1";
pub const DEFAULT_INVOICE_PAGE_URL: &str = "https://www.cryptonator.com/merchant/invoice/";
pub const DEFAULT_PRICE_FEED_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Merchant credentials and endpoints. Everything is supplied by the embedding application; nothing is read from the
/// environment.
#[derive(Debug, Clone)]
pub struct CryptonatorConfig {
    pub merchant_id: String,
    pub merchant_secret: Secret<String>,
    pub api_url: String,
    /// Base of the hosted checkout page. The invoice id is appended as-is.
    pub invoice_page_url: String,
    pub price_feed_url: String,
}

impl CryptonatorConfig {
    pub fn new<S: Into<String>>(merchant_id: S, merchant_secret: Secret<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_secret,
            api_url: DEFAULT_API_URL.to_string(),
            invoice_page_url: DEFAULT_INVOICE_PAGE_URL.to_string(),
            price_feed_url: DEFAULT_PRICE_FEED_URL.to_string(),
        }
    }

    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_invoice_page_url<S: Into<String>>(mut self, url: S) -> Self {
        self.invoice_page_url = url.into();
        self
    }

    pub fn with_price_feed_url<S: Into<String>>(mut self, url: S) -> Self {
        self.price_feed_url = url.into();
        self
    }
}
