#![allow(dead_code)]

use cryptonator_api::{CryptonatorApi, CryptonatorConfig, Secret};
use wiremock::{MockServer, Request};

pub const MERCHANT_ID: &str = "m123";
pub const MERCHANT_SECRET: &str = "s3cret";
pub const INVOICE_PAGE: &str = "https://pay.example/invoice/";

/// An address nothing listens on, for transport failures.
pub const DEAD_URL: &str = "http://127.0.0.1:1";

pub fn prepare_env() {
    let _ = env_logger::try_init();
}

pub fn config_for(server: &MockServer) -> CryptonatorConfig {
    CryptonatorConfig::new(MERCHANT_ID, Secret::from(MERCHANT_SECRET))
        .with_api_url(server.uri())
        .with_invoice_page_url(INVOICE_PAGE)
        .with_price_feed_url(format!("{}/simple/price", server.uri()))
}

pub fn api_for(server: &MockServer) -> CryptonatorApi {
    CryptonatorApi::new(config_for(server)).expect("Failed to create client")
}

/// Field names of a form-encoded request body, in order.
pub fn form_field_names(request: &Request) -> Vec<String> {
    String::from_utf8_lossy(&request.body)
        .split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| kv.split('=').next().unwrap_or_default().to_string())
        .collect()
}

pub async fn single_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.expect("Request recording is disabled");
    assert_eq!(requests.len(), 1, "Expected exactly one request");
    requests.remove(0)
}
