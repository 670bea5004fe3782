use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
    StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    config::CryptonatorConfig,
    minimum_payment::MinimumPaymentCalculator,
    signature::{ParamField, SignedForm, CREATE_INVOICE_FIELDS, GET_INVOICE_FIELDS, LIST_INVOICES_FIELDS},
    CreatedInvoice,
    CryptonatorApiError,
    InvoiceDetails,
    InvoiceFilter,
    InvoiceList,
    MinimumPaymentTable,
    NewInvoice,
};

const USER_AGENT: &str = concat!("cryptonator_api/", env!("CARGO_PKG_VERSION"));

/// Authenticated client for the merchant API.
///
/// The client holds only the configuration and a shared HTTP client, so it is cheap to clone and safe to use from
/// several tasks at once. Each call makes exactly one request and never retries. Timeouts and retries belong on the
/// `reqwest::Client` passed to [`CryptonatorApi::with_client`].
#[derive(Debug, Clone)]
pub struct CryptonatorApi {
    config: CryptonatorConfig,
    client: Arc<Client>,
}

impl CryptonatorApi {
    /// Create a client using the default transport: a plain `reqwest::Client` that asks for JSON responses.
    pub fn new(config: CryptonatorConfig) -> Result<Self, CryptonatorApiError> {
        Ok(Self::with_client(config, default_client()?))
    }

    pub fn with_client(config: CryptonatorConfig, client: Client) -> Self {
        Self { config, client: Arc::new(client) }
    }

    pub fn config(&self) -> &CryptonatorConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Create a new invoice with a fixed checkout currency. The payer cannot switch to a different coin.
    ///
    /// On success Cryptonator hosts a checkout page for the invoice; its address is returned in
    /// [`CreatedInvoice::invoice_url`].
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<CreatedInvoice, CryptonatorApiError> {
        const OPERATION: &str = "create_invoice";
        let form = self.sign(invoice, CREATE_INVOICE_FIELDS);
        debug!("Creating {} {} invoice for '{}'", invoice.invoice_amount, invoice.invoice_currency, invoice.item_name);
        let mut result = self.post_form::<CreatedInvoice>(OPERATION, "/createinvoice", &form).await?;
        result.invoice_url = format!("{}{}", self.config.invoice_page_url, result.invoice_id);
        info!("Created invoice {} ({} {})", result.invoice_id, result.checkout_amount, result.checkout_currency);
        Ok(result)
    }

    /// Fetch the current state of an invoice. An empty `invoice_id` is passed through and rejected remotely.
    pub async fn get_invoice(&self, invoice_id: &str) -> Result<InvoiceDetails, CryptonatorApiError> {
        const OPERATION: &str = "get_invoice";
        let form = self.sign(invoice_id, GET_INVOICE_FIELDS);
        debug!("Fetching invoice {invoice_id}");
        let result = self.post_form::<InvoiceDetails>(OPERATION, "/getinvoice", &form).await?;
        info!("Fetched invoice {invoice_id}. Status: {}", result.status);
        Ok(result)
    }

    /// List the ids of all invoices matching `filter`.
    pub async fn list_invoices(&self, filter: &InvoiceFilter) -> Result<InvoiceList, CryptonatorApiError> {
        const OPERATION: &str = "list_invoices";
        let form = self.sign(filter, LIST_INVOICES_FIELDS);
        debug!("Listing invoices. Filter: {filter:?}");
        let result = self.post_form::<InvoiceList>(OPERATION, "/listinvoices", &form).await?;
        info!("Listed {} invoices", result.invoice_count);
        Ok(result)
    }

    /// Minimum invoice amounts per checkout coin, using this client's transport and configured price feed.
    pub async fn minimum_invoice_amounts(&self) -> Result<MinimumPaymentTable, CryptonatorApiError> {
        MinimumPaymentCalculator::from_shared(Arc::clone(&self.client), self.config.price_feed_url.clone())
            .calculate()
            .await
    }

    fn sign<T: ?Sized>(&self, params: &T, fields: &[ParamField<T>]) -> SignedForm {
        SignedForm::build(&self.config.merchant_id, params, fields, &self.config.merchant_secret)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        form: &SignedForm,
    ) -> Result<T, CryptonatorApiError> {
        let url = self.url(path);
        trace!("{operation}: POST {url} with fields {:?}", form.field_names());
        let response = self
            .client
            .post(url)
            .form(form.pairs())
            .send()
            .await
            .map_err(|source| CryptonatorApiError::Transport { operation, source })?;
        let status = response.status();
        let body = response.bytes().await.map_err(|source| CryptonatorApiError::Transport { operation, source })?;
        trace!("{operation}: response {status}, {} bytes", body.len());
        decode_response(Upstream::Merchant, operation, status, &body)
    }
}

pub(crate) fn default_client() -> Result<Client, CryptonatorApiError> {
    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| CryptonatorApiError::Initialization(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<Value>,
}

impl ErrorEnvelope {
    fn message(self) -> Option<String> {
        match self.error? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// The service a response came from. Decides which error variant a rejection is reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upstream {
    Merchant,
    PriceFeed,
}

impl Upstream {
    fn rejection(self, operation: &'static str, status: StatusCode, message: String) -> CryptonatorApiError {
        match self {
            Self::Merchant => CryptonatorApiError::RemoteApi { operation, status, message },
            Self::PriceFeed => CryptonatorApiError::PriceFeed { operation, status, message },
        }
    }
}

/// Decode a response body. A non-empty `error` field wins over everything else, since Cryptonator reports business
/// errors inside `200 OK` responses. A non-2xx status with no `error` field is also a rejection.
pub(crate) fn decode_response<T: DeserializeOwned>(
    upstream: Upstream,
    operation: &'static str,
    status: StatusCode,
    body: &[u8],
) -> Result<T, CryptonatorApiError> {
    let remote_error = serde_json::from_slice::<ErrorEnvelope>(body).ok().and_then(ErrorEnvelope::message);
    if let Some(message) = remote_error {
        warn!("{operation}: {upstream:?} rejected the request. {status} {message}");
        return Err(upstream.rejection(operation, status, message));
    }
    if !status.is_success() {
        let message = String::from_utf8_lossy(body).trim().to_string();
        warn!("{operation}: {upstream:?} request failed. {status} {message}");
        return Err(upstream.rejection(operation, status, message));
    }
    serde_json::from_slice::<T>(body).map_err(|e| CryptonatorApiError::Decode { operation, message: e.to_string() })
}

#[cfg(test)]
mod test {
    use super::*;

    fn merchant<T: DeserializeOwned>(
        operation: &'static str,
        status: StatusCode,
        body: &[u8],
    ) -> Result<T, CryptonatorApiError> {
        decode_response(Upstream::Merchant, operation, status, body)
    }

    #[test]
    fn error_field_wins_on_200() {
        let err = merchant::<InvoiceList>("list_invoices", StatusCode::OK, br#"{"error":"bad_hash"}"#)
            .unwrap_err();
        match err {
            CryptonatorApiError::RemoteApi { operation, status, message } => {
                assert_eq!(operation, "list_invoices");
                assert_eq!(status, StatusCode::OK);
                assert_eq!(message, "bad_hash");
            },
            e => panic!("Expected RemoteApi, got {e:?}"),
        }
    }

    #[test]
    fn empty_error_field_is_success() {
        let body = br#"{"invoice_count":2,"invoice_list":["a","b"],"error":""}"#;
        let list = merchant::<InvoiceList>("list_invoices", StatusCode::OK, body).unwrap();
        assert_eq!(list.invoice_count, 2);
        assert_eq!(list.invoice_list, vec!["a", "b"]);
        let body = br#"{"invoice_count":0,"error":null}"#;
        let list = merchant::<InvoiceList>("list_invoices", StatusCode::OK, body).unwrap();
        assert!(list.invoice_list.is_empty());
    }

    #[test]
    fn non_success_without_error_field() {
        let err =
            merchant::<InvoiceList>("list_invoices", StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "list_invoices: cryptonator api error: 502 Bad Gateway upstream down");
    }

    #[test]
    fn price_feed_rejections() {
        let err = decode_response::<InvoiceList>(
            Upstream::PriceFeed,
            "minimum_invoice_amounts",
            StatusCode::TOO_MANY_REQUESTS,
            b"Too many requests",
        )
        .unwrap_err();
        assert!(matches!(err, CryptonatorApiError::PriceFeed { .. }));
        assert!(!err.is_remote());
        assert!(err.is_retryable());
        assert!(!err.to_string().contains("cryptonator"));
        let err = decode_response::<InvoiceList>(
            Upstream::PriceFeed,
            "minimum_invoice_amounts",
            StatusCode::OK,
            br#"{"error":"coin not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "minimum_invoice_amounts: price feed error: 200 OK coin not found");
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = merchant::<InvoiceList>("list_invoices", StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, CryptonatorApiError::Decode { operation: "list_invoices", .. }));
        let err = merchant::<InvoiceList>("list_invoices", StatusCode::OK, br#"{"invoice_list":[]}"#)
            .unwrap_err();
        assert!(matches!(err, CryptonatorApiError::Decode { .. }));
    }

    #[test]
    fn non_string_error_field() {
        let err = merchant::<InvoiceList>("get_invoice", StatusCode::OK, br#"{"error":{"code":7}}"#)
            .unwrap_err();
        match err {
            CryptonatorApiError::RemoteApi { message, .. } => assert_eq!(message, r#"{"code":7}"#),
            e => panic!("Expected RemoteApi, got {e:?}"),
        }
    }
}
