use chrono::{DateTime, Utc};
use cryptonator_common::parse_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CheckoutCurrency, CryptonatorApiError, InvoiceCurrency, InvoiceStatus, Language};

/// Parameters for a new invoice. `item_name`, both currencies and the amount are required; everything else falls
/// back to the merchant's account settings when left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub item_name: String,
    pub order_id: Option<String>,
    pub item_description: Option<String>,
    pub checkout_currency: CheckoutCurrency,
    pub invoice_amount: Decimal,
    pub invoice_currency: InvoiceCurrency,
    pub success_url: Option<String>,
    pub failed_url: Option<String>,
    pub language: Option<Language>,
}

impl NewInvoice {
    pub fn new<S: Into<String>>(
        item_name: S,
        invoice_currency: InvoiceCurrency,
        invoice_amount: Decimal,
        checkout_currency: CheckoutCurrency,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            order_id: None,
            item_description: None,
            checkout_currency,
            invoice_amount,
            invoice_currency,
            success_url: None,
            failed_url: None,
            language: None,
        }
    }

    pub fn with_order_id<S: Into<String>>(mut self, order_id: S) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.item_description = Some(description.into());
        self
    }

    pub fn with_success_url<S: Into<String>>(mut self, url: S) -> Self {
        self.success_url = Some(url.into());
        self
    }

    pub fn with_failed_url<S: Into<String>>(mut self, url: S) -> Self {
        self.failed_url = Some(url.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// The result of `createinvoice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedInvoice {
    pub invoice_id: String,
    /// The hosted checkout page. Cryptonator does not return this; the client fills it in from the invoice id.
    #[serde(default)]
    pub invoice_url: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub invoice_created: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub invoice_expires: DateTime<Utc>,
    pub checkout_currency: CheckoutCurrency,
    /// Amount due, in `checkout_currency`
    pub checkout_amount: Decimal,
    pub checkout_address: String,
}

/// The result of `getinvoice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    #[serde(default)]
    pub order_id: String,
    pub status: InvoiceStatus,
    pub currency: InvoiceCurrency,
    /// The invoice amount exactly as the API sent it. Use [`InvoiceDetails::amount`] for the numeric value.
    pub amount: String,
}

impl InvoiceDetails {
    pub fn amount(&self) -> Result<Decimal, CryptonatorApiError> {
        parse_amount(&self.amount).map_err(|e| CryptonatorApiError::InvalidAmount(e.to_string()))
    }
}

/// The result of `listinvoices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub invoice_count: u64,
    #[serde(default)]
    pub invoice_list: Vec<String>,
}

/// Filters for `listinvoices`. A `None` field does not filter on that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub invoice_currency: Option<InvoiceCurrency>,
    pub checkout_currency: Option<CheckoutCurrency>,
}

impl InvoiceFilter {
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_invoice_currency(mut self, currency: InvoiceCurrency) -> Self {
        self.invoice_currency = Some(currency);
        self
    }

    pub fn with_checkout_currency(mut self, currency: CheckoutCurrency) -> Self {
        self.checkout_currency = Some(currency);
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn created_invoice_from_json() {
        let json = r#"{
            "invoice_id": "5e1f3a0c",
            "invoice_created": 1700000000,
            "invoice_expires": 1700003600,
            "checkout_currency": "bitcoin",
            "checkout_amount": 0.00021,
            "checkout_address": "bc1qexampleaddress",
            "error": ""
        }"#;
        let invoice: CreatedInvoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.invoice_id, "5e1f3a0c");
        assert_eq!(invoice.invoice_url, "");
        assert_eq!(invoice.invoice_created.timestamp(), 1_700_000_000);
        assert_eq!((invoice.invoice_expires - invoice.invoice_created).num_seconds(), 3600);
        assert_eq!(invoice.checkout_currency, CheckoutCurrency::Bitcoin);
        assert_eq!(invoice.checkout_amount, Decimal::new(21, 5));
    }

    #[test]
    fn invoice_details_amount() {
        let json = r#"{"order_id":"o-1","status":"unpaid","currency":"rur","amount":"1500.25","error":""}"#;
        let details: InvoiceDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.status, InvoiceStatus::Unpaid);
        assert_eq!(details.currency, InvoiceCurrency::Rub);
        assert_eq!(details.amount().unwrap(), Decimal::new(150025, 2));

        let bad = InvoiceDetails { amount: "n/a".to_string(), ..details };
        assert!(matches!(bad.amount(), Err(CryptonatorApiError::InvalidAmount(_))));
    }

    #[test]
    fn new_invoice_builder() {
        let invoice = NewInvoice::new("Widget", InvoiceCurrency::Eur, Decimal::new(995, 2), CheckoutCurrency::Monero)
            .with_order_id("42")
            .with_language(Language::German);
        assert_eq!(invoice.order_id.as_deref(), Some("42"));
        assert_eq!(invoice.language, Some(Language::German));
        assert!(invoice.item_description.is_none());
        assert!(invoice.success_url.is_none());
    }
}
