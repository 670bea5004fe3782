//! # Request signatures
//!
//! Every merchant API call carries a `secret_hash` field. The server recomputes it and rejects the call on a
//! mismatch, so the hash input has to be reproduced byte-for-byte:
//!
//! ```text
//!    sha1( merchant_id & field_1 & field_2 & ... & field_n & merchant_secret )
//! ```
//!
//! rendered as lowercase hex. The fields are positional. A field that is not sent still occupies its slot as an
//! empty string, so `m1&Widget&&&bitcoin...` is a valid hash input.
//!
//! The field order for each call lives in a single table ([`CREATE_INVOICE_FIELDS`], [`GET_INVOICE_FIELDS`],
//! [`LIST_INVOICES_FIELDS`]). [`SignedForm::build`] walks the table once to produce both the transmitted form and the
//! hash input, so the two always agree.

use cryptonator_common::Secret;
use sha1::{Digest, Sha1};

use crate::{InvoiceFilter, NewInvoice};

/// One positional slot in a signed request. `value` returning `None` (or an empty string) means the field is left
/// out of the form, and hashed as `""`.
pub struct ParamField<T: ?Sized> {
    /// Form key, e.g. `invoice_currency`
    pub name: &'static str,
    /// Reads the field's wire value from the request parameters
    pub value: fn(&T) -> Option<String>,
}

/// `createinvoice` fields, after `merchant_id`.
pub const CREATE_INVOICE_FIELDS: &[ParamField<NewInvoice>] = &[
    ParamField { name: "item_name", value: |p| Some(p.item_name.clone()) },
    ParamField { name: "order_id", value: |p| p.order_id.clone() },
    ParamField { name: "item_description", value: |p| p.item_description.clone() },
    ParamField { name: "checkout_currency", value: |p| Some(p.checkout_currency.to_string()) },
    ParamField { name: "invoice_amount", value: |p| Some(p.invoice_amount.to_string()) },
    ParamField { name: "invoice_currency", value: |p| Some(p.invoice_currency.to_string()) },
    ParamField { name: "success_url", value: |p| p.success_url.clone() },
    ParamField { name: "failed_url", value: |p| p.failed_url.clone() },
    ParamField { name: "language", value: |p| p.language.map(|l| l.to_string()) },
];

/// `getinvoice` fields, after `merchant_id`.
pub const GET_INVOICE_FIELDS: &[ParamField<str>] =
    &[ParamField { name: "invoice_id", value: |invoice_id| Some(invoice_id.to_string()) }];

/// `listinvoices` fields, after `merchant_id`.
pub const LIST_INVOICES_FIELDS: &[ParamField<InvoiceFilter>] = &[
    ParamField { name: "invoice_status", value: |f| f.status.map(|s| s.to_string()) },
    ParamField { name: "invoice_currency", value: |f| f.invoice_currency.map(|c| c.to_string()) },
    ParamField { name: "checkout_currency", value: |f| f.checkout_currency.map(|c| c.to_string()) },
];

/// The string that gets hashed: every part, then the secret, joined with `&`.
pub fn hash_input<S: AsRef<str>>(parts: &[S], secret: &str) -> String {
    let mut input = String::new();
    for part in parts {
        input.push_str(part.as_ref());
        input.push('&');
    }
    input.push_str(secret);
    input
}

/// Lowercase hex SHA-1 of [`hash_input`].
pub fn secret_hash<S: AsRef<str>>(parts: &[S], secret: &str) -> String {
    let digest = Sha1::digest(hash_input(parts, secret).as_bytes());
    format!("{digest:x}")
}

/// The form body of a signed request: `merchant_id`, the present fields in table order, then `secret_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedForm {
    pairs: Vec<(&'static str, String)>,
    secret_hash: String,
}

impl SignedForm {
    pub fn build<T: ?Sized>(
        merchant_id: &str,
        params: &T,
        fields: &[ParamField<T>],
        secret: &Secret<String>,
    ) -> Self {
        let mut pairs = Vec::with_capacity(fields.len() + 2);
        let mut parts = Vec::with_capacity(fields.len() + 1);
        pairs.push(("merchant_id", merchant_id.to_string()));
        parts.push(merchant_id.to_string());
        for field in fields {
            match (field.value)(params).filter(|v| !v.is_empty()) {
                Some(value) => {
                    parts.push(value.clone());
                    pairs.push((field.name, value));
                },
                None => parts.push(String::new()),
            }
        }
        let secret_hash = secret_hash(&parts, secret.reveal());
        pairs.push(("secret_hash", secret_hash.clone()));
        Self { pairs, secret_hash }
    }

    /// The `(key, value)` pairs to send as the form body, in transmission order.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    /// The transmitted value of `name`, or `None` if the field was left out of the form.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// Names of the transmitted fields, for logging. Never log the values; they include the hash.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|(n, _)| *n).collect()
    }
}
