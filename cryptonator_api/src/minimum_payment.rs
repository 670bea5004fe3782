//! Minimum invoice amounts.
//!
//! Cryptonator rejects payments below a fixed amount of each coin (e.g. 0.0001 BTC, 10 DOGE), and below a fixed
//! fiat amount (1 USD, 1 EUR, 10 RUB). To know the smallest invoice worth creating, the coin minimum is converted to
//! fiat at the current spot price, rounded *up* to the cent, and then raised to the fiat floor if it falls below it:
//!
//! ```text
//!    minimum = max(ceil(price * coin_minimum * 100) / 100, fiat_floor)
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use cryptonator_common::ceil_to_cents;
use log::*;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    api::{decode_response, default_client, Upstream},
    config::DEFAULT_PRICE_FEED_URL,
    CheckoutCurrency,
    CryptonatorApiError,
    InvoiceCurrency,
};

const OPERATION: &str = "minimum_invoice_amounts";

/// Spot prices of one coin, as quoted by the price feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatPrices {
    pub usd: Decimal,
    pub eur: Decimal,
    pub rub: Decimal,
}

impl FiatPrices {
    pub fn new(usd: Decimal, eur: Decimal, rub: Decimal) -> Self {
        Self { usd, eur, rub }
    }

    pub fn price(&self, currency: InvoiceCurrency) -> Decimal {
        match currency {
            InvoiceCurrency::Usd => self.usd,
            InvoiceCurrency::Eur => self.eur,
            InvoiceCurrency::Rub => self.rub,
        }
    }
}

/// Price feed response, keyed by the feed's coin id (`bitcoin-cash`, `tether`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotPrices(HashMap<String, FiatPrices>);

impl SpotPrices {
    pub fn with_price(mut self, currency: CheckoutCurrency, prices: FiatPrices) -> Self {
        self.0.insert(currency.price_feed_id().to_string(), prices);
        self
    }

    pub fn get(&self, currency: CheckoutCurrency) -> Option<&FiatPrices> {
        self.0.get(currency.price_feed_id())
    }
}

/// `max(ceil(spot_price * coin_minimum * 100) / 100, fiat.minimum_amount())`
pub fn minimum_fiat_amount(coin_minimum: Decimal, spot_price: Decimal, fiat: InvoiceCurrency) -> Decimal {
    let raw = ceil_to_cents(spot_price * coin_minimum);
    raw.max(fiat.minimum_amount())
}

/// Minimum invoice amount for every checkout coin, in every invoice currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MinimumPaymentTable(BTreeMap<CheckoutCurrency, BTreeMap<InvoiceCurrency, Decimal>>);

impl MinimumPaymentTable {
    /// Builds the full table. Each coin is converted at its own price, and a coin missing from `prices` fails the
    /// whole calculation.
    pub fn from_prices(prices: &SpotPrices) -> Result<Self, CryptonatorApiError> {
        let mut table = BTreeMap::new();
        for &coin in CheckoutCurrency::ALL {
            let spot = prices.get(coin).ok_or_else(|| CryptonatorApiError::Decode {
                operation: OPERATION,
                message: format!("No spot price for {} ({})", coin.ticker(), coin.price_feed_id()),
            })?;
            let minimums = InvoiceCurrency::ALL
                .iter()
                .map(|&fiat| (fiat, minimum_fiat_amount(coin.minimum_payment(), spot.price(fiat), fiat)))
                .collect::<BTreeMap<_, _>>();
            trace!("Minimum invoice for {}: {minimums:?}", coin.ticker());
            table.insert(coin, minimums);
        }
        Ok(Self(table))
    }

    pub fn get(&self, checkout: CheckoutCurrency, invoice: InvoiceCurrency) -> Option<Decimal> {
        self.0.get(&checkout).and_then(|m| m.get(&invoice)).copied()
    }

    pub fn for_checkout(&self, checkout: CheckoutCurrency) -> Option<&BTreeMap<InvoiceCurrency, Decimal>> {
        self.0.get(&checkout)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CheckoutCurrency, &BTreeMap<InvoiceCurrency, Decimal>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fetches spot prices and derives a [`MinimumPaymentTable`]. Nothing is cached; every call hits the price feed once.
#[derive(Debug, Clone)]
pub struct MinimumPaymentCalculator {
    client: Arc<Client>,
    price_feed_url: String,
}

impl MinimumPaymentCalculator {
    /// Uses the default transport and the public CoinGecko endpoint.
    pub fn new() -> Result<Self, CryptonatorApiError> {
        Ok(Self::with_client(default_client()?, DEFAULT_PRICE_FEED_URL))
    }

    pub fn with_client<S: Into<String>>(client: Client, price_feed_url: S) -> Self {
        Self::from_shared(Arc::new(client), price_feed_url.into())
    }

    pub(crate) fn from_shared(client: Arc<Client>, price_feed_url: String) -> Self {
        Self { client, price_feed_url }
    }

    pub async fn fetch_spot_prices(&self) -> Result<SpotPrices, CryptonatorApiError> {
        let ids = CheckoutCurrency::ALL.iter().map(|c| c.price_feed_id()).collect::<Vec<_>>().join(",");
        let vs_currencies = InvoiceCurrency::ALL.iter().map(|c| c.price_feed_code()).collect::<Vec<_>>().join(",");
        debug!("Fetching spot prices from {}", self.price_feed_url);
        let response = self
            .client
            .get(&self.price_feed_url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", vs_currencies.as_str())])
            .send()
            .await
            .map_err(|source| CryptonatorApiError::Transport { operation: OPERATION, source })?;
        let status = response.status();
        let body =
            response.bytes().await.map_err(|source| CryptonatorApiError::Transport { operation: OPERATION, source })?;
        decode_response(Upstream::PriceFeed, OPERATION, status, &body)
    }

    pub async fn calculate(&self) -> Result<MinimumPaymentTable, CryptonatorApiError> {
        let prices = self.fetch_spot_prices().await?;
        let table = MinimumPaymentTable::from_prices(&prices)?;
        info!("Calculated minimum invoice amounts for {} checkout currencies", table.len());
        Ok(table)
    }
}
