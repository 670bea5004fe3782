//! The closed sets of codes the merchant API understands.
//!
//! Fiat invoice currencies and cryptocurrency checkout currencies are separate types, so a coin can never be passed
//! where a fiat code is expected. Each variant carries the exact string the remote service expects on the wire.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CryptonatorApiError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident ($kind:literal) { $($(#[$vmeta:meta])* $variant:ident => $wire:tt),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The code as sent to, and received from, the merchant API.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CryptonatorApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let code = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == code)
                    .ok_or_else(|| CryptonatorApiError::UnknownCode { kind: $kind, code: s.to_string() })
            }
        }
    };
}

wire_enum!(
    /// Fiat currency an invoice is denominated in.
    InvoiceCurrency ("invoice currency") {
        Usd => "usd",
        Eur => "eur",
        /// Cryptonator spells the ruble `rur`.
        Rub => "rur",
    }
);

wire_enum!(
    /// Cryptocurrency the payer actually pays with.
    CheckoutCurrency ("checkout currency") {
        Bitcoin => "bitcoin",
        BitcoinCash => "bitcoincash",
        Dash => "dash",
        Dogecoin => "dogecoin",
        Ethereum => "ethereum",
        Litecoin => "litecoin",
        Monero => "monero",
        Ripple => "ripple",
        TetherUs => "usdt",
        Zcash => "zcash",
    }
);

wire_enum!(
    /// Display language of the hosted checkout page. English is used when none is given.
    Language ("language") {
        English => "en",
        German => "de",
        Spanish => "es",
        French => "fr",
        Russian => "ru",
        Chinese => "cn",
    }
);

wire_enum!(
    /// Invoice lifecycle: `unpaid -> confirming -> paid | cancelled | mispaid`.
    InvoiceStatus ("invoice status") {
        Unpaid => "unpaid",
        Confirming => "confirming",
        Paid => "paid",
        Cancelled => "cancelled",
        Mispaid => "mispaid",
    }
);

impl InvoiceCurrency {
    pub fn ticker(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Rub => "RUB",
        }
    }

    /// The vs-currency code used by the CoinGecko price feed.
    pub fn price_feed_code(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Rub => "rub",
        }
    }

    /// Smallest invoice Cryptonator accepts in this currency, regardless of the checkout coin.
    pub fn minimum_amount(&self) -> Decimal {
        match self {
            Self::Usd => Decimal::new(100, 2),
            Self::Eur => Decimal::new(100, 2),
            Self::Rub => Decimal::new(1000, 2),
        }
    }
}

impl CheckoutCurrency {
    pub fn ticker(&self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::BitcoinCash => "BCH",
            Self::Dash => "DASH",
            Self::Dogecoin => "DOGE",
            Self::Ethereum => "ETH",
            Self::Litecoin => "LTC",
            Self::Monero => "XMR",
            Self::Ripple => "XRP",
            Self::TetherUs => "USDT",
            Self::Zcash => "ZEC",
        }
    }

    /// The coin id used by the CoinGecko price feed.
    pub fn price_feed_id(&self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::BitcoinCash => "bitcoin-cash",
            Self::Dash => "dash",
            Self::Dogecoin => "dogecoin",
            Self::Ethereum => "ethereum",
            Self::Litecoin => "litecoin",
            Self::Monero => "monero",
            Self::Ripple => "ripple",
            Self::TetherUs => "tether",
            Self::Zcash => "zcash",
        }
    }

    /// Smallest payment, in coins, that Cryptonator accepts for this currency.
    pub fn minimum_payment(&self) -> Decimal {
        match self {
            Self::Bitcoin | Self::BitcoinCash | Self::Zcash => Decimal::new(1, 4),
            Self::Dash | Self::Ethereum | Self::Litecoin | Self::Monero => Decimal::new(1, 3),
            Self::Dogecoin | Self::TetherUs => Decimal::from(10),
            Self::Ripple => Decimal::ONE,
        }
    }
}

impl InvoiceStatus {
    /// Paid, cancelled and mispaid invoices never change state again.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled | Self::Mispaid)
    }
}
