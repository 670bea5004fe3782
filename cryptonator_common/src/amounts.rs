use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid decimal amount: {0}")]
pub struct AmountParseError(String);

/// Payment services send amounts as decimal strings ("10.50"). Surrounding whitespace is ignored.
pub fn parse_amount(amount: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError("empty string".to_string()));
    }
    Decimal::from_str(trimmed).map_err(|e| AmountParseError(format!("{amount}. {e}")))
}

/// Rounds up (towards positive infinity) to the nearest hundredth of a unit, i.e. `ceil(value * 100) / 100`.
/// The result always carries two decimal places, so `5` is returned as `5.00`.
pub fn ceil_to_cents(value: Decimal) -> Decimal {
    let mut result = (value * Decimal::ONE_HUNDRED).ceil() / Decimal::ONE_HUNDRED;
    result.rescale(2);
    result
}
