mod amounts;
mod secret;

pub use amounts::{ceil_to_cents, parse_amount, AmountParseError};
pub use secret::Secret;
