use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptonatorApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("{operation}: request failed. {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation}: could not deserialize JSON. {message}")]
    Decode { operation: &'static str, message: String },
    #[error("{operation}: cryptonator api error: {status} {message}")]
    RemoteApi { operation: &'static str, status: StatusCode, message: String },
    #[error("{operation}: price feed error: {status} {message}")]
    PriceFeed { operation: &'static str, status: StatusCode, message: String },
    #[error("Invalid currency amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: String },
}

impl CryptonatorApiError {
    /// The public operation that failed, if the error came from a remote call.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport { operation, .. } |
            Self::Decode { operation, .. } |
            Self::RemoteApi { operation, .. } |
            Self::PriceFeed { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// True if the request never produced a response. These are the only errors worth retrying.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// True if repeating the same call later may succeed: transport failures, and price feed rate limits or server
    /// errors. Merchant API rejections are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::PriceFeed { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
            _ => false,
        }
    }

    /// True if the merchant API rejected the request (e.g. `bad_hash`), whatever the HTTP status was.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteApi { .. })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn remote_error_display() {
        let err = CryptonatorApiError::RemoteApi {
            operation: "create_invoice",
            status: StatusCode::OK,
            message: "bad_hash".to_string(),
        };
        assert_eq!(err.to_string(), "create_invoice: cryptonator api error: 200 OK bad_hash");
        assert_eq!(err.operation(), Some("create_invoice"));
        assert!(err.is_remote());
        assert!(!err.is_transport());
        assert!(!err.is_retryable());
    }

    #[test]
    fn price_feed_errors() {
        let err = CryptonatorApiError::PriceFeed {
            operation: "minimum_invoice_amounts",
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "Too many requests".to_string(),
        };
        assert_eq!(err.to_string(), "minimum_invoice_amounts: price feed error: 429 Too Many Requests Too many requests");
        assert_eq!(err.operation(), Some("minimum_invoice_amounts"));
        assert!(!err.is_remote());
        assert!(err.is_retryable());
        let err = CryptonatorApiError::PriceFeed {
            operation: "minimum_invoice_amounts",
            status: StatusCode::NOT_FOUND,
            message: "coin not found".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn decode_error_display() {
        let err = CryptonatorApiError::Decode { operation: "get_invoice", message: "expected value".to_string() };
        assert_eq!(err.to_string(), "get_invoice: could not deserialize JSON. expected value");
        assert!(!err.is_remote());
        let err = CryptonatorApiError::UnknownCode { kind: "currency", code: "gbp".to_string() };
        assert_eq!(err.to_string(), "Unknown currency code: gbp");
        assert_eq!(err.operation(), None);
    }
}
