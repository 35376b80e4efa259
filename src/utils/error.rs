use axum::http::StatusCode;
use thiserror::Error;

pub const CONFIG_MISSING_MESSAGE: &str = "Server Telegram config is missing";
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";
pub const NOT_FOUND_MESSAGE: &str = "Not found";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Telegram bot token or chat ids are not configured")]
    ConfigMissing,

    #[error("Lead payload is missing name, contact or goal")]
    InvalidPayload,

    #[error("Delivery failed for {failed} of {total} recipients")]
    DeliveryFailed { failed: usize, total: usize },

    #[error("Failed to read request body: {0}")]
    BodyRead(#[from] axum::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RelayError {
    /// HTTP status reported to the caller of `/api/lead`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidPayload => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the JSON response.
    ///
    /// Everything except the two client-visible cases collapses into the
    /// generic send failure, so a malformed body and an outage of the
    /// messaging API look the same from outside.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::ConfigMissing => CONFIG_MISSING_MESSAGE,
            RelayError::InvalidPayload => INVALID_PAYLOAD_MESSAGE,
            _ => SEND_FAILED_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        assert_eq!(RelayError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::InvalidPayload.public_message(), "Invalid payload");

        assert_eq!(
            RelayError::ConfigMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::ConfigMissing.public_message(),
            "Server Telegram config is missing"
        );
    }

    #[test]
    fn test_parse_and_delivery_errors_collapse() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let errors = [
            RelayError::from(parse_error),
            RelayError::DeliveryFailed { failed: 1, total: 2 },
        ];

        for error in errors {
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error.public_message(), "Failed to send message");
        }
    }
}
