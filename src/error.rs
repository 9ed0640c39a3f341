/// Error type shared by the background worker, popup and options page
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShortenError {
    /// Bad user input, rejected before anything goes over the network
    #[error("{0}")]
    Validation(String),

    #[error("API key is missing")]
    MissingApiKey,

    /// HTTP 401 from the API
    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("browser API failed: {0}")]
    Browser(String),
}

impl ShortenError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShortenError::Validation(message.into())
    }

    /// True when the caller should switch to the "add your API key" view
    pub fn requires_auth(&self) -> bool {
        matches!(self, ShortenError::MissingApiKey | ShortenError::Unauthorized(_))
    }

    /// Text suitable for the popup status line or a log entry
    pub fn user_message(&self) -> String {
        match self {
            ShortenError::MissingApiKey => {
                "Add your API key to start shortening links.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_auth() {
        assert!(ShortenError::MissingApiKey.requires_auth());
        assert!(ShortenError::Unauthorized("nope".to_string()).requires_auth());
        assert!(!ShortenError::Transport("offline".to_string()).requires_auth());
        assert!(
            !ShortenError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .requires_auth()
        );
    }

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ShortenError::Api {
            status: 400,
            message: "Custom URL is already in use.".to_string(),
        };
        assert_eq!(err.user_message(), "Custom URL is already in use.");
    }

    #[test]
    fn test_missing_api_key_message() {
        assert_eq!(
            ShortenError::MissingApiKey.user_message(),
            "Add your API key to start shortening links."
        );
    }
}
