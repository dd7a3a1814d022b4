//! Error definitions for the chat client.

use thiserror::Error;

/// Errors that can occur while validating input or talking to the chat API.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing, empty, malformed or out-of-range argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Address does not match `(0x)?` followed by 40 hex digits.
    #[error("Invalid Ethereum address \"{0}\"")]
    InvalidAddressFormat(String),

    /// Mixed-case address whose casing disagrees with its EIP-55 checksum.
    #[error("Invalid checksum address for \"{0}\"")]
    InvalidChecksum(String),

    /// A data method was called before an API key was accepted.
    #[error("Client not initialized: call init() before any other method")]
    NotInitialized,

    /// `init` was called on a client that already holds an API key.
    #[error("Client already initialized: init() may only be called once")]
    AlreadyInitialized,

    /// The server rejected the API key during ping.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Network or HTTP failure, propagated unchanged.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with `status` "0".
    #[error("API error: {message}")]
    Api { message: String },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ChatError {
    /// True for errors raised locally before any request was built.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ChatError::InvalidInput(_)
                | ChatError::InvalidAddressFormat(_)
                | ChatError::InvalidChecksum(_)
        )
    }
}

/// Result type for chat client operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::InvalidAddressFormat("0x123".to_string());
        assert_eq!(err.to_string(), "Invalid Ethereum address \"0x123\"");

        let err = ChatError::Api {
            message: "NOTOK".to_string(),
        };
        assert!(err.to_string().contains("NOTOK"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(ChatError::InvalidInput("x".into()).is_validation());
        assert!(ChatError::InvalidChecksum("x".into()).is_validation());
        assert!(!ChatError::NotInitialized.is_validation());
        assert!(!ChatError::InvalidApiKey.is_validation());
    }
}
