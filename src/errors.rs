/*!
 * Error types for the page-translate library.
 *
 * This module contains custom error types for the transport layer and the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while moving a batch to and from the remote endpoint
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when decoding an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Non-success HTTP status returned by the endpoint
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Body or reason returned with the status
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The proxy message channel went away before a reply arrived
    #[error("Message channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors surfaced by the translation pipeline
///
/// Every variant carries a stable code (see [`TranslationError::code`]) so callers
/// across a message boundary can match on it without parsing the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// No usable provider configuration for the requested source identifier,
    /// or the configured endpoint could not be understood
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested or detected language is not in the supported table
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The remote answered with a non-success code
    #[error("Provider error [{code}]: {message}")]
    Provider {
        /// Code reported by the provider
        code: String,
        /// Provider message, or the code when none was given
        message: String,
    },

    /// The returned items do not line up with what was sent
    #[error("Count mismatch: {0}")]
    CountMismatch(String),

    /// Network or proxy failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl TranslationError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "E_CONFIGURATION",
            Self::UnsupportedLanguage(_) => "E_UNSUPPORTED_LANGUAGE",
            Self::Provider { .. } => "E_PROVIDER",
            Self::CountMismatch(_) => "E_COUNT_MISMATCH",
            Self::Transport(_) => "E_TRANSPORT",
        }
    }
}

/// Main application error type used by the command line front end
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation pipeline
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::File(error.to_string())
    }
}
