//! OJP error types

use thiserror::Error;

/// Errors raised while turning XML into the protocol model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input is not well-formed XML
    #[error("Malformed XML: {0}")]
    Malformed(String),

    /// Document root is not `<OJP>`
    #[error("Unexpected root element <{0}>")]
    UnexpectedRoot(String),

    /// A required child element is absent
    #[error("Missing <{element}> in <{parent}>")]
    MissingElement {
        /// Canonical name of the enclosing element
        parent: String,
        /// Canonical name of the missing element
        element: String,
    },

    /// Element text could not be converted to the expected type
    #[error("Invalid value {value:?} in <{element}>: {reason}")]
    InvalidValue {
        /// Canonical element name
        element: String,
        /// Raw text found on the wire
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// None of the candidate shapes of a tagged union matched
    #[error("No matching variant for <{element}> (tried {})", .attempted.join(", "))]
    NoMatchingVariant {
        /// Canonical name of the union element
        element: String,
        /// Variant tags in the order they were attempted
        attempted: Vec<&'static str>,
    },
}

impl DecodeError {
    /// Create a missing element error
    pub fn missing(parent: impl Into<String>, element: impl Into<String>) -> Self {
        Self::MissingElement {
            parent: parent.into(),
            element: element.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid(
        element: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            element: element.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while writing the protocol model as XML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The underlying XML writer failed
    #[error("XML write failed: {0}")]
    Write(String),

    /// The envelope has nothing to encode
    #[error("Envelope is empty")]
    EmptyEnvelope,
}

/// Errors raised by a [`Transport`](crate::Transport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection to the OJP endpoint failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// A configured header could not be used
    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Header name as configured
        name: String,
        /// Why the header was rejected
        reason: String,
    },

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Errors surfaced by the OJP client and the paginated trip loader
#[derive(Debug, Error)]
pub enum OjpError {
    /// Response bytes are malformed or violate the schema
    #[error("Decoding failed: {0}")]
    DecodingFailed(#[from] DecodeError),

    /// Response is well-formed but lacks the expected delivery
    #[error("Response did not contain the expected delivery")]
    UnexpectedEmpty,

    /// Request could not be serialized
    #[error("Encoding failed: {0}")]
    EncodingFailed(#[from] EncodeError),

    /// Endpoint answered with a non-success status
    #[error("Unexpected HTTP status {0}")]
    UnexpectedHttpStatus(u16),

    /// Transport-level failure or cancellation
    #[error("Loading failed: {0}")]
    LoadingFailed(String),

    /// Client configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request arguments were rejected before anything was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation requires state that does not exist yet
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Cause carried by [`OjpError::LoadingFailed`] when a load is cancelled
pub const CANCELLED: &str = "request cancelled";

impl OjpError {
    /// Loading failure raised for a cancelled request
    #[must_use]
    pub fn cancelled() -> Self {
        Self::LoadingFailed(CANCELLED.to_string())
    }

    /// Returns true if this error reports a cancelled request
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::LoadingFailed(cause) if cause == CANCELLED)
    }
}

impl From<TransportError> for OjpError {
    fn from(err: TransportError) -> Self {
        Self::LoadingFailed(err.to_string())
    }
}
