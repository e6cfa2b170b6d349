use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum Error {
    // usage errors, raised synchronously at the call site
    #[error("{operation}: invalid arguments, expected ([options]) or (on_success, on_failure[, options])")]
    ErrInvalidArguments { operation: &'static str },
    #[error("{operation}: invalid value: {reason}")]
    ErrInvalidValue {
        operation: &'static str,
        reason: String,
    },
    #[error("native peer connection is gone")]
    ErrConnectionGone,
    #[error("connection closed")]
    ErrConnectionClosed,
    #[error("data channel is not open, ready state is {0}")]
    ErrDataChannelNotOpen(String),
    #[error("native data channel is gone")]
    ErrDataChannelGone,
    #[error("data channel label {0} is already in use")]
    ErrDataChannelLabelInUse(String),
    #[error("data channel is unavailable")]
    ErrDataChannelUnavailable,
    #[error("invalid binary type {0}")]
    ErrInvalidBinaryType(String),
    #[error("invalid configuration: {0}")]
    ErrInvalidConfiguration(String),
    #[error("ice server url must not be empty")]
    ErrNoIceServerUrl,
    #[error("invalid ice server url {0}")]
    ErrInvalidIceServerUrl(String),
    #[error("turn server {0} requires username and credential")]
    ErrNoTurnCredentials(String),

    // negotiation errors, delivered through the failure handler
    #[error("invalid state: {0}")]
    ErrInvalidState(String),
    #[error("invalid modification: {0}")]
    ErrInvalidModification(String),
    #[error("{operation} failed: {reason}")]
    ErrOperationFailed {
        operation: &'static str,
        reason: String,
    },
    #[error("operation was abandoned before it settled")]
    ErrOperationAbandoned,

    // fatal configuration errors, engine and binding disagree on a state table
    #[error("{table} code {code} is out of range")]
    ErrStateCodeOutOfRange { table: &'static str, code: u32 },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns true for errors that indicate a contract mismatch between the
    /// native engine and this binding. These must not be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ErrStateCodeOutOfRange { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(e.to_string())
    }
}
