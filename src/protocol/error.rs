use std::io;
use thiserror::Error;

/// Error type produced by request parsing and response construction.
///
/// The connection loop matches this exhaustively to decide what goes back on
/// the wire:
///
/// - [`HttpError::Protocol`] carries the status code and message for the
///   error response, after which the connection is closed
/// - [`HttpError::WaitingForData`] means no request has arrived on the
///   connection yet; the read loop simply retries
/// - everything else is answered with a generic `503 Service Unavailable`
#[derive(Debug, Error)]
pub enum HttpError {
    /// A protocol violation that maps directly to a response status.
    #[error("{message}")]
    Protocol { status: u16, message: String },

    /// The next request has not arrived yet. Not a failure.
    #[error("no request on the connection yet")]
    WaitingForData,

    /// Anything that does not fit the protocol taxonomy.
    #[error("{0}")]
    Unclassified(String),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HttpError {
    pub fn protocol<S: ToString>(status: u16, message: S) -> Self {
        Self::Protocol { status, message: message.to_string() }
    }

    pub fn unclassified<S: ToString>(message: S) -> Self {
        Self::Unclassified(message.to_string())
    }
}
