//! Error types for the 1secmail client.

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for all 1secmail client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure from the underlying HTTP client (connection, DNS, TLS, builder).
    ///
    /// The reqwest error is kept as-is so callers can inspect it directly.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// The API answered a JSON call with something other than `200 OK`.
    #[error("invalid status code: {status}")]
    BadStatusCode {
        /// Status code returned by the API.
        status: StatusCode,
        /// Raw response body, verbatim.
        body: String,
    },
    /// The API answered `200 OK` but the body did not decode into the expected shape.
    #[error("unexpected JSON: {source} from {body}")]
    NotExpectedJson {
        /// Raw response body, verbatim.
        body: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The caller's [`Context`](crate::Context) was cancelled.
    #[error("request cancelled")]
    Cancelled,
    /// The caller's [`Context`](crate::Context) deadline elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The configured base URL could not be parsed.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// The configured user agent cannot be sent as a header value.
    #[error("invalid user agent: {0:?}")]
    InvalidUserAgent(String),
    /// A mailbox address was not of the form `login@domain`.
    #[error("invalid mailbox address: {0}")]
    InvalidMailbox(String),
}

impl Error {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadStatusCode { status, .. } => Some(*status),
            Error::Request(err) => err.status(),
            _ => None,
        }
    }

    /// Raw response body carried by the error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::BadStatusCode { body, .. } | Error::NotExpectedJson { body, .. } => Some(body),
            _ => None,
        }
    }

    /// `true` when the call ended because its context was cancelled or timed out.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }
}
