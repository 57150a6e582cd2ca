//! Structured verbose-logging hook.

use reqwest::StatusCode;

/// Maximum number of body bytes forwarded to a [`VerboseLog`] hook.
pub const BODY_SNIPPET_LEN: usize = 512;

/// What the client is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEventKind {
    /// A request is about to be sent.
    Fetching,
    /// A JSON call got a non-200 status; no decode will be attempted.
    BadStatus,
    /// A JSON call got `200 OK`; the body is about to be decoded.
    FetchResult,
    /// A raw download completed (status is not checked).
    RawResult,
}

/// A single diagnostic event emitted by the client.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub kind: LogEventKind,
    pub url: &'a str,
    pub status: Option<StatusCode>,
    /// Start of the response body, at most [`BODY_SNIPPET_LEN`] bytes.
    pub body: Option<&'a str>,
}

impl<'a> LogEvent<'a> {
    pub(crate) fn fetching(url: &'a str) -> Self {
        Self {
            kind: LogEventKind::Fetching,
            url,
            status: None,
            body: None,
        }
    }

    pub(crate) fn response(
        kind: LogEventKind,
        url: &'a str,
        status: StatusCode,
        body: &'a str,
    ) -> Self {
        Self {
            kind,
            url,
            status: Some(status),
            body: Some(snippet(body)),
        }
    }
}

/// Receives [`LogEvent`]s from a [`Client`](crate::Client).
///
/// Implemented for any `Fn(&LogEvent<'_>) + Send + Sync`, so a closure works:
///
/// ```
/// use onesecmail_client::{Client, LogEvent};
///
/// let client = Client::builder()
///     .verbose_log(|event: &LogEvent<'_>| eprintln!("{:?} {}", event.kind, event.url))
///     .build()
///     .unwrap();
/// # let _ = client;
/// ```
pub trait VerboseLog: Send + Sync {
    fn log(&self, event: &LogEvent<'_>);
}

impl<F> VerboseLog for F
where
    F: Fn(&LogEvent<'_>) + Send + Sync,
{
    fn log(&self, event: &LogEvent<'_>) {
        self(event)
    }
}

fn snippet(body: &str) -> &str {
    if body.len() <= BODY_SNIPPET_LEN {
        return body;
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(snippet("[\"a\"]"), "[\"a\"]");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundary() {
        let body = format!("{}é", "a".repeat(BODY_SNIPPET_LEN - 1));
        let cut = snippet(&body);
        assert_eq!(cut.len(), BODY_SNIPPET_LEN - 1);
        assert!(cut.chars().all(|c| c == 'a'));
    }
}
