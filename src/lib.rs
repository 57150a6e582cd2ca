//! # 1secmail Client
//! Asynchronous wrapper around the 1secmail disposable email HTTP API: generate random mailboxes, list the serving domains, list and read messages, and download attachments using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers who need throwaway addresses in integration tests, demos, or automation scripts without running mail infrastructure: get an address, poll its inbox ([`MessageItem`]), read the full [`Message`], then fetch any [`Attachment`].
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Every call takes a [`Context`] carrying an optional deadline and cancellation signals; a call aborts as soon as its context is done.
//!
//! ## Out of scope
//! No retries, no caching, no authentication, no pagination. Each call is exactly one GET request and the caller decides what to do with failures.
//!
//! ## Errors
//! Transport failures surface unchanged as [`Error::Request`]. A JSON call that gets a non-200 status returns [`Error::BadStatusCode`] with the raw body; a 200 whose body does not decode returns [`Error::NotExpectedJson`]. A done context yields [`Error::Cancelled`] or [`Error::DeadlineExceeded`]. Attachment downloads never check the status, so an error page comes back as bytes.
//!
//! ## Logging
//! Requests and responses are reported as `tracing` debug events. For a typed per-client hook, see [`VerboseLog`].
//!
//! ## Example
//! ```no_run
//! use onesecmail_client::{Client, Context};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), onesecmail_client::Error> {
//!     let client = Client::new()?;
//!     let ctx = Context::background().with_timeout(Duration::from_secs(5));
//!
//!     let domains = client.get_domain_list(&ctx).await?;
//!     println!("Domains: {domains:?}");
//!
//!     for msg in client.get_messages(&ctx, "demo", "1secmail.com").await? {
//!         let full = client.read_message(&ctx, "demo", "1secmail.com", msg.id).await?;
//!         println!("From: {}, Subject: {}", full.from, full.subject);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod context;
mod error;
mod log;
mod models;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, VERSION};
pub use context::{CancelHandle, Context};
pub use error::Error;
pub use log::{BODY_SNIPPET_LEN, LogEvent, LogEventKind, VerboseLog};
pub use models::{Attachment, Mailbox, Message, MessageItem};

/// Result type alias for 1secmail operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
